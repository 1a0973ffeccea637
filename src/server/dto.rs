use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::database::entities::{datasets, equipment_records, type_summaries};
use crate::services::{DatasetDetail, IngestOutcome, RecordPage, ReportFormat};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub dataset_id: i32,
    pub filename: String,
    pub total_equipment_count: i32,
    pub avg_flowrate: Option<f64>,
    pub avg_pressure: Option<f64>,
    pub avg_temperature: Option<f64>,
    /// Datasets removed by retention to make room for this one
    pub evicted: Vec<i32>,
}

impl From<IngestOutcome> for UploadResponse {
    fn from(outcome: IngestOutcome) -> Self {
        let dataset = outcome.dataset;
        Self {
            dataset_id: dataset.id,
            filename: dataset.filename,
            total_equipment_count: dataset.total_equipment_count,
            avg_flowrate: dataset.avg_flowrate,
            avg_pressure: dataset.avg_pressure,
            avg_temperature: dataset.avg_temperature,
            evicted: outcome.evicted,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DatasetResponse {
    pub id: i32,
    pub filename: String,
    pub total_equipment_count: i32,
    pub avg_flowrate: Option<f64>,
    pub avg_pressure: Option<f64>,
    pub avg_temperature: Option<f64>,
    pub file_size: i64,
    pub file_size_formatted: String,
    pub created_at: DateTime<Utc>,
}

impl From<datasets::Model> for DatasetResponse {
    fn from(model: datasets::Model) -> Self {
        Self {
            file_size_formatted: model.get_file_size_formatted(),
            id: model.id,
            filename: model.filename,
            total_equipment_count: model.total_equipment_count,
            avg_flowrate: model.avg_flowrate,
            avg_pressure: model.avg_pressure,
            avg_temperature: model.avg_temperature,
            file_size: model.file_size,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EquipmentRecordResponse {
    pub sequence_index: i32,
    pub equipment_name: String,
    pub equipment_type: String,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

impl From<equipment_records::Model> for EquipmentRecordResponse {
    fn from(model: equipment_records::Model) -> Self {
        Self {
            sequence_index: model.sequence_index,
            equipment_name: model.equipment_name,
            equipment_type: model.equipment_type,
            flowrate: model.flowrate,
            pressure: model.pressure,
            temperature: model.temperature,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FieldStatsResponse {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TypeSummaryResponse {
    pub equipment_type: String,
    pub count: i32,
    pub flowrate: FieldStatsResponse,
    pub pressure: FieldStatsResponse,
    pub temperature: FieldStatsResponse,
}

impl From<type_summaries::Model> for TypeSummaryResponse {
    fn from(model: type_summaries::Model) -> Self {
        Self {
            equipment_type: model.equipment_type,
            count: model.count,
            flowrate: FieldStatsResponse {
                avg: model.avg_flowrate,
                min: model.min_flowrate,
                max: model.max_flowrate,
            },
            pressure: FieldStatsResponse {
                avg: model.avg_pressure,
                min: model.min_pressure,
                max: model.max_pressure,
            },
            temperature: FieldStatsResponse {
                avg: model.avg_temperature,
                min: model.min_temperature,
                max: model.max_temperature,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DatasetDetailResponse {
    pub dataset: DatasetResponse,
    pub type_summaries: Vec<TypeSummaryResponse>,
    pub equipment: Vec<EquipmentRecordResponse>,
}

impl From<DatasetDetail> for DatasetDetailResponse {
    fn from(detail: DatasetDetail) -> Self {
        Self {
            dataset: detail.dataset.into(),
            type_summaries: detail.type_summaries.into_iter().map(Into::into).collect(),
            equipment: detail.records.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordPageResponse {
    pub count: u64,
    pub page: u64,
    pub page_size: u64,
    pub results: Vec<EquipmentRecordResponse>,
}

impl From<RecordPage> for RecordPageResponse {
    fn from(page: RecordPage) -> Self {
        Self {
            count: page.count,
            page: page.page,
            page_size: page.page_size,
            results: page.results.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Maximum number of datasets, newest first
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    pub format: Option<ReportFormat>,
}
