pub mod to_csv_records;
pub mod to_markdown;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::entities::{datasets, equipment_records, type_summaries};

/// Number of records listed in the "top by flowrate" section
pub const TOP_EQUIPMENT: usize = 5;

/// Report content shared by every renderer.
///
/// Numbers are pre-formatted with two decimals so templates never have to.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportData {
    pub title: String,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub total_count: i32,
    pub avg_flowrate: String,
    pub avg_pressure: String,
    pub avg_temperature: String,
    pub distribution: Vec<TypeRow>,
    pub top_by_flowrate: Vec<TopRow>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TypeRow {
    pub equipment_type: String,
    pub count: i32,
    pub avg_flowrate: String,
    pub avg_pressure: String,
    pub avg_temperature: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopRow {
    pub rank: usize,
    pub name: String,
    pub equipment_type: String,
    pub flowrate: String,
    pub pressure: String,
    pub temperature: String,
}

fn fixed(value: f64) -> String {
    format!("{:.2}", crate::ingest::round_stat(value))
}

fn optional(value: Option<f64>) -> String {
    value.map(fixed).unwrap_or_else(|| "n/a".to_string())
}

impl ReportData {
    /// Assemble report content; `summaries` must be in first-seen order
    pub fn build(
        dataset: &datasets::Model,
        summaries: &[type_summaries::Model],
        records: &[equipment_records::Model],
    ) -> Self {
        let mut ranked: Vec<&equipment_records::Model> = records.iter().collect();
        ranked.sort_by(|a, b| {
            b.flowrate
                .total_cmp(&a.flowrate)
                .then_with(|| a.sequence_index.cmp(&b.sequence_index))
        });

        let top_by_flowrate = ranked
            .into_iter()
            .take(TOP_EQUIPMENT)
            .enumerate()
            .map(|(i, r)| TopRow {
                rank: i + 1,
                name: r.equipment_name.clone(),
                equipment_type: r.equipment_type.clone(),
                flowrate: fixed(r.flowrate),
                pressure: fixed(r.pressure),
                temperature: fixed(r.temperature),
            })
            .collect();

        let distribution = summaries
            .iter()
            .map(|s| TypeRow {
                equipment_type: s.equipment_type.clone(),
                count: s.count,
                avg_flowrate: fixed(s.avg_flowrate),
                avg_pressure: fixed(s.avg_pressure),
                avg_temperature: fixed(s.avg_temperature),
            })
            .collect();

        ReportData {
            title: format!("Equipment Analysis Report: {}", dataset.filename),
            filename: dataset.filename.clone(),
            uploaded_at: dataset.created_at,
            total_count: dataset.total_equipment_count,
            avg_flowrate: optional(dataset.avg_flowrate),
            avg_pressure: optional(dataset.avg_pressure),
            avg_temperature: optional(dataset.avg_temperature),
            distribution,
            top_by_flowrate,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn dataset() -> datasets::Model {
        datasets::Model {
            id: 1,
            filename: "plant.csv".to_string(),
            fingerprint: "ab".repeat(32),
            total_equipment_count: 3,
            avg_flowrate: Some(135.27),
            avg_pressure: Some(10.17),
            avg_temperature: Some(111.93),
            file_size: 172,
            created_at: chrono::DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
                .expect("valid date")
                .with_timezone(&Utc),
        }
    }

    pub fn record(seq: i32, name: &str, kind: &str, flowrate: f64) -> equipment_records::Model {
        equipment_records::Model {
            id: seq,
            dataset_id: 1,
            equipment_name: name.to_string(),
            equipment_type: kind.to_string(),
            flowrate,
            pressure: 1.5,
            temperature: 20.0,
            sequence_index: seq,
        }
    }

    pub fn summary(position: i32, kind: &str, count: i32) -> type_summaries::Model {
        type_summaries::Model {
            id: position + 1,
            dataset_id: 1,
            equipment_type: kind.to_string(),
            position,
            count,
            avg_flowrate: 100.0,
            min_flowrate: 50.0,
            max_flowrate: 150.0,
            avg_pressure: 1.5,
            min_pressure: 1.5,
            max_pressure: 1.5,
            avg_temperature: 20.0,
            min_temperature: 20.0,
            max_temperature: 20.0,
        }
    }
}
