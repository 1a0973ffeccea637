use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

/// One ingested CSV upload and its dataset-level statistics.
///
/// A dataset exclusively owns its equipment records and type summaries;
/// removing it removes them.
///
/// Related entities:
/// - `equipment_records`: validated rows, ordered by `sequence_index`
/// - `type_summaries`: per-type statistics, ordered by `position`
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "datasets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub filename: String,
    /// Lowercase hex SHA-256 of the uploaded bytes
    #[sea_orm(unique)]
    pub fingerprint: String,
    pub total_equipment_count: i32,
    pub avg_flowrate: Option<f64>,
    pub avg_pressure: Option<f64>,
    pub avg_temperature: Option<f64>,
    pub file_size: i64,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::equipment_records::Entity")]
    EquipmentRecords,
    #[sea_orm(has_many = "super::type_summaries::Entity")]
    TypeSummaries,
}

impl Related<super::equipment_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EquipmentRecords.def()
    }
}

impl Related<super::type_summaries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TypeSummaries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn new() -> Self {
        Self {
            id: ActiveValue::NotSet,
            filename: ActiveValue::NotSet,
            fingerprint: ActiveValue::NotSet,
            total_equipment_count: Set(0),
            avg_flowrate: Set(None),
            avg_pressure: Set(None),
            avg_temperature: Set(None),
            file_size: Set(0),
            created_at: Set(chrono::Utc::now()),
        }
    }
}

impl Model {
    /// Get file size in a human-readable format
    pub fn get_file_size_formatted(&self) -> String {
        if self.file_size < 1024 {
            format!("{} B", self.file_size)
        } else if self.file_size < 1024 * 1024 {
            format!("{:.1} KB", self.file_size as f64 / 1024.0)
        } else {
            format!("{:.1} MB", self.file_size as f64 / (1024.0 * 1024.0))
        }
    }
}
