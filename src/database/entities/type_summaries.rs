use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Statistics for one equipment type within one dataset.
///
/// `position` is the order in which the type first appeared in the file.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "type_summaries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub dataset_id: i32,
    pub equipment_type: String,
    pub position: i32,
    pub count: i32,
    pub avg_flowrate: f64,
    pub min_flowrate: f64,
    pub max_flowrate: f64,
    pub avg_pressure: f64,
    pub min_pressure: f64,
    pub max_pressure: f64,
    pub avg_temperature: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::datasets::Entity",
        from = "Column::DatasetId",
        to = "super::datasets::Column::Id",
        on_delete = "Cascade"
    )]
    Datasets,
}

impl Related<super::datasets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Datasets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
