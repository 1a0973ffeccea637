pub mod datasets;
pub mod equipment_records;
pub mod type_summaries;
