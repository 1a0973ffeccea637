use serde::{Deserialize, Serialize};

use super::columns::{ColumnMap, RequiredColumn};

/// One CSV record before validation, restricted to the required columns.
///
/// Cells are kept verbatim; a missing trailing cell is an empty string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRow {
    cells: [String; 5],
}

impl RawRow {
    /// Project a CSV record onto the required columns
    pub fn project(record: &csv::StringRecord, columns: &ColumnMap) -> Self {
        let cell = |column: RequiredColumn| {
            record
                .get(columns.position(column))
                .unwrap_or_default()
                .to_string()
        };
        Self {
            cells: RequiredColumn::ALL.map(cell),
        }
    }

    pub fn get(&self, column: RequiredColumn) -> &str {
        &self.cells[column.index()]
    }

    pub(crate) fn take(&mut self, column: RequiredColumn) -> String {
        std::mem::take(&mut self.cells[column.index()])
    }
}

/// A validated row of equipment readings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub name: String,
    pub equipment_type: String,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
    /// 1-based position in the source file
    pub sequence_index: u32,
}
