//! CSV validation: raw bytes to ordered [`EquipmentRecord`]s
//!
//! Pure function of its input. Numeric coercion runs column by column in the
//! fixed order Flowrate, Pressure, Temperature and stops at the first column
//! holding a bad cell.

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use super::columns::{ColumnMap, RequiredColumn};
use super::record::{EquipmentRecord, RawRow};
use crate::errors::{IngestError, IngestResult};

/// Validate raw upload bytes and return the records in file order
pub fn validate(raw: &[u8]) -> IngestResult<Vec<EquipmentRecord>> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| IngestError::MalformedFile(format!("content is not UTF-8 text: {}", e)))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| IngestError::MalformedFile(e.to_string()))?
        .clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestError::MalformedFile(
            "No columns to parse from file".to_string(),
        ));
    }

    let columns = ColumnMap::resolve(headers.iter())?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| IngestError::MalformedFile(e.to_string()))?;
        check_width(&record, headers.len())?;
        rows.push(RawRow::project(&record, &columns));
    }
    debug!("Parsed {} raw rows from {} columns", rows.len(), headers.len());

    let mut readings: Vec<Vec<f64>> = Vec::with_capacity(RequiredColumn::NUMERIC.len());
    for column in RequiredColumn::NUMERIC {
        let values = rows
            .iter()
            .map(|row| parse_decimal(row.get(column)))
            .collect::<Option<Vec<f64>>>()
            .ok_or_else(|| IngestError::NonNumericColumn {
                column: column.canonical_name().to_string(),
            })?;
        readings.push(values);
    }

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, mut row)| EquipmentRecord {
            name: row.take(RequiredColumn::EquipmentName),
            equipment_type: row.take(RequiredColumn::Type),
            flowrate: readings[0][i],
            pressure: readings[1][i],
            temperature: readings[2][i],
            sequence_index: (i + 1) as u32,
        })
        .collect();

    Ok(records)
}

/// Rows wider than the header cannot be mapped onto columns
fn check_width(record: &StringRecord, expected: usize) -> IngestResult<()> {
    if record.len() > expected {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        return Err(IngestError::MalformedFile(format!(
            "Expected {} fields in line {}, saw {}",
            expected,
            line,
            record.len()
        )));
    }
    Ok(())
}

/// Coerce a cell to a finite decimal number
fn parse_decimal(cell: &str) -> Option<f64> {
    let value: f64 = cell.trim().parse().ok()?;
    value.is_finite().then_some(value)
}
