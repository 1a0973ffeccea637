//! Required-column contract and header normalization
//!
//! Header names are matched after a single normalization step (trim +
//! lowercase). The result is a [`ColumnMap`] from each required column to its
//! position in the file, so nothing downstream compares header strings.

use std::collections::HashMap;
use std::fmt;

use crate::errors::{IngestError, IngestResult};

/// The five columns every upload must carry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequiredColumn {
    EquipmentName,
    Type,
    Flowrate,
    Pressure,
    Temperature,
}

impl RequiredColumn {
    /// All required columns in canonical order
    pub const ALL: [RequiredColumn; 5] = [
        RequiredColumn::EquipmentName,
        RequiredColumn::Type,
        RequiredColumn::Flowrate,
        RequiredColumn::Pressure,
        RequiredColumn::Temperature,
    ];

    /// Numeric columns, in the order they are coerced
    pub const NUMERIC: [RequiredColumn; 3] = [
        RequiredColumn::Flowrate,
        RequiredColumn::Pressure,
        RequiredColumn::Temperature,
    ];

    /// Canonical header text as it appears in the wire contract
    pub fn canonical_name(self) -> &'static str {
        match self {
            RequiredColumn::EquipmentName => "Equipment Name",
            RequiredColumn::Type => "Type",
            RequiredColumn::Flowrate => "Flowrate",
            RequiredColumn::Pressure => "Pressure",
            RequiredColumn::Temperature => "Temperature",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RequiredColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Normalized form used for header matching
pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Positions of the required columns within a header row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMap {
    positions: [usize; 5],
    found: Vec<String>,
}

impl ColumnMap {
    /// Resolve a header row against the required-column contract.
    ///
    /// Extra columns are ignored and order is free. When the same normalized
    /// name appears more than once the first occurrence wins. Fails with
    /// `MissingColumns` naming every absent column.
    pub fn resolve<'h, I>(headers: I) -> IngestResult<Self>
    where
        I: IntoIterator<Item = &'h str>,
    {
        let found: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();

        let mut lookup: HashMap<String, usize> = HashMap::with_capacity(found.len());
        for (position, header) in found.iter().enumerate() {
            lookup.entry(normalize_header(header)).or_insert(position);
        }

        let mut positions = [0usize; 5];
        let mut missing = Vec::new();
        for column in RequiredColumn::ALL {
            match lookup.get(&normalize_header(column.canonical_name())) {
                Some(position) => positions[column.index()] = *position,
                None => missing.push(column.canonical_name().to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(IngestError::MissingColumns { missing, found });
        }

        Ok(Self { positions, found })
    }

    /// Position of a required column in each record
    pub fn position(&self, column: RequiredColumn) -> usize {
        self.positions[column.index()]
    }

    /// Header names as found in the file (trimmed)
    pub fn found(&self) -> &[String] {
        &self.found
    }
}
