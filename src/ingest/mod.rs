//! CSV ingestion core
//!
//! Everything in here is a pure function of its inputs: no database, no
//! clock beyond what callers pass in. The persistence layer
//! (`services::DatasetService`) strings the steps together as
//! fingerprint → duplicate check → [`validate`] → [`aggregate`] → store →
//! [`retention::enforce`].

pub mod aggregate;
pub mod columns;
pub mod fingerprint;
pub mod record;
pub mod retention;
pub mod validator;

pub use aggregate::{aggregate, round_stat, Aggregate, DatasetStats, FieldStats, TypeSummary};
pub use columns::{ColumnMap, RequiredColumn};
pub use fingerprint::{fingerprint, is_duplicate, Fingerprint};
pub use record::{EquipmentRecord, RawRow};
pub use validator::validate;

use crate::errors::IngestResult;

/// Validated records together with their statistics
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
    pub records: Vec<EquipmentRecord>,
    pub aggregate: Aggregate,
}

/// Validate and aggregate raw CSV bytes without storing anything
pub fn analyze(raw: &[u8]) -> IngestResult<Analysis> {
    let records = validate(raw)?;
    let aggregate = aggregate(&records);
    Ok(Analysis { records, aggregate })
}
