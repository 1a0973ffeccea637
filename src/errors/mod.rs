//! Domain-specific error types for chemequip
//!
//! # Error Categories
//!
//! - **IngestError**: everything that can reject an upload (malformed CSV,
//!   missing columns, non-numeric cells, duplicate content, I/O failures)
//! - **DatasetError**: read-side and maintenance operations on stored datasets
//!
//! Both carry an `error_code()` that transports (HTTP, CLI) surface verbatim
//! as the machine-readable error kind.
//!
//! # Examples
//!
//! ```rust
//! use chemequip::errors::IngestError;
//!
//! let err = IngestError::NonNumericColumn {
//!     column: "Pressure".to_string(),
//! };
//! assert_eq!(err.error_code(), "NON_NUMERIC_COLUMN");
//! assert!(err.is_client_error());
//! ```

pub mod dataset;
pub mod ingest;

pub use dataset::DatasetError;
pub use ingest::IngestError;

/// Result type alias for ingestion operations
pub type IngestResult<T> = Result<T, IngestError>;

/// Result type alias for dataset read/maintenance operations
pub type DatasetResult<T> = Result<T, DatasetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_result_alias() {
        let result: IngestResult<()> = Err(IngestError::MalformedFile("empty".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_dataset_result_alias() {
        let result: DatasetResult<()> = Err(DatasetError::NotFound(3));
        assert!(result.is_err());
    }
}
