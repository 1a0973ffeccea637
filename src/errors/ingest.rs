//! Ingestion error types
//!
//! Every way an upload can be rejected. Validation failures always carry the
//! specific reason so a caller can correct the file and resubmit; none of
//! them are retried internally.
//!
//! # Examples
//!
//! ```rust
//! use chemequip::errors::IngestError;
//!
//! let err = IngestError::MissingColumns {
//!     missing: vec!["Type".to_string()],
//!     found: vec!["Equipment Name".to_string(), "Flowrate".to_string()],
//! };
//! assert_eq!(
//!     err.to_string(),
//!     "Missing required columns: Type. Found: Equipment Name, Flowrate"
//! );
//! ```

use thiserror::Error;

/// Errors raised while fingerprinting, validating or persisting an upload
#[derive(Error, Debug)]
pub enum IngestError {
    /// Content is not parseable as comma-separated text
    #[error("Invalid CSV format: {0}")]
    MalformedFile(String),

    /// One or more required columns are absent
    #[error("Missing required columns: {}. Found: {}", .missing.join(", "), .found.join(", "))]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    /// A required numeric column holds a cell that is not a decimal number
    #[error("Column '{column}' contains non-numeric values")]
    NonNumericColumn { column: String },

    /// The exact same bytes were ingested before
    #[error("Duplicate file. This CSV has already been uploaded")]
    DuplicateContent { fingerprint: String },

    /// Storage or transport failure not attributable to the input
    #[error("I/O failure: {0}")]
    IoFailure(String),
}

impl IngestError {
    /// Check if this error was caused by the submitted content (400-series)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            IngestError::MalformedFile(_)
                | IngestError::MissingColumns { .. }
                | IngestError::NonNumericColumn { .. }
                | IngestError::DuplicateContent { .. }
        )
    }

    /// Check if the caller may retry the same input and expect a different outcome
    pub fn is_retryable(&self) -> bool {
        matches!(self, IngestError::IoFailure(_))
    }

    /// Machine-readable error kind
    pub fn error_code(&self) -> &'static str {
        match self {
            IngestError::MalformedFile(_) => "MALFORMED_FILE",
            IngestError::MissingColumns { .. } => "MISSING_COLUMNS",
            IngestError::NonNumericColumn { .. } => "NON_NUMERIC_COLUMN",
            IngestError::DuplicateContent { .. } => "DUPLICATE_CONTENT",
            IngestError::IoFailure(_) => "IO_FAILURE",
        }
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::IoFailure(err.to_string())
    }
}

#[cfg(feature = "server")]
impl From<sea_orm::DbErr> for IngestError {
    fn from(err: sea_orm::DbErr) -> Self {
        IngestError::IoFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_lists_everything() {
        let err = IngestError::MissingColumns {
            missing: vec![
                "Equipment Name".to_string(),
                "Type".to_string(),
                "Flowrate".to_string(),
                "Pressure".to_string(),
                "Temperature".to_string(),
            ],
            found: vec!["Name".to_string(), "Value".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required columns: Equipment Name, Type, Flowrate, Pressure, Temperature. Found: Name, Value"
        );
        assert!(err.is_client_error());
        assert_eq!(err.error_code(), "MISSING_COLUMNS");
    }

    #[test]
    fn test_non_numeric_column() {
        let err = IngestError::NonNumericColumn {
            column: "Flowrate".to_string(),
        };
        assert_eq!(err.to_string(), "Column 'Flowrate' contains non-numeric values");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_duplicate_content() {
        let err = IngestError::DuplicateContent {
            fingerprint: "ab".repeat(32),
        };
        assert!(err.is_client_error());
        assert_eq!(err.error_code(), "DUPLICATE_CONTENT");
    }

    #[test]
    fn test_io_failure_from_std() {
        let err: IngestError =
            std::io::Error::new(std::io::ErrorKind::TimedOut, "read timed out").into();
        assert!(err.is_retryable());
        assert!(!err.is_client_error());
        assert_eq!(err.error_code(), "IO_FAILURE");
        assert_eq!(err.to_string(), "I/O failure: read timed out");
    }
}
