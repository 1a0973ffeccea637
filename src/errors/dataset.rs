//! Dataset error types
//!
//! Errors for reading, exporting and deleting datasets that are already
//! stored. Upload-time failures live in [`super::IngestError`].

use thiserror::Error;

/// Dataset operation errors
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Dataset not found by ID
    #[error("Dataset {0} not found")]
    NotFound(i32),

    /// Report or CSV export failed
    #[error("Export failed: {0}")]
    Export(String),

    /// Database operation failed
    #[cfg(feature = "server")]
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DatasetError {
    /// Check if this is a not found error (404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatasetError::NotFound(_))
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            DatasetError::NotFound(_) => "NOT_FOUND",
            DatasetError::Export(_) => "EXPORT_FAILED",
            #[cfg(feature = "server")]
            DatasetError::Database(_) => "IO_FAILURE",
            DatasetError::Io(_) => "IO_FAILURE",
        }
    }
}

impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        DatasetError::Export(err.to_string())
    }
}
