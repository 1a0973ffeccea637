use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::error;

use crate::errors::{DatasetError, IngestError};

/// Error returned by every API handler.
///
/// Serialized as `{"error": <message>, "kind": <code>, ...details}`.
#[derive(Debug)]
pub enum ApiError {
    Ingest(IngestError),
    Dataset(DatasetError),
    /// Upload request without a "file" or "csv" part
    MissingFile,
    Multipart(MultipartError),
    /// Request exceeded the configured time budget
    Timeout(Duration),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Ingest(IngestError::DuplicateContent { .. }) => StatusCode::CONFLICT,
            ApiError::Ingest(IngestError::IoFailure(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Ingest(_) => StatusCode::BAD_REQUEST,
            ApiError::Dataset(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Dataset(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MissingFile => StatusCode::BAD_REQUEST,
            ApiError::Multipart(err) => err.status(),
            ApiError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Ingest(err) => err.error_code(),
            ApiError::Dataset(err) => err.error_code(),
            ApiError::MissingFile => "MISSING_FILE",
            ApiError::Multipart(_) => "INVALID_UPLOAD",
            ApiError::Timeout(_) => "IO_FAILURE",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Ingest(err) => err.to_string(),
            ApiError::Dataset(err) => err.to_string(),
            ApiError::MissingFile => "No file provided. Send the CSV as multipart field 'file'".to_string(),
            ApiError::Multipart(err) => err.body_text(),
            ApiError::Timeout(limit) => {
                format!("I/O failure: request timed out after {}s", limit.as_secs())
            }
        }
    }

    fn body(&self) -> Value {
        let mut body = json!({
            "error": self.message(),
            "kind": self.kind(),
        });
        match self {
            ApiError::Ingest(IngestError::MissingColumns { missing, found }) => {
                body["missing"] = json!(missing);
                body["found"] = json!(found);
            }
            ApiError::Ingest(IngestError::NonNumericColumn { column }) => {
                body["column"] = json!(column);
            }
            _ => {}
        }
        body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.message());
        }
        (status, Json(self.body())).into_response()
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        ApiError::Ingest(err)
    }
}

impl From<DatasetError> for ApiError {
    fn from(err: DatasetError) -> Self {
        ApiError::Dataset(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let duplicate = ApiError::from(IngestError::DuplicateContent {
            fingerprint: "00".repeat(32),
        });
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);
        assert_eq!(duplicate.kind(), "DUPLICATE_CONTENT");

        let malformed = ApiError::from(IngestError::MalformedFile("bad".to_string()));
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);

        let io = ApiError::from(IngestError::IoFailure("disk".to_string()));
        assert_eq!(io.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let missing = ApiError::from(DatasetError::NotFound(3));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(missing.kind(), "NOT_FOUND");

        assert_eq!(ApiError::MissingFile.status(), StatusCode::BAD_REQUEST);

        let timeout = ApiError::Timeout(Duration::from_secs(30));
        assert_eq!(timeout.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(timeout.kind(), "IO_FAILURE");
        assert_eq!(
            timeout.body()["error"],
            "I/O failure: request timed out after 30s"
        );
    }

    #[test]
    fn test_body_carries_details() {
        let err = ApiError::from(IngestError::MissingColumns {
            missing: vec!["Type".to_string()],
            found: vec!["Name".to_string()],
        });
        let body = err.body();
        assert_eq!(body["kind"], "MISSING_COLUMNS");
        assert_eq!(body["missing"], json!(["Type"]));
        assert_eq!(body["found"], json!(["Name"]));

        let err = ApiError::from(IngestError::NonNumericColumn {
            column: "Pressure".to_string(),
        });
        assert_eq!(err.body()["column"], "Pressure");
        assert_eq!(
            err.body()["error"],
            "Column 'Pressure' contains non-numeric values"
        );
    }
}
