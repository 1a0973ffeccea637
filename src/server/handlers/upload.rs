use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};
use tracing::debug;

use crate::server::app::AppState;
use crate::server::dto::UploadResponse;
use crate::server::error::ApiError;

/// Multipart part names accepted for the CSV payload
const FILE_FIELDS: [&str; 2] = ["file", "csv"];

const DEFAULT_FILENAME: &str = "upload.csv";

#[utoipa::path(
    post,
    path = "/api/v1/upload",
    request_body(content = String, content_type = "multipart/form-data", description = "CSV file in part 'file' or 'csv'"),
    responses(
        (status = 201, description = "Dataset created", body = UploadResponse),
        (status = 400, description = "Malformed file, missing columns or non-numeric values"),
        (status = 409, description = "Identical file already uploaded"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn upload_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let key = field.name().unwrap_or("").to_string();
        if upload.is_none() && FILE_FIELDS.contains(&key.as_str()) {
            let filename = field
                .file_name()
                .map(|name| name.to_string())
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FILENAME.to_string());
            let bytes = field.bytes().await?;
            debug!("Received part '{}' as {} ({} bytes)", key, filename, bytes.len());
            upload = Some((filename, bytes.to_vec()));
        }
    }

    let (filename, raw) = upload.ok_or(ApiError::MissingFile)?;
    let outcome = state.datasets().ingest(&filename, &raw).await?;

    Ok((StatusCode::CREATED, Json(outcome.into())))
}
