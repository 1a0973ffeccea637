use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};

use crate::server::app::AppState;
use crate::server::dto::ReportQuery;
use crate::server::error::ApiError;
use crate::services::ReportService;

#[utoipa::path(
    get,
    path = "/api/v1/datasets/{id}/report",
    params(("id" = i32, Path, description = "Dataset id"), ReportQuery),
    responses(
        (status = 200, description = "Rendered report as an attachment", content_type = "text/markdown"),
        (status = 404, description = "Dataset not found")
    )
)]
pub async fn download_report(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let format = query.format.unwrap_or_default();
    let report = ReportService::new(state.datasets()).render(id, format).await?;

    let disposition = format!("attachment; filename=\"{}\"", report.filename);
    Ok((
        [
            (header::CONTENT_TYPE, report.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.body,
    ))
}
