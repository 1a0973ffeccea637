use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::server::app::AppState;
use crate::server::dto::{
    DatasetDetailResponse, DatasetResponse, ListQuery, PageQuery, RecordPageResponse,
};
use crate::server::error::ApiError;
use crate::services::DatasetSummary;

const DEFAULT_PAGE_SIZE: u64 = 100;

#[utoipa::path(
    get,
    path = "/api/v1/datasets",
    params(ListQuery),
    responses((status = 200, description = "Datasets, newest first", body = [DatasetResponse]))
)]
pub async fn list_datasets(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<DatasetResponse>>, ApiError> {
    let limit = query.limit.unwrap_or(state.config.list_limit);
    let datasets = state.datasets().list(Some(limit)).await?;
    Ok(Json(datasets.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/datasets/{id}",
    params(("id" = i32, Path, description = "Dataset id")),
    responses(
        (status = 200, description = "Dataset with records and type summaries", body = DatasetDetailResponse),
        (status = 404, description = "Dataset not found")
    )
)]
pub async fn get_dataset(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DatasetDetailResponse>, ApiError> {
    let detail = state.datasets().detail(id).await?;
    Ok(Json(detail.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/datasets/{id}",
    params(("id" = i32, Path, description = "Dataset id")),
    responses(
        (status = 204, description = "Dataset deleted"),
        (status = 404, description = "Dataset not found")
    )
)]
pub async fn delete_dataset(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.datasets().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/datasets/{id}/summary",
    params(("id" = i32, Path, description = "Dataset id")),
    responses(
        (status = 200, description = "Summary statistics", body = DatasetSummary),
        (status = 404, description = "Dataset not found")
    )
)]
pub async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DatasetSummary>, ApiError> {
    Ok(Json(state.datasets().summary(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/datasets/{id}/equipment",
    params(("id" = i32, Path, description = "Dataset id"), PageQuery),
    responses(
        (status = 200, description = "Records ordered by sequence index", body = RecordPageResponse),
        (status = 404, description = "Dataset not found")
    )
)]
pub async fn list_equipment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<Json<RecordPageResponse>, ApiError> {
    let page = state
        .datasets()
        .records_page(
            id,
            query.page.unwrap_or(1),
            query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(page.into()))
}
