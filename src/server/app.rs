use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    response::Json,
    routing::{get, post},
    BoxError, Router,
};
use sea_orm::DatabaseConnection;
use tower::{
    timeout::{error::Elapsed, TimeoutLayer},
    ServiceBuilder,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::error;
use utoipa::OpenApi;

use super::dto;
use super::error::ApiError;
use super::handlers::{datasets, health, reports, upload};
use crate::config::AppConfig;
use crate::services::{DatasetService, DatasetSummary, ReportFormat};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        upload::upload_csv,
        datasets::list_datasets,
        datasets::get_dataset,
        datasets::delete_dataset,
        datasets::get_summary,
        datasets::list_equipment,
        reports::download_report,
    ),
    components(schemas(
        dto::UploadResponse,
        dto::DatasetResponse,
        dto::DatasetDetailResponse,
        dto::EquipmentRecordResponse,
        dto::TypeSummaryResponse,
        dto::FieldStatsResponse,
        dto::RecordPageResponse,
        DatasetSummary,
        ReportFormat,
    )),
    info(title = "chemequip", description = "Chemical equipment CSV analysis API")
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn datasets(&self) -> DatasetService {
        DatasetService::new(self.db.clone(), self.config.max_datasets)
    }
}

pub async fn create_app(db: DatabaseConnection, config: AppConfig) -> Result<Router> {
    let cors = match config.cors_origin.as_deref() {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<axum::http::HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin: {}", origin))?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let limit = Duration::from_secs(config.request_timeout_secs);
    let body_limit = DefaultBodyLimit::max(config.max_upload_bytes);

    let state = AppState {
        db,
        config: Arc::new(config),
    };

    let app = Router::new()
        // Health check endpoint
        .route("/health", get(health::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        // API v1 routes
        .nest("/api/v1", api_v1_routes())
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                    handle_middleware_error(err, limit)
                }))
                .layer(TimeoutLayer::new(limit))
                .layer(body_limit),
        )
        .with_state(state);

    Ok(app)
}

fn handle_middleware_error(err: BoxError, limit: Duration) -> ApiError {
    if !err.is::<Elapsed>() {
        error!("Unhandled middleware error: {}", err);
    }
    ApiError::Timeout(limit)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload::upload_csv))
        // Dataset routes
        .route("/datasets", get(datasets::list_datasets))
        .route(
            "/datasets/:id",
            get(datasets::get_dataset).delete(datasets::delete_dataset),
        )
        .route("/datasets/:id/summary", get(datasets::get_summary))
        .route("/datasets/:id/equipment", get(datasets::list_equipment))
        .route("/datasets/:id/report", get(reports::download_report))
}
