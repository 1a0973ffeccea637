pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;

use clap::Subcommand;

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum MigrateDirection {
    Up,
    Down,
    Fresh,
}

use crate::config::AppConfig;
use crate::database::{connection::*, migrations::Migrator};
use anyhow::Result;
use sea_orm_migration::prelude::*;
use tracing::info;

pub async fn start_server(config: AppConfig) -> Result<()> {
    let db = open_database(&config.database).await?;
    info!("Database migrations completed");

    let port = config.port;
    let app = app::create_app(db, config).await?;

    log_routes();

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes() {
    info!("API Endpoints:");
    info!("  GET    /health                          - Health check");
    info!("  GET    /api-docs/openapi.json           - OpenAPI document");
    info!("  POST   /api/v1/upload                   - Upload a CSV (multipart 'file')");
    info!("  GET    /api/v1/datasets                 - Recent datasets");
    info!("  GET    /api/v1/datasets/:id             - Dataset detail");
    info!("  DELETE /api/v1/datasets/:id             - Delete dataset");
    info!("  GET    /api/v1/datasets/:id/summary     - Summary statistics");
    info!("  GET    /api/v1/datasets/:id/equipment   - Paginated records");
    info!("  GET    /api/v1/datasets/:id/report      - Markdown or CSV report");
}

pub async fn migrate_database(database_path: &str, direction: MigrateDirection) -> Result<()> {
    let database_url = get_database_url(Some(database_path));
    let db = establish_connection(&database_url).await?;

    match direction {
        MigrateDirection::Up => {
            info!("Running migrations up");
            Migrator::up(&db, None).await?;
        }
        MigrateDirection::Down => {
            info!("Running migrations down");
            Migrator::down(&db, None).await?;
        }
        MigrateDirection::Fresh => {
            info!("Running fresh migrations (down then up)");
            Migrator::down(&db, None).await?;
            Migrator::up(&db, None).await?;
        }
    }

    info!("Database migration completed");
    Ok(())
}
