//! API integration tests
//!
//! Upload, dataset, summary and report endpoints through the axum router

use anyhow::Result;
use axum::body::Bytes;
use axum::http::StatusCode;
use axum_test::TestServer;
use chemequip::config::AppConfig;
use chemequip::database::connection::setup_database;
use chemequip::server::app::create_app;
use sea_orm::Database;
use serde_json::Value;
use tempfile::NamedTempFile;

const SAMPLE: &str = include_str!("fixtures/sample.csv");
const BOUNDARY: &str = "chemequip-test-boundary";

/// Create a test server backed by a temporary SQLite file
async fn setup_test_server(config: AppConfig) -> Result<(TestServer, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    let app = create_app(db, config).await?;
    let server = TestServer::new(app)?;

    Ok((server, temp_file))
}

fn multipart_body(field: &str, filename: &str, content: &str) -> Bytes {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    );
    Bytes::from(body)
}

async fn upload(server: &TestServer, field: &str, filename: &str, content: &str) -> axum_test::TestResponse {
    server
        .post("/api/v1/upload")
        .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
        .bytes(multipart_body(field, filename, content))
        .await
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let (server, _db) = setup_test_server(AppConfig::default()).await?;

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["service"], "chemequip");
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_openapi_document() -> Result<()> {
    let (server, _db) = setup_test_server(AppConfig::default()).await?;

    let response = server.get("/api-docs/openapi.json").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let doc: Value = response.json();
    assert!(doc["paths"]["/api/v1/upload"].is_object());
    assert!(doc["paths"]["/api/v1/datasets/{id}/summary"].is_object());
    Ok(())
}

#[tokio::test]
async fn test_upload_and_read_back() -> Result<()> {
    let (server, _db) = setup_test_server(AppConfig::default()).await?;

    let response = upload(&server, "file", "sample.csv", SAMPLE).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["filename"], "sample.csv");
    assert_eq!(created["total_equipment_count"], 3);
    assert_eq!(created["avg_flowrate"], 135.27);
    assert_eq!(created["evicted"], serde_json::json!([]));
    let id = created["dataset_id"].as_i64().expect("dataset id");

    let list: Value = server.get("/api/v1/datasets").await.json();
    assert_eq!(list.as_array().map(|a| a.len()), Some(1));
    assert_eq!(list[0]["id"].as_i64(), Some(id));

    let detail: Value = server.get(&format!("/api/v1/datasets/{id}")).await.json();
    assert_eq!(detail["equipment"].as_array().map(|a| a.len()), Some(3));
    assert_eq!(detail["equipment"][0]["equipment_name"], "Pump-A1");
    assert_eq!(detail["type_summaries"][1]["equipment_type"], "Batch Reactor");

    let summary: Value = server.get(&format!("/api/v1/datasets/{id}/summary")).await.json();
    assert_eq!(summary["total_count"], 3);
    assert_eq!(summary["equipment_type_distribution"]["Shell and Tube"], 1);
    assert_eq!(summary["max_flowrate"], 200.3);
    assert_eq!(summary["min_pressure"], 6.8);

    let page: Value = server
        .get(&format!("/api/v1/datasets/{id}/equipment?page=2&page_size=2"))
        .await
        .json();
    assert_eq!(page["count"], 3);
    assert_eq!(page["results"][0]["sequence_index"], 3);
    Ok(())
}

#[tokio::test]
async fn test_csv_field_name_is_accepted() -> Result<()> {
    let (server, _db) = setup_test_server(AppConfig::default()).await?;
    let response = upload(&server, "csv", "sample.csv", SAMPLE).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn test_duplicate_upload_conflicts() -> Result<()> {
    let (server, _db) = setup_test_server(AppConfig::default()).await?;

    upload(&server, "file", "sample.csv", SAMPLE).await;
    let response = upload(&server, "file", "again.csv", SAMPLE).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["kind"], "DUPLICATE_CONTENT");
    assert_eq!(body["error"], "Duplicate file. This CSV has already been uploaded");

    let list: Value = server.get("/api/v1/datasets").await.json();
    assert_eq!(list.as_array().map(|a| a.len()), Some(1));
    Ok(())
}

#[tokio::test]
async fn test_validation_errors() -> Result<()> {
    let (server, _db) = setup_test_server(AppConfig::default()).await?;

    let response = upload(&server, "file", "bad.csv", "Name,Value\nx,1\n").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "MISSING_COLUMNS");
    assert_eq!(body["missing"].as_array().map(|a| a.len()), Some(5));

    let csv = "Equipment Name,Type,Flowrate,Pressure,Temperature\nP-1,Pump,1,N/A,2\n";
    let response = upload(&server, "file", "na.csv", csv).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "NON_NUMERIC_COLUMN");
    assert_eq!(body["column"], "Pressure");

    let list: Value = server.get("/api/v1/datasets").await.json();
    assert_eq!(list.as_array().map(|a| a.len()), Some(0));
    Ok(())
}

#[tokio::test]
async fn test_upload_without_file_part() -> Result<()> {
    let (server, _db) = setup_test_server(AppConfig::default()).await?;

    let response = upload(&server, "document", "sample.csv", SAMPLE).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "MISSING_FILE");
    Ok(())
}

#[tokio::test]
async fn test_retention_through_api() -> Result<()> {
    let config = AppConfig {
        max_datasets: 2,
        ..AppConfig::default()
    };
    let (server, _db) = setup_test_server(config).await?;

    let mut ids = Vec::new();
    for n in 0..3 {
        let csv = format!("Equipment Name,Type,Flowrate,Pressure,Temperature\nP-{n},Pump,{n},1,1\n");
        let created: Value = upload(&server, "file", &format!("{n}.csv"), &csv).await.json();
        ids.push(created["dataset_id"].as_i64().expect("dataset id"));
    }

    let list: Value = server.get("/api/v1/datasets").await.json();
    let remaining: Vec<i64> = list
        .as_array()
        .map(|a| a.iter().filter_map(|d| d["id"].as_i64()).collect())
        .unwrap_or_default();
    assert_eq!(remaining, vec![ids[2], ids[1]]);

    let response = server.get(&format!("/api/v1/datasets/{}", ids[0])).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_delete_dataset() -> Result<()> {
    let (server, _db) = setup_test_server(AppConfig::default()).await?;

    let created: Value = upload(&server, "file", "sample.csv", SAMPLE).await.json();
    let id = created["dataset_id"].as_i64().expect("dataset id");

    let response = server.delete(&format!("/api/v1/datasets/{id}")).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = server.get(&format!("/api/v1/datasets/{id}/summary")).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["kind"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn test_reports() -> Result<()> {
    let (server, _db) = setup_test_server(AppConfig::default()).await?;

    let created: Value = upload(&server, "file", "sample.csv", SAMPLE).await.json();
    let id = created["dataset_id"].as_i64().expect("dataset id");

    let response = server.get(&format!("/api/v1/datasets/{id}/report")).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let markdown = response.text();
    assert!(markdown.starts_with("# Equipment Analysis Report: sample.csv"));
    assert!(markdown.contains("| 1 | Heat-Exchanger-C3 | Shell and Tube | 200.30 |"));

    let response = server
        .get(&format!("/api/v1/datasets/{id}/report?format=csv"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let disposition = response.header("content-disposition");
    assert_eq!(
        disposition.to_str()?,
        format!("attachment; filename=\"sample_report_{id}.csv\"")
    );
    let csv = response.text();
    assert!(csv.starts_with("Equipment Name,Type,Flowrate,Pressure,Temperature\n"));
    assert_eq!(csv.lines().count(), 4);

    let response = server.get("/api/v1/datasets/999/report").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() -> Result<()> {
    let config = AppConfig {
        max_upload_bytes: 64,
        ..AppConfig::default()
    };
    let (server, _db) = setup_test_server(config).await?;

    let response = upload(&server, "file", "sample.csv", SAMPLE).await;
    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);

    let list: Value = server.get("/api/v1/datasets").await.json();
    assert_eq!(list.as_array().map(|a| a.len()), Some(0));
    Ok(())
}

#[tokio::test]
async fn test_request_timeout_reports_io_failure() -> Result<()> {
    let config = AppConfig {
        request_timeout_secs: 0,
        ..AppConfig::default()
    };
    let (server, _db) = setup_test_server(config).await?;

    let response = upload(&server, "file", "sample.csv", SAMPLE).await;
    assert_eq!(response.status_code(), StatusCode::REQUEST_TIMEOUT);

    let body: Value = response.json();
    assert_eq!(body["kind"], "IO_FAILURE");
    assert_eq!(body["error"], "I/O failure: request timed out after 0s");
    Ok(())
}
