//! API integration tests
//!
//! Tests for the REST endpoints of the administrative surface

use anyhow::Result;
use axum::http::StatusCode;
use axum_test::TestServer;
use sea_orm::Database;
use serde_json::{json, Value};
use tempfile::{NamedTempFile, TempDir};
use validata::database::connection::setup_database;
use validata::server::app::create_app;
use validata::services::FileStorage;

/// Create a test server backed by a temp database and uploads directory
async fn setup_test_server() -> Result<(TestServer, TempDir, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    let uploads = tempfile::tempdir()?;
    let files = FileStorage::new(uploads.path());

    let app = create_app(db, files, Some("*")).await?;
    let server = TestServer::new(app)?;

    Ok((server, uploads, temp_file))
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let (server, _uploads, _db_file) = setup_test_server().await?;

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["service"], "validata");
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_languages_crud_api() -> Result<()> {
    let (server, _uploads, _db_file) = setup_test_server().await?;

    // Create
    let response = server
        .post("/api/v1/languages")
        .json(&json!({"code": "en", "name": "English"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let language: Value = response.json();
    let language_id = language["id"].as_i64().unwrap();
    assert_eq!(language["code"], "en");

    // Duplicate code is a conflict
    let response = server
        .post("/api/v1/languages")
        .json(&json!({"code": "en", "name": "Anglais"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    // List and search
    server
        .post("/api/v1/languages")
        .json(&json!({"code": "de", "name": "German"}))
        .await;

    let response = server.get("/api/v1/languages").await;
    let all: Vec<Value> = response.json();
    assert_eq!(all.len(), 2);

    let response = server.get("/api/v1/languages?search=Eng").await;
    let matching: Vec<Value> = response.json();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0]["code"], "en");

    // Get and delete
    let response = server
        .get(&format!("/api/v1/languages/{}", language_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .delete(&format!("/api/v1/languages/{}", language_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = server
        .get(&format!("/api/v1/languages/{}", language_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_dataset_language_validation_rules() -> Result<()> {
    let (server, _uploads, _db_file) = setup_test_server().await?;

    let dataset: Value = server
        .post("/api/v1/datasets")
        .json(&json!({"name": "wiki-qa"}))
        .await
        .json();
    let language: Value = server
        .post("/api/v1/languages")
        .json(&json!({"code": "en", "name": "English"}))
        .await
        .json();

    // Unknown language
    let response = server
        .post("/api/v1/dataset-languages")
        .json(&json!({"dataset_id": dataset["id"], "language_id": 999}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // Valid creation
    let response = server
        .post("/api/v1/dataset-languages")
        .json(&json!({"dataset_id": dataset["id"], "language_id": language["id"]}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let created: Value = response.json();
    assert_eq!(created["imported"], false);
    assert!(created["file_path"].is_null());

    // Duplicate (dataset, language) pair
    let response = server
        .post("/api/v1/dataset-languages")
        .json(&json!({"dataset_id": dataset["id"], "language_id": language["id"]}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn test_upload_import_review_export_flow() -> Result<()> {
    let (server, uploads, _db_file) = setup_test_server().await?;

    let dataset: Value = server
        .post("/api/v1/datasets")
        .json(&json!({"name": "wiki-qa"}))
        .await
        .json();
    let language: Value = server
        .post("/api/v1/languages")
        .json(&json!({"code": "en", "name": "English"}))
        .await
        .json();
    let dataset_language: Value = server
        .post("/api/v1/dataset-languages")
        .json(&json!({"dataset_id": dataset["id"], "language_id": language["id"]}))
        .await
        .json();
    let dataset_language_id = dataset_language["id"].as_i64().unwrap();

    // A non-JSON filename is rejected
    let response = server
        .put(&format!(
            "/api/v1/dataset-languages/{}/file?filename=train.csv",
            dataset_language_id
        ))
        .text(r#"[{"a": 1}]"#)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // Upload the dataset file
    let response = server
        .put(&format!(
            "/api/v1/dataset-languages/{}/file?filename=train.json",
            dataset_language_id
        ))
        .text(r#"[{"a": 1}, {"a": 2}]"#)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let uploaded: Value = response.json();
    let file_path = uploaded["file_path"].as_str().unwrap().to_string();
    assert!(uploads.path().join(&file_path).exists());

    // Import
    let response = server
        .post("/api/v1/dataset-languages/actions/import")
        .json(&json!({"ids": [dataset_language_id]}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let outcomes: Vec<Value> = response.json();
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0]["error"].is_null());
    assert_eq!(outcomes[0]["records"], 2);

    // Review: list, inspect, invalidate one record
    let response = server
        .get(&format!(
            "/api/v1/json-objects?dataset_language_id={}",
            dataset_language_id
        ))
        .await;
    let records: Vec<Value> = response.json();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["order_id"], 0);
    assert_eq!(records[1]["order_id"], 1);
    assert_eq!(records[0]["is_valid"], true);

    let record_id = records[0]["id"].as_i64().unwrap();
    let response = server
        .put(&format!("/api/v1/json-objects/{}", record_id))
        .json(&json!({"is_valid": false}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: Value = response.json();
    assert_eq!(updated["is_valid"], false);

    // Records cannot be created through the review surface
    let response = server
        .post("/api/v1/json-objects")
        .json(&json!({"dataset_language_id": dataset_language_id, "json_object": {}}))
        .await;
    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);

    // Export as a downloadable file
    let response = server
        .post("/api/v1/dataset-languages/actions/export")
        .json(&json!({"ids": [dataset_language_id]}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let headers = response.headers();
    let disposition = headers
        .get("content-disposition")
        .expect("attachment header")
        .to_str()?;
    assert!(disposition.contains("wiki-qa_en.json"));

    let exported: Value = serde_json::from_str(&response.text())?;
    assert_eq!(exported, json!([{"a": 1}, {"a": 2}]));

    // Deleting the dataset language releases its backing file
    let response = server
        .delete(&format!("/api/v1/dataset-languages/{}", dataset_language_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    assert!(!uploads.path().join(&file_path).exists());

    let response = server
        .get(&format!(
            "/api/v1/json-objects?dataset_language_id={}",
            dataset_language_id
        ))
        .await;
    let records: Vec<Value> = response.json();
    assert!(records.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_export_action_selection_cardinality() -> Result<()> {
    let (server, _uploads, _db_file) = setup_test_server().await?;

    let response = server
        .post("/api/v1/dataset-languages/actions/export")
        .json(&json!({"ids": []}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.text().contains("exactly one"));

    Ok(())
}

#[tokio::test]
async fn test_aligned_source_document_is_embedded() -> Result<()> {
    let (server, _uploads, _db_file) = setup_test_server().await?;

    let dataset: Value = server
        .post("/api/v1/datasets")
        .json(&json!({"name": "wiki-qa"}))
        .await
        .json();
    let english: Value = server
        .post("/api/v1/languages")
        .json(&json!({"code": "en", "name": "English"}))
        .await
        .json();
    let german: Value = server
        .post("/api/v1/languages")
        .json(&json!({"code": "de", "name": "German"}))
        .await
        .json();

    let source: Value = server
        .post("/api/v1/dataset-languages")
        .json(&json!({"dataset_id": dataset["id"], "language_id": english["id"]}))
        .await
        .json();
    let source_id = source["id"].as_i64().unwrap();

    server
        .put(&format!(
            "/api/v1/dataset-languages/{}/file?filename=en.json",
            source_id
        ))
        .text(r#"[{"x": "y0"}]"#)
        .await;
    server
        .post("/api/v1/dataset-languages/actions/import")
        .json(&json!({"ids": [source_id]}))
        .await;

    let aligned: Value = server
        .post("/api/v1/dataset-languages")
        .json(&json!({
            "dataset_id": dataset["id"],
            "language_id": german["id"],
            "source_id": source_id
        }))
        .await
        .json();
    let aligned_id = aligned["id"].as_i64().unwrap();

    server
        .put(&format!(
            "/api/v1/dataset-languages/{}/file?filename=de.json",
            aligned_id
        ))
        .text(r#"[{"t": "z0"}]"#)
        .await;
    let outcomes: Vec<Value> = server
        .post("/api/v1/dataset-languages/actions/import")
        .json(&json!({"ids": [aligned_id]}))
        .await
        .json();
    assert!(outcomes[0]["error"].is_null());

    let records: Vec<Value> = server
        .get(&format!(
            "/api/v1/json-objects?dataset_language_id={}",
            aligned_id
        ))
        .await
        .json();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["is_valid"], false);

    let record_id = records[0]["id"].as_i64().unwrap();
    let detail: Value = server
        .get(&format!("/api/v1/json-objects/{}", record_id))
        .await
        .json();
    assert_eq!(detail["json_object"], json!({"t": "z0"}));
    assert_eq!(detail["source_json_object"], json!({"x": "y0"}));

    Ok(())
}
