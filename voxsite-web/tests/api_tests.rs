//! Integration tests for the voxsite-web API
//!
//! Covers health, catalog read/refresh/edit, speaker grouping,
//! auto-refresh toggling, and site content.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

use voxsite_common::db::init_memory_pool;
use voxsite_common::events::EventBus;
use voxsite_web::catalog::{CatalogRefresher, CatalogStore, FileLister};
use voxsite_web::{build_router, AppState};

/// Test app over an in-memory database and a temp audios folder.
/// The TempDir must stay alive for the duration of the test.
async fn setup_app(audios: &TempDir) -> axum::Router {
    let db = init_memory_pool().await.unwrap();
    let event_bus = EventBus::new(100);

    let audios_path = audios.path().join("audios");
    fs::create_dir_all(&audios_path).unwrap();
    let manifest_path = audios.path().join("audios.json");

    let lister = FileLister::new(audios_path.clone(), manifest_path.clone(), None);
    let store = CatalogStore::new(db.clone());
    let refresher = Arc::new(CatalogRefresher::new(
        lister,
        store,
        event_bus.clone(),
        Duration::from_secs(3600),
    ));

    let state = AppState::new(db, event_bus, refresher, audios_path, manifest_path);
    build_router(state)
}

fn write(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, bytes).unwrap();
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

#[tokio::test]
async fn test_health_endpoint() {
    let temp = TempDir::new().unwrap();
    let app = setup_app(&temp).await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "voxsite-web");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_catalog_starts_from_folder_contents() {
    let temp = TempDir::new().unwrap();
    write(&temp.path().join("audios/Artur Sutto/demo.mp3"), b"x");
    write(&temp.path().join("audios/vinheta.mp3"), b"x");
    let app = setup_app(&temp).await;

    let response = app.oneshot(get("/api/catalog")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    // Newest-first: highest order leads
    assert_eq!(entries[0]["file_path"], "vinheta.mp3");
    assert_eq!(entries[0]["order"], 2);
    assert_eq!(entries[0]["resolved_url"], "/audios/vinheta.mp3");
    assert_eq!(entries[1]["title"], "Demo");
}

#[tokio::test]
async fn test_manual_refresh_picks_up_new_files() {
    let temp = TempDir::new().unwrap();
    write(&temp.path().join("audios/a.mp3"), b"x");
    let app = setup_app(&temp).await;

    let response = app.clone().oneshot(get("/api/catalog")).await.unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    write(&temp.path().join("audios/b.mp3"), b"x");
    let response = app
        .oneshot(json_request("POST", "/api/catalog/refresh", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["file_path"], "b.mp3");
}

#[tokio::test]
async fn test_catalog_entry_edit_survives_refresh() {
    let temp = TempDir::new().unwrap();
    write(&temp.path().join("audios/spot.mp3"), b"x");
    let app = setup_app(&temp).await;

    let response = app.clone().oneshot(get("/api/catalog")).await.unwrap();
    let body = body_json(response).await;
    let id = body[0]["id"].as_str().unwrap().to_string();

    // Edit title and description
    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/catalog/{}", id),
            json!({"title": "Título editado", "description": "2024"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["title"], "Título editado");

    // A refresh must carry the edit forward verbatim
    let response = app
        .oneshot(json_request("POST", "/api/catalog/refresh", json!({})))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body[0]["title"], "Título editado");
    assert_eq!(body[0]["description"], "2024");
}

#[tokio::test]
async fn test_catalog_entry_edit_unknown_id_is_404() {
    let temp = TempDir::new().unwrap();
    write(&temp.path().join("audios/spot.mp3"), b"x");
    let app = setup_app(&temp).await;

    // Prime the catalog
    app.clone().oneshot(get("/api/catalog")).await.unwrap();

    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/api/catalog/{}", uuid::Uuid::new_v4()),
            json!({"title": "x"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_speakers_view_groups_by_folder() {
    let temp = TempDir::new().unwrap();
    write(&temp.path().join("audios/Artur Sutto/a.mp3"), b"x");
    write(&temp.path().join("audios/Artur Sutto/b.mp3"), b"x");
    write(&temp.path().join("audios/solto.mp3"), b"x");
    let app = setup_app(&temp).await;

    let response = app.oneshot(get("/api/speakers")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let groups = body.as_array().unwrap();
    assert_eq!(groups.len(), 2);
    // Ungrouped sentinel trails the named speaker
    assert_eq!(groups[1]["speaker"], "Geral");
    let artur = &groups[0];
    assert_eq!(artur["speaker"], "Artur Sutto");
    assert_eq!(artur["entries"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_auto_refresh_toggle() {
    let temp = TempDir::new().unwrap();
    let app = setup_app(&temp).await;

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/catalog/auto-refresh",
            json!({"enabled": false}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["enabled"], false);
}

#[tokio::test]
async fn test_site_content_round_trip() {
    let temp = TempDir::new().unwrap();
    let app = setup_app(&temp).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/site-content/hero_title",
            json!({"value": "Locução profissional"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/site-content")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["hero_title"], "Locução profissional");
}

#[tokio::test]
async fn test_manifest_endpoint() {
    let temp = TempDir::new().unwrap();
    let app = setup_app(&temp).await;

    // Absent manifest → 404
    let response = app.clone().oneshot(get("/audios.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Written manifest → served as JSON
    write(
        &temp.path().join("audios.json"),
        br#"{"files":[{"name":"a.mp3","path":"/audios/a.mp3","size":1}]}"#,
    );
    let response = app.oneshot(get("/audios.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["files"][0]["name"], "a.mp3");
}

#[tokio::test]
async fn test_static_audio_serving() {
    let temp = TempDir::new().unwrap();
    write(&temp.path().join("audios/vinheta.mp3"), b"ID3fakebytes");
    let app = setup_app(&temp).await;

    let response = app.oneshot(get("/audios/vinheta.mp3")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
