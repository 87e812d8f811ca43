//! Integration tests for audio file management: listing, upload,
//! deletion, and their validation rules.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
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

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Build a single-file multipart upload request.
fn upload_request(filename: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let boundary = "voxsite-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"audio\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload-audio")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// Plausible MP3 bytes: ID3 tag header followed by junk
const MP3_BYTES: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x00fake-mp3-payload";

#[tokio::test]
async fn test_listing_endpoint_shape() {
    let temp = TempDir::new().unwrap();
    write(&temp.path().join("audios/Artur Sutto/demo.mp3"), b"xx");
    write(&temp.path().join("audios/leiame.txt"), b"not audio");
    let app = setup_app(&temp).await;

    let response = app.oneshot(get("/api/audio-files")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let files = body["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], "Artur Sutto/demo.mp3");
    assert_eq!(files[0]["path"], "/audios/Artur Sutto/demo.mp3");
    assert_eq!(files[0]["size"], 2);
}

#[tokio::test]
async fn test_upload_stores_file_and_updates_catalog() {
    let temp = TempDir::new().unwrap();
    let app = setup_app(&temp).await;

    let response = app
        .clone()
        .oneshot(upload_request("spot-natal.mp3", "audio/mpeg", MP3_BYTES))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["fileName"], "spot-natal.mp3");
    assert_eq!(body["originalName"], "spot-natal.mp3");
    assert_eq!(body["path"], "/audios/spot-natal.mp3");
    assert_eq!(body["size"], MP3_BYTES.len() as u64);

    assert!(temp.path().join("audios/spot-natal.mp3").is_file());

    // The post-upload refresh already folded it into the catalog
    let response = app.oneshot(get("/api/catalog")).await.unwrap();
    let catalog = body_json(response).await;
    assert_eq!(catalog[0]["file_path"], "spot-natal.mp3");
    assert_eq!(catalog[0]["title"], "Spot Natal");
}

#[tokio::test]
async fn test_upload_strips_client_path_components() {
    let temp = TempDir::new().unwrap();
    let app = setup_app(&temp).await;

    let response = app
        .oneshot(upload_request(
            "C:\\demos\\..\\gravacao.mp3",
            "audio/mpeg",
            MP3_BYTES,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["fileName"], "gravacao.mp3");
    assert!(temp.path().join("audios/gravacao.mp3").is_file());
}

#[tokio::test]
async fn test_upload_rejects_wrong_mime_type() {
    let temp = TempDir::new().unwrap();
    let app = setup_app(&temp).await;

    let response = app
        .oneshot(upload_request("demo.mp3", "text/plain", MP3_BYTES))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_upload_rejects_non_audio_content() {
    let temp = TempDir::new().unwrap();
    let app = setup_app(&temp).await;

    let response = app
        .oneshot(upload_request(
            "script-disfarcado.mp3",
            "audio/mpeg",
            b"#!/bin/sh\necho gotcha",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_rejects_disallowed_extension() {
    let temp = TempDir::new().unwrap();
    let app = setup_app(&temp).await;

    let response = app
        .oneshot(upload_request("demo.flac", "audio/mpeg", MP3_BYTES))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_uniquifies_colliding_names() {
    let temp = TempDir::new().unwrap();
    write(&temp.path().join("audios/demo.mp3"), MP3_BYTES);
    let app = setup_app(&temp).await;

    let response = app
        .oneshot(upload_request("demo.mp3", "audio/mpeg", MP3_BYTES))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let stored = body["fileName"].as_str().unwrap();
    assert_ne!(stored, "demo.mp3");
    assert!(stored.starts_with("demo-"));
    assert!(stored.ends_with(".mp3"));
    // Original untouched
    assert!(temp.path().join("audios/demo.mp3").is_file());
}

#[tokio::test]
async fn test_delete_removes_file_and_catalog_entry() {
    let temp = TempDir::new().unwrap();
    write(&temp.path().join("audios/velho.mp3"), MP3_BYTES);
    let app = setup_app(&temp).await;

    // Prime catalog
    app.clone().oneshot(get("/api/catalog")).await.unwrap();

    let response = app
        .clone()
        .oneshot(delete("/api/audio-files/velho.mp3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!temp.path().join("audios/velho.mp3").exists());

    let response = app.oneshot(get("/api/catalog")).await.unwrap();
    let catalog = body_json(response).await;
    assert!(catalog.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_rejects_traversal_names() {
    let temp = TempDir::new().unwrap();
    let app = setup_app(&temp).await;

    let response = app
        .clone()
        .oneshot(delete("/api/audio-files/..%2F..%2Fvoxsite.db"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(delete("/api/audio-files/demo..mp3.txt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_missing_file_is_404() {
    let temp = TempDir::new().unwrap();
    let app = setup_app(&temp).await;

    let response = app
        .oneshot(delete("/api/audio-files/fantasma.mp3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
