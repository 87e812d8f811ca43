//! voxsite-web library interface
//!
//! Exposes the router and application state for integration testing.

pub mod api;
pub mod catalog;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use catalog::CatalogRefresher;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use voxsite_common::EventBus;

/// Largest accepted upload body. The upload handler enforces the same
/// cap per file; this router-level limit adds headroom for the
/// multipart framing.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Event bus bridged to SSE subscribers
    pub event_bus: EventBus,
    /// Catalog refresh orchestration (manual triggers + flag)
    pub refresher: Arc<CatalogRefresher>,
    /// Folder audio files are served from
    pub audios_path: PathBuf,
    /// Static listing fallback written by the manifest tool
    pub manifest_path: PathBuf,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        event_bus: EventBus,
        refresher: Arc<CatalogRefresher>,
        audios_path: PathBuf,
        manifest_path: PathBuf,
    ) -> Self {
        Self {
            db,
            event_bus,
            refresher,
            audios_path,
            manifest_path,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, patch, post, put};

    let audios_dir = ServeDir::new(&state.audios_path);

    Router::new()
        .merge(api::health_routes())
        .route("/api/audio-files", get(api::list_audio_files))
        .route("/api/audio-files/:filename", delete(api::delete_audio_file))
        .route("/api/upload-audio", post(api::upload_audio))
        .route("/api/catalog", get(api::get_catalog))
        .route("/api/catalog/refresh", post(api::refresh_catalog))
        .route("/api/catalog/auto-refresh", put(api::set_auto_refresh))
        .route("/api/catalog/:id", patch(api::update_catalog_entry))
        .route("/api/speakers", get(api::get_speakers))
        .route("/api/services", get(api::list_services).post(api::create_service))
        .route(
            "/api/services/reorder",
            put(api::reorder_services),
        )
        .route(
            "/api/services/:id",
            put(api::update_service).delete(api::delete_service),
        )
        .route("/api/site-content", get(api::list_site_content))
        .route("/api/site-content/:key", put(api::set_site_content))
        .route("/api/events", get(api::event_stream))
        .route("/audios.json", get(api::serve_manifest))
        .nest_service("/audios", audios_dir)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
