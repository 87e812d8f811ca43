//! Catalog read and management endpoints

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::speakers::group_by_speaker;
use crate::{ApiResult, AppState};
use voxsite_common::models::{AudioEntry, SpeakerGroup};
use voxsite_common::VoxEvent;

/// Catalog entry as served to clients: the persisted entry plus the
/// derived playback URL.
#[derive(Debug, Serialize)]
pub struct CatalogEntryResponse {
    #[serde(flatten)]
    pub entry: AudioEntry,
    pub resolved_url: String,
}

impl From<AudioEntry> for CatalogEntryResponse {
    fn from(entry: AudioEntry) -> Self {
        let resolved_url = entry.resolved_url();
        Self { entry, resolved_url }
    }
}

/// Load the persisted catalog, reconciling first when no snapshot
/// exists yet (first request after a fresh install).
async fn load_or_refresh(state: &AppState) -> ApiResult<Vec<AudioEntry>> {
    let store = crate::catalog::CatalogStore::new(state.db.clone());
    match store.load().await? {
        Some(catalog) => Ok(catalog),
        None => Ok(state.refresher.refresh_once().await?),
    }
}

/// GET /api/catalog
pub async fn get_catalog(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CatalogEntryResponse>>> {
    let catalog = load_or_refresh(&state).await?;
    Ok(Json(catalog.into_iter().map(Into::into).collect()))
}

/// POST /api/catalog/refresh
///
/// Manual refresh trigger; waits for any in-flight cycle, then runs
/// its own and returns the fresh catalog.
pub async fn refresh_catalog(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CatalogEntryResponse>>> {
    let catalog = state.refresher.refresh_once().await?;
    Ok(Json(catalog.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Deserialize)]
pub struct AutoRefreshRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct AutoRefreshResponse {
    pub enabled: bool,
}

/// PUT /api/catalog/auto-refresh
pub async fn set_auto_refresh(
    State(state): State<AppState>,
    Json(request): Json<AutoRefreshRequest>,
) -> Json<AutoRefreshResponse> {
    state.refresher.set_auto_refresh(request.enabled);
    Json(AutoRefreshResponse {
        enabled: request.enabled,
    })
}

#[derive(Debug, Deserialize)]
pub struct UpdateEntryRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// PATCH /api/catalog/:id
///
/// Admin edit of one entry's display fields. The edit is persisted in
/// the catalog snapshot, so reconciliation carries it forward.
pub async fn update_catalog_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEntryRequest>,
) -> ApiResult<Json<CatalogEntryResponse>> {
    let store = crate::catalog::CatalogStore::new(state.db.clone());
    let updated = store
        .update_entry(id, request.title, request.description)
        .await?;

    state.event_bus.emit_lossy(VoxEvent::CatalogEntryUpdated {
        entry_id: updated.id,
        file_path: updated.file_path.clone(),
        timestamp: chrono::Utc::now(),
    });

    Ok(Json(updated.into()))
}

/// GET /api/speakers
///
/// Catalog grouped by speaker, recomputed per request.
pub async fn get_speakers(State(state): State<AppState>) -> ApiResult<Json<Vec<SpeakerGroup>>> {
    let catalog = load_or_refresh(&state).await?;
    Ok(Json(group_by_speaker(&catalog)))
}
