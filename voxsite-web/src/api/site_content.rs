//! Editable site text endpoints

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::{ApiResult, AppState};
use voxsite_common::db::site_content as content_db;
use voxsite_common::VoxEvent;

/// GET /api/site-content
pub async fn list_site_content(
    State(state): State<AppState>,
) -> ApiResult<Json<BTreeMap<String, String>>> {
    Ok(Json(content_db::list_content(&state.db).await?))
}

#[derive(Debug, Deserialize)]
pub struct SetContentRequest {
    pub value: String,
}

/// PUT /api/site-content/:key
pub async fn set_site_content(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<SetContentRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    content_db::set_content(&state.db, &key, &request.value).await?;

    state.event_bus.emit_lossy(VoxEvent::SiteContentUpdated {
        key: key.clone(),
        timestamp: chrono::Utc::now(),
    });

    Ok(Json(serde_json::json!({ "success": true, "key": key })))
}
