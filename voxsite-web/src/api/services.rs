//! Services admin endpoints
//!
//! The reorder endpoint intentionally mirrors the original persistence
//! shape: one independent UPDATE per affected row, no transaction, a
//! post-hoc scan for failures, and client-side resynchronization by
//! re-fetching the authoritative list.

use axum::extract::{Path, State};
use axum::Json;
use futures::future::join_all;
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiError, ApiResult, AppState};
use voxsite_common::db::services as services_db;
use voxsite_common::models::Service;
use voxsite_common::VoxEvent;

/// GET /api/services
pub async fn list_services(State(state): State<AppState>) -> ApiResult<Json<Vec<Service>>> {
    Ok(Json(services_db::list_services(&state.db).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub title: String,
    #[serde(default)]
    pub is_best_seller: bool,
    #[serde(default)]
    pub is_recommended: bool,
}

/// POST /api/services
///
/// New services append at the end of the display order.
pub async fn create_service(
    State(state): State<AppState>,
    Json(request): Json<CreateServiceRequest>,
) -> ApiResult<Json<Service>> {
    if request.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title must not be empty".to_string()));
    }

    let existing = services_db::list_services(&state.db).await?;
    let order_position = existing
        .iter()
        .map(|s| s.order_position)
        .max()
        .map(|max| max + 1)
        .unwrap_or(0);

    let service = Service {
        id: Uuid::new_v4(),
        title: request.title,
        is_best_seller: request.is_best_seller,
        is_recommended: request.is_recommended,
        order_position,
    };
    services_db::insert_service(&state.db, &service).await?;

    state.event_bus.emit_lossy(VoxEvent::ServiceCreated {
        service_id: service.id,
        timestamp: chrono::Utc::now(),
    });

    Ok(Json(service))
}

#[derive(Debug, Deserialize)]
pub struct UpdateServiceRequest {
    pub title: Option<String>,
    pub is_best_seller: Option<bool>,
    pub is_recommended: Option<bool>,
}

/// PUT /api/services/:id
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateServiceRequest>,
) -> ApiResult<Json<Service>> {
    let mut service = services_db::get_service(&state.db, id).await?;

    if let Some(title) = request.title {
        if title.trim().is_empty() {
            return Err(ApiError::BadRequest("title must not be empty".to_string()));
        }
        service.title = title;
    }
    if let Some(flag) = request.is_best_seller {
        service.is_best_seller = flag;
    }
    if let Some(flag) = request.is_recommended {
        service.is_recommended = flag;
    }

    services_db::update_service(&state.db, &service).await?;

    state.event_bus.emit_lossy(VoxEvent::ServiceUpdated {
        service_id: service.id,
        timestamp: chrono::Utc::now(),
    });

    Ok(Json(service))
}

/// DELETE /api/services/:id
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    services_db::delete_service(&state.db, id).await?;

    state.event_bus.emit_lossy(VoxEvent::ServiceDeleted {
        service_id: id,
        timestamp: chrono::Utc::now(),
    });

    Ok(Json(serde_json::json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct ReorderItem {
    pub id: Uuid,
    pub order_position: i64,
}

/// PUT /api/services/reorder
///
/// Body: `[{id, order_position}, ...]` — the full post-drag ordering.
/// Each row is rewritten independently; on partial failure the rows
/// that succeeded stay written and the client re-fetches.
pub async fn reorder_services(
    State(state): State<AppState>,
    Json(items): Json<Vec<ReorderItem>>,
) -> ApiResult<Json<Vec<Service>>> {
    if items.is_empty() {
        return Err(ApiError::BadRequest("Empty reorder batch".to_string()));
    }

    let total = items.len();
    let updates = items
        .iter()
        .map(|item| services_db::set_order_position(&state.db, item.id, item.order_position));
    let results = join_all(updates).await;

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        for error in results.iter().filter_map(|r| r.as_ref().err()) {
            tracing::warn!("Reorder update failed: {}", error);
        }
        return Err(ApiError::PartialBatch { failed, total });
    }

    state.event_bus.emit_lossy(VoxEvent::ServicesReordered {
        count: total,
        timestamp: chrono::Utc::now(),
    });

    // Authoritative post-reorder list, saving the client a round trip
    Ok(Json(services_db::list_services(&state.db).await?))
}
