//! Audio file listing, deletion, and the static manifest
//!
//! The listing endpoint is the live source the catalog lister's
//! endpoint chain consumes when the site runs split from its audio
//! host; locally it is backed by the same folder scan.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::catalog::lister::FolderSource;
use crate::{ApiError, ApiResult, AppState};
use voxsite_common::models::AudioFileListing;
use voxsite_common::{is_audio_extension, VoxEvent};

/// GET /api/audio-files
///
/// Live listing of the audios folder: `{ "files": [{name, path, size}] }`.
pub async fn list_audio_files(State(state): State<AppState>) -> ApiResult<Json<AudioFileListing>> {
    let files = FolderSource::new(state.audios_path.clone()).list()?;
    Ok(Json(AudioFileListing { files }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub success: bool,
    pub file_name: String,
}

/// DELETE /api/audio-files/:filename
///
/// Deletes one file from the audios root. Filenames containing path
/// separators or traversal sequences are rejected outright, so only
/// root-level files are deletable through this endpoint.
pub async fn delete_audio_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    validate_deletable_filename(&filename)?;

    let target = state.audios_path.join(&filename);
    if !target.is_file() {
        return Err(ApiError::NotFound(format!("audio file '{}'", filename)));
    }

    std::fs::remove_file(&target)?;
    tracing::info!("Deleted audio file {}", filename);

    state.event_bus.emit_lossy(VoxEvent::AudioDeleted {
        file_name: filename.clone(),
        timestamp: chrono::Utc::now(),
    });

    // Fold the deletion into the catalog right away; a failed refresh
    // only delays the update until the next cycle.
    if let Err(e) = state.refresher.refresh_once().await {
        tracing::warn!("Post-delete catalog refresh failed: {}", e);
    }

    Ok(Json(DeleteResponse {
        success: true,
        file_name: filename,
    }))
}

/// GET /audios.json
///
/// Serves the static manifest when the manifest tool has written one.
pub async fn serve_manifest(State(state): State<AppState>) -> Response {
    match std::fs::read(&state.manifest_path) {
        Ok(bytes) => (
            StatusCode::OK,
            [("content-type", "application/json")],
            bytes,
        )
            .into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Reject traversal sequences, path separators, and non-audio
/// extensions before any filesystem access.
fn validate_deletable_filename(filename: &str) -> ApiResult<()> {
    if filename.is_empty() {
        return Err(ApiError::BadRequest("Empty filename".to_string()));
    }
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(ApiError::BadRequest(format!(
            "Invalid filename '{}': path separators and traversal sequences are not allowed",
            filename
        )));
    }

    let allowed = filename
        .rsplit_once('.')
        .map(|(_, ext)| is_audio_extension(&ext.to_lowercase()))
        .unwrap_or(false);
    if !allowed {
        return Err(ApiError::BadRequest(format!(
            "Invalid filename '{}': extension not in audio allow-list",
            filename
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_audio_filename_accepted() {
        assert!(validate_deletable_filename("vinheta-abertura.mp3").is_ok());
        assert!(validate_deletable_filename("demo.WAV").is_ok());
    }

    #[test]
    fn test_traversal_and_separators_rejected() {
        assert!(validate_deletable_filename("../etc/passwd").is_err());
        assert!(validate_deletable_filename("sub/demo.mp3").is_err());
        assert!(validate_deletable_filename("sub\\demo.mp3").is_err());
        assert!(validate_deletable_filename("..").is_err());
    }

    #[test]
    fn test_non_audio_extension_rejected() {
        assert!(validate_deletable_filename("script.sh").is_err());
        assert!(validate_deletable_filename("noextension").is_err());
        assert!(validate_deletable_filename("demo.mp3.txt").is_err());
    }
}
