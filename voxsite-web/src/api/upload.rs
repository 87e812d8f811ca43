//! Audio upload endpoint
//!
//! Multipart, single file field. Validation happens before anything
//! touches disk: MIME allow-list, extension allow-list, size cap, and
//! a magic-byte sniff so a renamed non-audio file cannot sneak in.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::{ApiError, ApiResult, AppState, MAX_UPLOAD_BYTES};
use voxsite_common::{is_audio_extension, VoxEvent};

/// Accepted upload content types.
const ALLOWED_MIME_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/x-wav",
    "audio/wave",
    "audio/ogg",
    "audio/mp4",
    "audio/x-m4a",
    "audio/aac",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub file_name: String,
    pub original_name: String,
    pub size: u64,
    pub path: String,
}

/// POST /api/upload-audio
pub async fn upload_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart.next_field().await? {
        let Some(original_name) = field.file_name().map(|s| s.to_string()) else {
            // Not a file field; keep looking
            continue;
        };

        let content_type = field.content_type().unwrap_or("").to_string();
        if !ALLOWED_MIME_TYPES.contains(&content_type.as_str()) {
            return Err(ApiError::BadRequest(format!(
                "Content type '{}' is not an accepted audio type",
                content_type
            )));
        }

        let data = field.bytes().await?;
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::BadRequest(format!(
                "File too large: {} bytes (max {})",
                data.len(),
                MAX_UPLOAD_BYTES
            )));
        }
        if !sniff_is_audio(&data) {
            return Err(ApiError::BadRequest(
                "File content does not look like a supported audio format".to_string(),
            ));
        }

        let sanitized = sanitize_file_name(&original_name)?;
        let stored_name = unique_name(&state, &sanitized);
        let target = state.audios_path.join(&stored_name);

        std::fs::create_dir_all(&state.audios_path)?;
        std::fs::write(&target, &data)?;
        tracing::info!(
            "Uploaded audio file {} ({} bytes) as {}",
            original_name,
            data.len(),
            stored_name
        );

        state.event_bus.emit_lossy(VoxEvent::AudioUploaded {
            file_name: stored_name.clone(),
            size: data.len() as u64,
            timestamp: chrono::Utc::now(),
        });

        if let Err(e) = state.refresher.refresh_once().await {
            tracing::warn!("Post-upload catalog refresh failed: {}", e);
        }

        return Ok(Json(UploadResponse {
            success: true,
            path: format!("/audios/{}", stored_name),
            size: data.len() as u64,
            file_name: stored_name,
            original_name,
        }));
    }

    Err(ApiError::BadRequest("No file field in upload".to_string()))
}

/// Strip any client-sent path components and check the extension.
fn sanitize_file_name(original: &str) -> ApiResult<String> {
    let leaf = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original)
        .trim();

    if leaf.is_empty() || leaf == "." || leaf == ".." {
        return Err(ApiError::BadRequest("Invalid file name".to_string()));
    }

    let allowed = leaf
        .rsplit_once('.')
        .map(|(_, ext)| is_audio_extension(&ext.to_lowercase()))
        .unwrap_or(false);
    if !allowed {
        return Err(ApiError::BadRequest(format!(
            "File extension of '{}' is not in the audio allow-list",
            leaf
        )));
    }

    Ok(leaf.to_string())
}

/// Keep stored names collision-free without clobbering existing demos.
fn unique_name(state: &AppState, sanitized: &str) -> String {
    if !state.audios_path.join(sanitized).exists() {
        return sanitized.to_string();
    }
    let (stem, ext) = sanitized.rsplit_once('.').unwrap_or((sanitized, ""));
    let tag = Uuid::new_v4().simple().to_string();
    format!("{}-{}.{}", stem, &tag[..8], ext)
}

/// Magic-byte verification for the accepted audio formats.
fn sniff_is_audio(data: &[u8]) -> bool {
    if data.len() < 4 {
        return false;
    }

    match data {
        // MP3 (bare frames or ID3 tag)
        [0xFF, 0xFB, ..] | [0xFF, 0xF3, ..] | [0xFF, 0xF2, ..] => true,
        [b'I', b'D', b'3', ..] => true,

        // AAC in ADTS framing
        [0xFF, 0xF1, ..] | [0xFF, 0xF9, ..] => true,

        // OGG (Vorbis/Opus)
        [b'O', b'g', b'g', b'S', ..] => true,

        // M4A/AAC (MP4 container)
        [_, _, _, _, b'f', b't', b'y', b'p', ..] => true,

        // WAV
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E', ..] => true,

        _ => false,
    }
}
