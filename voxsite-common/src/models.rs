//! Persisted and wire-level domain models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One playable file known to the audio catalog.
///
/// `file_path` is the natural key: two entries with the same path are
/// the same logical audio, and reconciliation never emits duplicates.
/// `order` is assigned once at discovery and preserved afterwards, so
/// user-visible ordering survives refreshes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioEntry {
    /// Opaque stable identifier, assigned at first discovery
    pub id: Uuid,
    /// Display title; derived from the file name unless user-edited
    pub title: String,
    /// Optional free text shown under the player
    #[serde(default)]
    pub description: Option<String>,
    /// Relative path including any subfolder prefix (forward slashes)
    pub file_path: String,
    /// Monotonically increasing discovery counter, scoped to the catalog
    pub order: i64,
    /// Absolute URL when the audio is hosted remotely instead of being
    /// served from the local audios folder
    #[serde(default)]
    pub remote_url: Option<String>,
}

impl AudioEntry {
    /// Web-servable URL for this entry. Derived on demand, never stored.
    pub fn resolved_url(&self) -> String {
        match &self.remote_url {
            Some(url) => url.clone(),
            None => format!("/audios/{}", self.file_path),
        }
    }
}

/// Wire shape of a listed audio file, shared by every listing source
/// and by the `/api/audio-files` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFileInfo {
    /// Relative path, subfolder-prefixed, forward-slash separated
    pub name: String,
    /// Web-servable path under `/audios/`
    pub path: String,
    /// File size in bytes (0 when the source cannot know it)
    #[serde(default)]
    pub size: u64,
}

impl AudioFileInfo {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        let name = name.into();
        let path = format!("/audios/{}", name);
        Self { name, path, size }
    }
}

/// Envelope of the listing endpoint and the static manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFileListing {
    pub files: Vec<AudioFileInfo>,
}

/// A service offered by the studio, shown on the landing page and
/// managed from the admin panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub title: String,
    pub is_best_seller: bool,
    pub is_recommended: bool,
    /// Display ordering; rewritten row-by-row after a drag gesture
    pub order_position: i64,
}

/// Grouping view over the catalog by top-level folder segment.
/// Recomputed from the current catalog on every read, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct SpeakerGroup {
    pub speaker: String,
    pub entries: Vec<AudioEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_url_local() {
        let entry = AudioEntry {
            id: Uuid::new_v4(),
            title: "Demo".to_string(),
            description: None,
            file_path: "Artur Sutto/demo.mp3".to_string(),
            order: 1,
            remote_url: None,
        };
        assert_eq!(entry.resolved_url(), "/audios/Artur Sutto/demo.mp3");
    }

    #[test]
    fn test_resolved_url_remote_wins() {
        let entry = AudioEntry {
            id: Uuid::new_v4(),
            title: "Demo".to_string(),
            description: None,
            file_path: "demo.mp3".to_string(),
            order: 1,
            remote_url: Some("https://cdn.example.com/demo.mp3".to_string()),
        };
        assert_eq!(entry.resolved_url(), "https://cdn.example.com/demo.mp3");
    }

    /// Older persisted shapes without the optional fields must load
    /// with defaults instead of failing.
    #[test]
    fn test_audio_entry_deserializes_without_optional_fields() {
        let json = r#"{
            "id": "8b9f4a8e-6f4e-4f7e-9b8a-2f1d3c4b5a69",
            "title": "Spot Varejo",
            "file_path": "spot-varejo.mp3",
            "order": 3
        }"#;
        let entry: AudioEntry = serde_json::from_str(json).expect("deserialize");
        assert_eq!(entry.description, None);
        assert_eq!(entry.remote_url, None);
        assert_eq!(entry.order, 3);
    }

    #[test]
    fn test_audio_file_info_path_prefix() {
        let info = AudioFileInfo::new("Geral/vinheta.wav", 2048);
        assert_eq!(info.path, "/audios/Geral/vinheta.wav");
        assert_eq!(info.size, 2048);
    }
}
