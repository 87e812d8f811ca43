//! Audio file listing with fallback-chain sourcing
//!
//! Sources are tried in a fixed order; the first one that responds
//! successfully wins and results are never merged across sources. A
//! failing source logs a warning and falls through to the next.

use std::path::{Path, PathBuf};
use voxsite_common::models::{AudioFileInfo, AudioFileListing};
use voxsite_common::{is_audio_extension, Error, Result};
use walkdir::WalkDir;

/// Last-resort listing used when every other source fails.
///
/// Compiled in and therefore potentially stale; serving it keeps the
/// site functional with whatever demos shipped with the build.
const FALLBACK_FILES: &[&str] = &[
    "Artur Sutto/locucao-institucional.mp3",
    "Artur Sutto/spot-varejo.mp3",
    "Artur Sutto/audiobook-trecho.mp3",
    "vinheta-abertura.mp3",
];

/// One way of obtaining the current audio file listing.
pub enum ListingSource {
    /// Live HTTP listing endpoint (remote-hosted audio)
    Endpoint(EndpointSource),
    /// Walk of the local audios folder
    Folder(FolderSource),
    /// Precomputed static manifest (`audios.json`)
    Manifest(ManifestSource),
    /// Compiled-in fallback list
    Fallback,
}

impl ListingSource {
    pub fn name(&self) -> &'static str {
        match self {
            ListingSource::Endpoint(_) => "endpoint",
            ListingSource::Folder(_) => "folder",
            ListingSource::Manifest(_) => "manifest",
            ListingSource::Fallback => "fallback",
        }
    }

    pub async fn list(&self) -> Result<Vec<AudioFileInfo>> {
        match self {
            ListingSource::Endpoint(source) => source.list().await,
            ListingSource::Folder(source) => source.list(),
            ListingSource::Manifest(source) => source.list(),
            ListingSource::Fallback => {
                tracing::warn!(
                    "Serving compiled-in fallback audio list ({} files); contents may be stale",
                    FALLBACK_FILES.len()
                );
                Ok(FALLBACK_FILES
                    .iter()
                    .map(|name| AudioFileInfo::new(*name, 0))
                    .collect())
            }
        }
    }
}

/// Fetches `{ "files": [...] }` from a configured listing URL.
pub struct EndpointSource {
    url: String,
    client: reqwest::Client,
}

impl EndpointSource {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }

    async fn list(&self) -> Result<Vec<AudioFileInfo>> {
        let unavailable = |reason: String| Error::SourceUnavailable {
            source_name: "endpoint".to_string(),
            reason,
        };

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(unavailable(format!("status {}", response.status())));
        }

        let listing: AudioFileListing = response
            .json()
            .await
            .map_err(|e| unavailable(format!("bad listing body: {}", e)))?;

        Ok(listing.files)
    }
}

/// Walks the audios folder: root files plus one level of subfolders,
/// filtered by the audio extension allow-list.
pub struct FolderSource {
    root: PathBuf,
}

impl FolderSource {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn list(&self) -> Result<Vec<AudioFileInfo>> {
        if !self.root.is_dir() {
            return Err(Error::SourceUnavailable {
                source_name: "folder".to_string(),
                reason: format!("audios folder missing: {}", self.root.display()),
            });
        }

        let mut files = Vec::new();

        // max_depth(2): the root itself plus one subfolder level.
        for entry in WalkDir::new(&self.root).follow_links(false).max_depth(2) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }

            let has_audio_ext = entry
                .path()
                .extension()
                .map(|ext| is_audio_extension(&ext.to_string_lossy().to_lowercase()))
                .unwrap_or(false);
            if !has_audio_ext {
                continue;
            }

            let Some(name) = relative_name(entry.path(), &self.root) else {
                continue;
            };
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            files.push(AudioFileInfo::new(name, size));
        }

        // Lexicographic order keeps discovery (and therefore order
        // assignment) deterministic across scans.
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }
}

/// Forward-slash relative path of `path` under `root`.
fn relative_name(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Reads the build-time `audios.json` manifest.
pub struct ManifestSource {
    path: PathBuf,
}

impl ManifestSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn list(&self) -> Result<Vec<AudioFileInfo>> {
        let unavailable = |reason: String| Error::SourceUnavailable {
            source_name: "manifest".to_string(),
            reason,
        };

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| unavailable(format!("{}: {}", self.path.display(), e)))?;
        let listing: AudioFileListing =
            serde_json::from_str(&content).map_err(|e| unavailable(format!("bad manifest: {}", e)))?;
        Ok(listing.files)
    }
}

/// Ordered fallback chain over listing sources.
pub struct FileLister {
    sources: Vec<ListingSource>,
}

impl FileLister {
    /// Standard chain: optional remote endpoint, then the local folder
    /// scan, then the static manifest, then the compiled-in fallback.
    pub fn new(audios_path: PathBuf, manifest_path: PathBuf, listing_url: Option<String>) -> Self {
        let mut sources = Vec::new();
        if let Some(url) = listing_url {
            sources.push(ListingSource::Endpoint(EndpointSource::new(url)));
        }
        sources.push(ListingSource::Folder(FolderSource::new(audios_path)));
        sources.push(ListingSource::Manifest(ManifestSource::new(manifest_path)));
        sources.push(ListingSource::Fallback);
        Self { sources }
    }

    /// Custom chain, mainly for tests.
    pub fn with_sources(sources: Vec<ListingSource>) -> Self {
        Self { sources }
    }

    /// Return the listing of the first source that succeeds.
    ///
    /// Failures fall through silently (warn-level log only); the
    /// compiled-in fallback at the end of the standard chain means the
    /// standard lister never errors.
    pub async fn list(&self) -> Result<Vec<AudioFileInfo>> {
        let mut last_error = Error::SourceUnavailable {
            source_name: "none".to_string(),
            reason: "no listing sources configured".to_string(),
        };

        for source in &self.sources {
            match source.list().await {
                Ok(files) => {
                    tracing::debug!(
                        "Listing source '{}' returned {} files",
                        source.name(),
                        files.len()
                    );
                    return Ok(files);
                }
                Err(e) => {
                    tracing::warn!("Listing source '{}' failed: {}", source.name(), e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}
