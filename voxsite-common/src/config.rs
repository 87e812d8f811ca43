//! Configuration loading and root folder resolution
//!
//! The root folder holds everything the site owns on disk: the SQLite
//! database, the served `audios/` tree, and the static manifest.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable consulted when no CLI argument is given.
pub const ROOT_ENV_VAR: &str = "VOXSITE_ROOT";

/// Root folder resolution, priority order:
/// 1. Command-line argument (highest priority)
/// 2. `VOXSITE_ROOT` environment variable
/// 3. `root_folder` key in the platform config file
/// 4. OS-dependent compiled default (fallback)
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>) -> Self {
        Self { cli_arg }
    }

    /// Resolve the root folder without touching the filesystem.
    pub fn resolve(&self) -> PathBuf {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        // Priority 3: TOML config file
        if let Ok(config_path) = config_file_path() {
            if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
                if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                    if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                        return PathBuf::from(root_folder);
                    }
                }
            }
        }

        // Priority 4: OS-dependent compiled default
        default_root_folder()
    }
}

/// Prepares a resolved root folder for use and exposes the well-known
/// paths inside it.
pub struct RootFolderInitializer {
    root: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create the root folder and its `audios/` subfolder if missing.
    pub fn ensure_directories_exist(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.audios_path())?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the shared SQLite database.
    pub fn database_path(&self) -> PathBuf {
        self.root.join("voxsite.db")
    }

    /// Folder the audio demos are served from.
    pub fn audios_path(&self) -> PathBuf {
        self.root.join("audios")
    }

    /// Precomputed static listing fallback.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("audios.json")
    }
}

/// Platform config file location (`voxsite/config.toml` under the
/// user config dir, with `/etc/voxsite/config.toml` as Linux fallback).
fn config_file_path() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("voxsite").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/voxsite/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("voxsite"))
        .unwrap_or_else(|| PathBuf::from("./voxsite_data"))
}
