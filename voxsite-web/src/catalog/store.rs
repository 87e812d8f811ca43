//! Catalog persistence
//!
//! The reconciled catalog lives as serialized JSON in a single
//! settings row. The store is a handle passed to whoever needs it;
//! there is no ambient global.

use sqlx::SqlitePool;
use uuid::Uuid;
use voxsite_common::db::settings;
use voxsite_common::models::AudioEntry;
use voxsite_common::{Error, Result, CATALOG_SETTING_KEY};

/// Fixed settings key holding the serialized catalog.
pub const CATALOG_KEY: &str = CATALOG_SETTING_KEY;

/// Handle to the persisted catalog slot.
#[derive(Clone)]
pub struct CatalogStore {
    db: SqlitePool,
}

impl CatalogStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Load the last-reconciled catalog. `None` before the first save.
    pub async fn load(&self) -> Result<Option<Vec<AudioEntry>>> {
        settings::get_setting(&self.db, CATALOG_KEY).await
    }

    /// Persist the catalog, replacing the previous snapshot.
    pub async fn save(&self, catalog: &[AudioEntry]) -> Result<()> {
        settings::set_setting(&self.db, CATALOG_KEY, catalog).await
    }

    /// Apply an admin edit to one entry's title and/or description and
    /// persist the updated catalog. Edited fields survive later
    /// reconciliations because carry-forward preserves entries verbatim.
    pub async fn update_entry(
        &self,
        id: Uuid,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<AudioEntry> {
        let mut catalog = self
            .load()
            .await?
            .ok_or_else(|| Error::NotFound("catalog not yet reconciled".to_string()))?;

        let entry = catalog
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| Error::NotFound(format!("catalog entry {}", id)))?;

        if let Some(title) = title {
            if title.trim().is_empty() {
                return Err(Error::InvalidInput("title must not be empty".to_string()));
            }
            entry.title = title;
        }
        if let Some(description) = description {
            entry.description = if description.is_empty() {
                None
            } else {
                Some(description)
            };
        }

        let updated = entry.clone();
        self.save(&catalog).await?;
        Ok(updated)
    }
}
