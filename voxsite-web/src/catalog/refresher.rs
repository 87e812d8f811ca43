//! Periodic catalog refresh
//!
//! Drives the list → reconcile → persist → broadcast cycle, both on a
//! fixed interval (admin auto-refresh) and on demand (manual refresh,
//! initial load, post-upload/delete).
//!
//! Cycles are serialized: a periodic tick that finds a cycle already
//! in flight is skipped rather than queued, so two reconciliations can
//! never race on the persistence slot.

use super::lister::FileLister;
use super::reconciler::reconcile;
use super::store::CatalogStore;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use voxsite_common::models::AudioEntry;
use voxsite_common::{EventBus, Result, VoxEvent};

/// Default interval between automatic refresh cycles.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Owns the refresh cycle and its scheduling state.
pub struct CatalogRefresher {
    lister: FileLister,
    store: CatalogStore,
    event_bus: EventBus,
    interval: Duration,
    auto_refresh: AtomicBool,
    cycle: Mutex<()>,
}

impl CatalogRefresher {
    pub fn new(
        lister: FileLister,
        store: CatalogStore,
        event_bus: EventBus,
        interval: Duration,
    ) -> Self {
        Self {
            lister,
            store,
            event_bus,
            interval,
            auto_refresh: AtomicBool::new(true),
            cycle: Mutex::new(()),
        }
    }

    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh.load(Ordering::Relaxed)
    }

    pub fn set_auto_refresh(&self, enabled: bool) {
        self.auto_refresh.store(enabled, Ordering::Relaxed);
        self.event_bus.emit_lossy(VoxEvent::AutoRefreshChanged {
            enabled,
            timestamp: chrono::Utc::now(),
        });
    }

    /// Run one refresh cycle, waiting for any in-flight cycle first.
    ///
    /// Used by manual triggers (refresh button, initial load, upload
    /// and delete follow-ups) where the caller wants the result.
    pub async fn refresh_once(&self) -> Result<Vec<AudioEntry>> {
        let _guard = self.cycle.lock().await;
        self.run_cycle().await
    }

    /// One periodic tick: skipped when auto-refresh is off or a cycle
    /// is already in flight.
    async fn tick(&self) {
        if !self.auto_refresh() {
            return;
        }
        let Ok(_guard) = self.cycle.try_lock() else {
            tracing::debug!("Refresh cycle in flight; skipping tick");
            return;
        };
        if let Err(e) = self.run_cycle().await {
            tracing::warn!("Periodic catalog refresh failed: {}", e);
        }
    }

    /// Interval loop. Runs until `token` is cancelled; exactly one of
    /// these should be alive per process.
    pub async fn run(&self, token: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick of a tokio interval fires immediately; the
        // startup refresh already covered that.
        interval.tick().await;

        tracing::info!(
            "Catalog refresher started (interval {}s)",
            self.interval.as_secs()
        );

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!("Catalog refresher stopped");
                    break;
                }
                _ = interval.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    /// list → guard → reconcile → save → broadcast. Caller holds the
    /// cycle lock.
    async fn run_cycle(&self) -> Result<Vec<AudioEntry>> {
        let previous = self.store.load().await?.unwrap_or_default();

        let mut listing = self.lister.list().await?;

        // An empty listing while the catalog is non-empty empties the
        // whole catalog, which is destructive if the source blipped.
        // Re-list once; only a second consecutive empty result is
        // accepted as authoritative.
        if listing.is_empty() && !previous.is_empty() {
            tracing::warn!(
                "Listing came back empty with {} cataloged entries; re-listing before accepting",
                previous.len()
            );
            listing = self.lister.list().await?;
        }

        let paths: Vec<String> = listing.into_iter().map(|f| f.name).collect();
        let catalog = reconcile(&paths, &previous);

        self.store.save(&catalog).await?;

        let previous_paths: HashSet<&str> =
            previous.iter().map(|e| e.file_path.as_str()).collect();
        let current_paths: HashSet<&str> =
            catalog.iter().map(|e| e.file_path.as_str()).collect();
        let added = current_paths.difference(&previous_paths).count();
        let removed = previous_paths.difference(&current_paths).count();
        let kept = catalog.len() - added;

        if added > 0 || removed > 0 {
            tracing::info!(
                "Catalog reconciled: {} added, {} removed, {} kept",
                added,
                removed,
                kept
            );
        }

        self.event_bus.emit_lossy(VoxEvent::CatalogReconciled {
            added,
            removed,
            kept,
            total: catalog.len(),
            timestamp: chrono::Utc::now(),
        });

        Ok(catalog)
    }
}
