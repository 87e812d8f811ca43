//! Event types for the VoxSite event system
//!
//! Provides shared event definitions and the EventBus used by the web
//! service and its SSE bridge.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// VoxSite event types
///
/// Events are broadcast via EventBus and serialized for SSE transmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VoxEvent {
    /// Audio catalog was reconciled against a fresh file listing
    ///
    /// Triggers:
    /// - SSE: Re-render catalog and speaker views
    /// - Admin UI: Update file counts
    CatalogReconciled {
        /// Entries newly discovered this cycle
        added: usize,
        /// Entries dropped because their file vanished
        removed: usize,
        /// Entries carried forward unchanged
        kept: usize,
        /// Catalog size after reconciliation
        total: usize,
        /// When reconciliation completed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// An admin edited a catalog entry's title or description
    ///
    /// Triggers:
    /// - SSE: Refresh the edited row in catalog views
    CatalogEntryUpdated {
        /// Entry UUID that was edited
        entry_id: Uuid,
        /// File path of the edited entry
        file_path: String,
        /// When edit was persisted
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Periodic catalog auto-refresh was enabled or disabled
    AutoRefreshChanged {
        /// New flag value
        enabled: bool,
        /// When flag changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// An audio file was uploaded into the audios folder
    ///
    /// Triggers:
    /// - SSE: Show upload notification
    /// - Catalog refresher: Pick up the new file
    AudioUploaded {
        /// Stored file name (relative, subfolder-prefixed)
        file_name: String,
        /// File size in bytes
        size: u64,
        /// When upload completed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// An audio file was deleted from the audios folder
    AudioDeleted {
        /// Deleted file name (relative)
        file_name: String,
        /// When deletion completed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A service row was created
    ServiceCreated {
        /// Service UUID
        service_id: Uuid,
        /// When row was inserted
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A service row was updated
    ServiceUpdated {
        /// Service UUID
        service_id: Uuid,
        /// When row was updated
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A service row was deleted
    ServiceDeleted {
        /// Service UUID
        service_id: Uuid,
        /// When row was deleted
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The services list was reordered (every affected row rewritten)
    ///
    /// Emitted only when the whole batch succeeded; a partial failure
    /// surfaces as an error to the caller instead.
    ServicesReordered {
        /// Number of rows whose order_position was rewritten
        count: usize,
        /// When reorder completed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A site text block was updated
    SiteContentUpdated {
        /// Content key (e.g. "hero_title")
        key: String,
        /// When content was written
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl VoxEvent {
    /// Get event type as string for SSE event naming and filtering
    pub fn event_type(&self) -> &str {
        match self {
            VoxEvent::CatalogReconciled { .. } => "CatalogReconciled",
            VoxEvent::CatalogEntryUpdated { .. } => "CatalogEntryUpdated",
            VoxEvent::AutoRefreshChanged { .. } => "AutoRefreshChanged",
            VoxEvent::AudioUploaded { .. } => "AudioUploaded",
            VoxEvent::AudioDeleted { .. } => "AudioDeleted",
            VoxEvent::ServiceCreated { .. } => "ServiceCreated",
            VoxEvent::ServiceUpdated { .. } => "ServiceUpdated",
            VoxEvent::ServiceDeleted { .. } => "ServiceDeleted",
            VoxEvent::ServicesReordered { .. } => "ServicesReordered",
            VoxEvent::SiteContentUpdated { .. } => "SiteContentUpdated",
        }
    }
}

/// Central event distribution bus for application-wide events
///
/// The EventBus uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
/// - Lagged message detection for slow subscribers
///
/// Dropping a receiver is the unsubscribe operation; a dropped or
/// lagging subscriber never prevents delivery to the others.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<VoxEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// Events older than `capacity` are dropped for subscribers that
    /// fall behind.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Returns a receiver that will receive all events emitted after
    /// subscription. Drop the receiver to unsubscribe.
    pub fn subscribe(&self) -> broadcast::Receiver<VoxEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(&self, event: VoxEvent) -> Result<usize, broadcast::error::SendError<VoxEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// Useful for non-critical events where it's acceptable if no
    /// component is currently listening.
    pub fn emit_lossy(&self, event: VoxEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
