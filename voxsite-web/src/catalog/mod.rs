//! Audio catalog subsystem
//!
//! Keeps the persisted catalog in sync with whatever audio files the
//! serving environment currently has:
//!
//! - [`lister`] — fallback-chain file listing (endpoint → folder →
//!   manifest → compiled-in fallback)
//! - [`formatter`] — display titles and speaker labels from raw paths
//! - [`reconciler`] — pure diff of listing against the previous catalog
//! - [`store`] — persistence of the reconciled catalog
//! - [`speakers`] — derived per-speaker grouping view
//! - [`refresher`] — periodic + on-demand cycle orchestration

pub mod formatter;
pub mod lister;
pub mod reconciler;
pub mod refresher;
pub mod speakers;
pub mod store;

pub use lister::FileLister;
pub use reconciler::reconcile;
pub use refresher::{CatalogRefresher, DEFAULT_REFRESH_INTERVAL};
pub use store::CatalogStore;
