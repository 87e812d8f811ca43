//! Catalog reconciliation
//!
//! Diffs a freshly observed file listing against the previous catalog.
//! Pure: the caller persists the result and broadcasts the change.

use super::formatter::format_title;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;
use voxsite_common::models::AudioEntry;

/// Reconcile the current file listing against the previous catalog.
///
/// Entries whose `file_path` is still listed are carried forward
/// unchanged, preserving user edits to title, description, and order.
/// Newly observed paths get a fresh entry with a formatter-derived
/// title and `order = max(existing) + 1`, assigned in listing order.
/// Entries whose file vanished are dropped outright.
///
/// Duplicate paths in the listing collapse to one entry, so the output
/// never contains two entries with the same `file_path`.
///
/// The result is sorted by `order` descending: newly discovered files
/// float to the top of every view.
///
/// An empty listing yields an empty catalog. Callers that cannot trust
/// a transient empty listing must guard before invoking (the refresher
/// re-lists once before accepting zero results).
pub fn reconcile(current_files: &[String], previous_catalog: &[AudioEntry]) -> Vec<AudioEntry> {
    let previous_by_path: HashMap<&str, &AudioEntry> = previous_catalog
        .iter()
        .map(|entry| (entry.file_path.as_str(), entry))
        .collect();

    let mut next_order = previous_catalog
        .iter()
        .map(|entry| entry.order)
        .max()
        .unwrap_or(0);

    let mut seen = HashSet::new();
    let mut catalog = Vec::with_capacity(current_files.len());

    for path in current_files {
        if !seen.insert(path.as_str()) {
            continue;
        }

        match previous_by_path.get(path.as_str()) {
            Some(existing) => catalog.push((*existing).clone()),
            None => {
                next_order += 1;
                catalog.push(AudioEntry {
                    id: Uuid::new_v4(),
                    title: format_title(path),
                    description: None,
                    file_path: path.clone(),
                    order: next_order,
                    remote_url: None,
                });
            }
        }
    }

    catalog.sort_by(|a, b| b.order.cmp(&a.order));
    catalog
}
