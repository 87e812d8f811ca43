//! Speaker grouping view
//!
//! Derived from the catalog on every read; never persisted.

use super::formatter::{extract_speaker, DEFAULT_SPEAKER};
use voxsite_common::models::{AudioEntry, SpeakerGroup};

/// Group a catalog by speaker label (top-level folder segment).
///
/// Entries keep their catalog order inside each group. Groups appear
/// in order of first appearance, except the ungrouped sentinel, which
/// always sorts last.
pub fn group_by_speaker(catalog: &[AudioEntry]) -> Vec<SpeakerGroup> {
    let mut groups: Vec<SpeakerGroup> = Vec::new();

    for entry in catalog {
        let speaker = extract_speaker(&entry.file_path).speaker;
        match groups.iter_mut().find(|g| g.speaker == speaker) {
            Some(group) => group.entries.push(entry.clone()),
            None => groups.push(SpeakerGroup {
                speaker,
                entries: vec![entry.clone()],
            }),
        }
    }

    // Ungrouped files always trail the named speakers
    if let Some(pos) = groups.iter().position(|g| g.speaker == DEFAULT_SPEAKER) {
        let general = groups.remove(pos);
        groups.push(general);
    }

    groups
}
