//! Display metadata derived from raw file paths
//!
//! Pure functions; everything here is recomputable from the path alone.

/// Speaker label for files that live directly in the audios root.
pub const DEFAULT_SPEAKER: &str = "Geral";

/// Display title used when a path yields no words at all.
pub const UNTITLED_FALLBACK: &str = "Áudio sem título";

/// Maximum display title length before truncation.
const MAX_TITLE_CHARS: usize = 60;

/// Path split into the parts the catalog cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerParts {
    /// Grouping label: top-level folder name, or [`DEFAULT_SPEAKER`]
    pub speaker: String,
    /// Top-level folder when present
    pub subfolder: Option<String>,
    /// Everything after the first separator (the whole path when
    /// there is none)
    pub leaf_file_name: String,
}

/// Derive a human-readable display title from a raw file path.
///
/// Strips the directory prefix and the final extension, turns hyphens
/// and underscores into spaces, collapses repeated whitespace,
/// capitalizes each word's first letter, and truncates long results
/// with an ellipsis.
pub fn format_title(file_path: &str) -> String {
    let leaf = file_path.rsplit('/').next().unwrap_or(file_path);
    let stem = match leaf.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => leaf,
    };

    let spaced: String = stem
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect();

    let title = spaced
        .split_whitespace()
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ");

    if title.is_empty() {
        return UNTITLED_FALLBACK.to_string();
    }

    truncate_with_ellipsis(&title, MAX_TITLE_CHARS)
}

/// Split a relative path into speaker label, subfolder, and leaf name.
///
/// The first path segment is the speaker; files with no separator are
/// grouped under [`DEFAULT_SPEAKER`].
pub fn extract_speaker(file_path: &str) -> SpeakerParts {
    match file_path.split_once('/') {
        Some((folder, rest)) if !folder.is_empty() && !rest.is_empty() => SpeakerParts {
            speaker: folder.to_string(),
            subfolder: Some(folder.to_string()),
            leaf_file_name: rest.to_string(),
        },
        _ => SpeakerParts {
            speaker: DEFAULT_SPEAKER.to_string(),
            subfolder: None,
            leaf_file_name: file_path.to_string(),
        },
    }
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}
