//! In-memory show index with case-insensitive substring matching.

use std::sync::Arc;

use mihari_core::BoxError;
use mihari_core::types::{Show, ShowLookup};
use tracing::warn;

/// Entries carry the lowercased name so each lookup lowercases only the
/// release name, not the whole index.
struct IndexEntry {
    needle: String,
    show: Arc<Show>,
}

/// Matches release names against tracked shows by substring.
///
/// Longer names are tried first so `"Some Anime S2"` wins over
/// `"Some Anime"` when both are tracked.
pub struct ShowIndex {
    entries: Vec<IndexEntry>,
}

impl ShowIndex {
    /// Builds an index over `shows`. Shows with empty names cannot match
    /// anything and are skipped.
    #[must_use]
    pub fn new(shows: impl IntoIterator<Item = Show>) -> Self {
        let mut entries: Vec<IndexEntry> = shows
            .into_iter()
            .filter_map(|show| {
                if show.name.is_empty() {
                    warn!(group_id = %show.group_id, "skipping show with empty name");
                    return None;
                }
                Some(IndexEntry {
                    needle: show.name.to_lowercase(),
                    show: Arc::new(show),
                })
            })
            .collect();
        entries.sort_by(|a, b| b.needle.len().cmp(&a.needle.len()));
        Self { entries }
    }

    /// Number of indexed shows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no shows are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ShowLookup for ShowIndex {
    fn find_show(&self, file_name: &str) -> Result<Option<Arc<Show>>, BoxError> {
        let haystack = file_name.to_lowercase();
        Ok(self
            .entries
            .iter()
            .find(|entry| haystack.contains(&entry.needle))
            .map(|entry| Arc::clone(&entry.show)))
    }
}
