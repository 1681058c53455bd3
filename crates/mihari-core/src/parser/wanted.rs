use tracing::debug;

use crate::error::{MihariError, Result};
use crate::parser::cache::{DEFAULT_CACHE_CAPACITY, UnparseableCache};
use crate::parser::defaults::{self, DefaultsError};
use crate::parser::extractor::TokenExtractor;
use crate::types::{Episode, FetchOptions, SourceRef};

/// Why a filename was not wanted. Every variant collapses to a cached
/// no-result; the distinction only feeds the debug log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    NoEpisode,
    NoResolution,
    NoContainer,
    ContainerMismatch,
    NoShowMatch,
    UnwantedResolution,
}

impl Rejection {
    fn as_str(self) -> &'static str {
        match self {
            Self::NoEpisode => "no episode number",
            Self::NoResolution => "no resolution and no default",
            Self::NoContainer => "no container and no default",
            Self::ContainerMismatch => "container differs from source default",
            Self::NoShowMatch => "no tracked show matches",
            Self::UnwantedResolution => "resolution not wanted by show",
        }
    }
}

impl From<DefaultsError> for Rejection {
    fn from(err: DefaultsError) -> Self {
        match err {
            DefaultsError::NoResolution => Self::NoResolution,
            DefaultsError::NoContainer => Self::NoContainer,
            DefaultsError::ContainerMismatch => Self::ContainerMismatch,
        }
    }
}

/// Parser turning announced release filenames into wanted episodes.
///
/// One instance serves every source; it is `Send + Sync` and cheap to share
/// behind an `Arc`. Parsing is pure computation except for the show lookup
/// on the given source and the internal unparseable cache.
pub struct EpisodeParser {
    extractor: TokenExtractor,
    cache: UnparseableCache,
}

impl EpisodeParser {
    /// Creates a parser with the default unparseable-cache capacity.
    ///
    /// # Errors
    ///
    /// Returns [`MihariError::RegexError`] if an extraction pattern fails
    /// to compile.
    pub fn new() -> Result<Self> {
        Self::with_cache_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Creates a parser remembering at most `capacity` failed filenames.
    ///
    /// # Errors
    ///
    /// Returns [`MihariError::RegexError`] if an extraction pattern fails
    /// to compile.
    pub fn with_cache_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            extractor: TokenExtractor::new()?,
            cache: UnparseableCache::with_capacity(capacity),
        })
    }

    /// Decides whether `file_name` is a wanted episode for `source`.
    ///
    /// The filename is tokenized and its fields extracted, source defaults
    /// fill whatever the name omits, the source's group resolves the show,
    /// and the show's resolution list has the final say. `Ok(None)` means
    /// "not wanted" for any reason; the name is then remembered so repeated
    /// announcements skip straight past extraction and lookup. Successful
    /// parses are never memoized, a later announcement of the same name is
    /// re-evaluated in full.
    ///
    /// # Errors
    ///
    /// Returns [`MihariError::ShowLookup`] when the source's show lookup
    /// fails. The filename is not cached in that case; it will be retried
    /// on the next announcement.
    pub fn parse_wanted_episode(
        &self,
        file_name: &str,
        fetch_options: FetchOptions,
        source: &SourceRef,
    ) -> Result<Option<Episode>> {
        if self.cache.contains(file_name) {
            debug!(file_name, "skipping previously unparsable filename");
            return Ok(None);
        }

        let stripped = strip_torrent_suffix(file_name);

        let Some(raw) = self.extractor.extract(stripped) else {
            return Ok(self.reject(file_name, Rejection::NoEpisode));
        };

        let resolved =
            match defaults::resolve(raw.resolution, raw.container.as_deref(), &source.defaults) {
                Ok(resolved) => resolved,
                Err(err) => return Ok(self.reject(file_name, err.into())),
            };

        let found = source
            .group
            .shows
            .find_show(stripped)
            .map_err(MihariError::ShowLookup)?;
        let Some(show) = found else {
            return Ok(self.reject(file_name, Rejection::NoShowMatch));
        };

        if !show.wants(resolved.resolution) {
            return Ok(self.reject(file_name, Rejection::UnwantedResolution));
        }

        let releaser = show.releaser(&source.group.key);
        let save_file_name = if resolved.container_defaulted {
            format!("{stripped}.{}", resolved.container)
        } else {
            stripped.to_owned()
        };

        debug!(
            file_name,
            show = %show.name,
            episode = raw.episode,
            version = raw.version,
            resolution = %resolved.resolution,
            "matched wanted episode"
        );

        Ok(Some(Episode {
            show_name: show.name.clone(),
            group_id: show.group_id.clone(),
            media: releaser.media,
            subbing: releaser.subbing,
            group_name: source.group.name.clone(),
            fetch_kind: source.fetch_kind,
            fetch_options,
            episode: raw.episode,
            version: raw.version,
            resolution: resolved.resolution,
            container: resolved.container,
            crc: raw.crc,
            save_file_name,
        }))
    }

    /// Forgets every filename remembered as unparsable, so configuration
    /// changes can take effect for names that failed under the old rules.
    pub fn clear_unparseable_cache(&self) {
        self.cache.clear();
    }

    fn reject(&self, file_name: &str, reason: Rejection) -> Option<Episode> {
        debug!(file_name, reason = reason.as_str(), "filename not wanted");
        self.cache.insert(file_name);
        None
    }
}

/// Announce lines on torrent-backed sources carry the `.torrent` artifact
/// name, not the media filename inside it.
fn strip_torrent_suffix(file_name: &str) -> &str {
    file_name.strip_suffix(".torrent").unwrap_or(file_name)
}
