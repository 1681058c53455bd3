use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{Resolution, ShowLookup};

/// The fetcher family a matched release is handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchKind {
    /// Fetched through the torrent client.
    Torrent,
    /// Fetched by plain HTTP download.
    Http,
}

impl FetchKind {
    /// Wraps a release link in the option shape its fetcher expects.
    #[must_use]
    pub fn options_for(self, link: impl Into<String>) -> FetchOptions {
        match self {
            Self::Torrent => FetchOptions::Torrent { uri: link.into() },
            Self::Http => FetchOptions::Http { url: link.into() },
        }
    }
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Torrent => write!(f, "torrent"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Fetcher-specific options attached to a matched episode.
///
/// Serialized untagged so torrent options read `{"uri": …}` and HTTP
/// options `{"url": …}`, the exact shapes the fetchers consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FetchOptions {
    /// Magnet link or `.torrent` URI.
    Torrent { uri: String },
    /// Direct download URL.
    Http { url: String },
}

/// Metadata a source supplies for fields its release names tend to omit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDefaults {
    /// Resolution assumed when the filename names none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    /// Container assumed when the filename has no extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
}

/// The release group a source announces for, with its show-lookup
/// capability.
#[derive(Clone)]
pub struct GroupRef {
    /// Stable key, used for releaser attribution on shows.
    pub key: String,
    /// Human-readable group name.
    pub name: String,
    /// Lookup from filename to tracked show.
    pub shows: Arc<dyn ShowLookup>,
}

impl fmt::Debug for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupRef")
            .field("key", &self.key)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Per-invocation description of the source a filename came from.
///
/// Built by the source layer and borrowed by the parser for the duration of
/// one parse; the parser stores nothing from it beyond what lands in the
/// final episode record.
#[derive(Debug, Clone)]
pub struct SourceRef {
    /// Fetcher family for releases announced by this source.
    pub fetch_kind: FetchKind,
    /// Default metadata applied when names omit resolution or container.
    pub defaults: SourceDefaults,
    /// Owning group and its show lookup.
    pub group: GroupRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_for_matches_fetcher_shape() {
        let torrent = FetchKind::Torrent.options_for("magnet:?xt=abc");
        assert_eq!(
            serde_json::to_string(&torrent).unwrap(),
            r#"{"uri":"magnet:?xt=abc"}"#
        );

        let http = FetchKind::Http.options_for("https://example.test/ep.mkv");
        assert_eq!(
            serde_json::to_string(&http).unwrap(),
            r#"{"url":"https://example.test/ep.mkv"}"#
        );
    }

    #[test]
    fn fetch_options_deserialize_by_field_name() {
        let opts: FetchOptions = serde_json::from_str(r#"{"uri":"magnet:?xt=abc"}"#).unwrap();
        assert_eq!(
            opts,
            FetchOptions::Torrent {
                uri: "magnet:?xt=abc".to_owned()
            }
        );
    }

    #[test]
    fn fetch_kind_config_spelling() {
        let kind: FetchKind = serde_json::from_str("\"torrent\"").unwrap();
        assert_eq!(kind, FetchKind::Torrent);
        assert_eq!(kind.to_string(), "torrent");
        assert_eq!(serde_json::to_string(&FetchKind::Http).unwrap(), "\"http\"");
    }

    #[test]
    fn defaults_fields_are_optional() {
        let defaults: SourceDefaults = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults, SourceDefaults::default());

        let defaults: SourceDefaults =
            serde_json::from_str(r#"{"resolution":"1080p","container":"mkv"}"#).unwrap();
        assert_eq!(defaults.resolution, Some(Resolution::FHD1080));
        assert_eq!(defaults.container.as_deref(), Some("mkv"));
    }
}
