use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{FetchKind, FetchOptions, Resolution};

/// A fully resolved wanted episode, ready for hand-off to a fetcher.
///
/// Every field has passed the show's quality filter and the source's
/// default policy; `episode` and `version` are always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Show display name.
    pub show_name: String,
    /// Show identifier in the downstream episode store.
    pub group_id: String,
    /// Releaser media attribution, empty when the show lists none.
    pub media: String,
    /// Releaser subbing attribution, empty when the show lists none.
    pub subbing: String,
    /// Name of the group whose source announced the release.
    pub group_name: String,
    /// Fetcher family for this release.
    pub fetch_kind: FetchKind,
    /// Options handed to that fetcher.
    pub fetch_options: FetchOptions,
    /// Episode number.
    pub episode: u32,
    /// Release version, 1 when the name carries no `v` suffix.
    pub version: u8,
    /// Canonical resolution, parsed from the name or taken from source
    /// defaults.
    pub resolution: Resolution,
    /// Container extension without the dot.
    pub container: String,
    /// Uppercase CRC32 checksum when the name carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crc: Option<String>,
    /// Filename to save the download as: the input minus any trailing
    /// `.torrent`, with the default container appended when the name had no
    /// extension of its own.
    pub save_file_name: String,
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} #{:02}v{} ({}, {})",
            self.show_name, self.episode, self.version, self.resolution, self.container
        )
    }
}
