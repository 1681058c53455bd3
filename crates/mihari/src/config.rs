//! JSON configuration for the service: IRC networks, sources, and shows.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use mihari_core::types::{FetchKind, Show, SourceDefaults};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON for the expected schema.
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// IRC networks and the optional control channel.
    #[serde(default)]
    pub irc: IrcConfig,
    /// Release sources to build at startup.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
    /// Tracked shows, fed into the show index.
    #[serde(default)]
    pub shows: Vec<Show>,
}

impl Config {
    /// Loads configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }

    /// The source entry announcing for `group_key`, if any.
    #[must_use]
    pub fn source_by_group(&self, group_key: &str) -> Option<&SourceConfig> {
        self.sources
            .iter()
            .find(|source| source.group.key == group_key)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

/// IRC section of the configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IrcConfig {
    /// Networks to connect, keyed by a short name sources refer to.
    #[serde(default)]
    pub networks: HashMap<String, NetworkConfig>,
    /// Where administrative announcements go.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<ControllerConfig>,
}

/// Connection settings for one IRC network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub host: String,
    pub port: u16,
    pub nick: String,
    #[serde(default)]
    pub tls: bool,
}

/// The network and channel used for control announcements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub network: String,
    pub channel: String,
}

/// The release group a source announces for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Stable key, used for releaser attribution on shows.
    pub key: String,
    /// Human-readable group name, carried onto episode records.
    pub name: String,
}

/// One configured release source.
///
/// The `type` tag selects the builder in the source registry; fields past
/// the common ones are builder-specific and optional here, each builder
/// validates the ones it needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Builder tag, `"rss"` and `"irc"` being built in.
    #[serde(rename = "type")]
    pub source_type: String,
    /// Group this source announces for.
    pub group: GroupConfig,
    /// Fetcher family for matched releases.
    pub fetch: FetchKind,
    /// Default metadata for fields release names omit.
    #[serde(default)]
    pub defaults: SourceDefaults,

    /// Feed URL (rss sources).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Network key (irc sources).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// Announce channel (irc sources).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Announce line pattern with `file` and `link` captures (irc sources).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announce: Option<String>,
}
