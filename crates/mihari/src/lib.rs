//! Mihari service layer: IRC connections, release sources, and configuration.
//!
//! [`mihari_core`] decides which release names are wanted episodes; this
//! crate wires that engine to the outside world. [`ConnectionManager`]
//! brings up IRC networks behind injectable traits, [`SourceRegistry`]
//! builds the RSS and IRC announce sources described by a [`Config`], and
//! [`ShowIndex`] answers the show lookups the parser makes.
//!
//! Scheduling stays with the embedder: every source exposes a single-cycle
//! `fetch`, so a host can poll on whatever cadence fits.

pub mod config;
pub mod irc;
pub mod shows;
pub mod sources;

pub use config::{Config, ConfigError};
pub use irc::{
    ChannelWatcher, ConnectionManager, ManagerError, NetworkError, NetworkFactory, NetworkHandle,
};
pub use shows::ShowIndex;
pub use sources::{Source, SourceContext, SourceError, SourceRegistry};
