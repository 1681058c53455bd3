//! Connection-level IRC abstraction the manager drives.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::NetworkConfig;

/// Callback invoked with `(nick, line)` for each message in a watched
/// channel.
pub type ChannelWatcher = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Errors surfaced by a network connection.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// TCP or TLS setup failed.
    #[error("failed to connect to {host}:{port}: {reason}")]
    Connect {
        host: String,
        port: u16,
        reason: String,
    },

    /// The server never confirmed registration in time.
    #[error("registration timed out after {0:?}")]
    RegistrationTimeout(Duration),

    /// An operation needed a live connection and there was none.
    #[error("not connected")]
    NotConnected,

    /// Writing to the connection failed.
    #[error("failed to send: {0}")]
    Send(String),
}

/// One live IRC network connection.
///
/// Implementations own their read loop; the manager only joins channels,
/// wires watchers, and sends messages through this surface.
#[async_trait]
pub trait NetworkHandle: Send + Sync {
    /// Resolves once the server has accepted registration.
    async fn wait_until_registered(&self) -> Result<(), NetworkError>;

    /// Joins `channel` and delivers its messages to `watcher`.
    async fn add_channel_watcher(
        &self,
        channel: &str,
        watcher: ChannelWatcher,
    ) -> Result<(), NetworkError>;

    /// Sends a PRIVMSG to `target`.
    async fn message(&self, target: &str, text: &str) -> Result<(), NetworkError>;

    /// Closes the connection.
    async fn disconnect(&self) -> Result<(), NetworkError>;
}

/// Builds connections from config entries.
///
/// Kept synchronous: implementations return a handle immediately and
/// connect in the background, readiness is observed through
/// [`NetworkHandle::wait_until_registered`].
pub trait NetworkFactory: Send + Sync {
    fn create(
        &self,
        name: &str,
        config: &NetworkConfig,
    ) -> Result<Arc<dyn NetworkHandle>, NetworkError>;
}
