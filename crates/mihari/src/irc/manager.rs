//! Brings up configured IRC networks and routes messages to them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::IrcConfig;
use crate::irc::network::{ChannelWatcher, NetworkError, NetworkFactory, NetworkHandle};

/// How long a network may take to register before it is discarded.
const READY_TIMEOUT: Duration = Duration::from_secs(30);

/// Flush window between the shutdown announce and the disconnects.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

const SHUTDOWN_MESSAGE: &str = "shutting down";

/// Errors raised by manager operations.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// The named network was never connected or has been shut down.
    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    /// An announcement was requested but no control channel is configured.
    #[error("no control channel configured")]
    ControlNotConfigured,

    /// The underlying connection failed.
    #[error(transparent)]
    Network(#[from] NetworkError),
}

#[derive(Debug, Clone)]
struct ControlSink {
    network: String,
    channel: String,
}

/// Owns the live network handles and the control channel sink.
///
/// Initialization failures never abort the whole service: a network that
/// cannot connect or register is dropped and the rest keep going.
pub struct ConnectionManager {
    networks: RwLock<HashMap<String, Arc<dyn NetworkHandle>>>,
    control: RwLock<Option<ControlSink>>,
}

impl ConnectionManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            networks: RwLock::new(HashMap::new()),
            control: RwLock::new(None),
        }
    }

    /// Connects every configured network and wires the control channel.
    ///
    /// Returns the number of networks that came up. The control watcher is
    /// installed on the controller channel when one is configured; a failed
    /// install keeps the sink so announcements are still attempted.
    pub async fn initialize(
        &self,
        config: &IrcConfig,
        factory: &dyn NetworkFactory,
        control_watcher: ChannelWatcher,
    ) -> usize {
        for (name, network_config) in &config.networks {
            let handle = match factory.create(name, network_config) {
                Ok(handle) => handle,
                Err(error) => {
                    warn!(network = %name, %error, "failed to create network connection");
                    continue;
                }
            };

            match tokio::time::timeout(READY_TIMEOUT, handle.wait_until_registered()).await {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    warn!(network = %name, %error, "network failed to register");
                    if let Err(error) = handle.disconnect().await {
                        debug!(network = %name, %error, "failed to disconnect discarded network");
                    }
                    continue;
                }
                Err(_) => {
                    warn!(
                        network = %name,
                        timeout = ?READY_TIMEOUT,
                        "network did not register in time"
                    );
                    if let Err(error) = handle.disconnect().await {
                        debug!(network = %name, %error, "failed to disconnect discarded network");
                    }
                    continue;
                }
            }

            info!(network = %name, host = %network_config.host, "network connected");
            self.networks.write().insert(name.clone(), handle);
        }

        if let Some(controller) = &config.controller {
            let handle = self.networks.read().get(&controller.network).cloned();
            match handle {
                Some(handle) => {
                    if let Err(error) = handle
                        .add_channel_watcher(&controller.channel, control_watcher)
                        .await
                    {
                        warn!(
                            network = %controller.network,
                            channel = %controller.channel,
                            %error,
                            "failed to join control channel"
                        );
                    }
                    *self.control.write() = Some(ControlSink {
                        network: controller.network.clone(),
                        channel: controller.channel.clone(),
                    });
                }
                None => {
                    warn!(
                        network = %controller.network,
                        "controller references a network that did not come up"
                    );
                }
            }
        }

        self.networks.read().len()
    }

    /// Whether `name` is a live network.
    #[must_use]
    pub fn has_network(&self, name: &str) -> bool {
        self.networks.read().contains_key(name)
    }

    /// Names of all live networks, in no particular order.
    #[must_use]
    pub fn network_names(&self) -> Vec<String> {
        self.networks.read().keys().cloned().collect()
    }

    /// Joins `channel` on `network` and delivers its lines to `watcher`.
    pub async fn add_channel_watcher(
        &self,
        network: &str,
        channel: &str,
        watcher: ChannelWatcher,
    ) -> Result<(), ManagerError> {
        let handle = self
            .networks
            .read()
            .get(network)
            .cloned()
            .ok_or_else(|| ManagerError::UnknownNetwork(network.to_string()))?;
        handle.add_channel_watcher(channel, watcher).await?;
        Ok(())
    }

    /// Sends `text` to the configured control channel.
    pub async fn control_announce(&self, text: &str) -> Result<(), ManagerError> {
        let sink = self
            .control
            .read()
            .clone()
            .ok_or(ManagerError::ControlNotConfigured)?;
        let handle = self
            .networks
            .read()
            .get(&sink.network)
            .cloned()
            .ok_or(ManagerError::UnknownNetwork(sink.network))?;
        handle.message(&sink.channel, text).await?;
        Ok(())
    }

    /// Announces the shutdown, waits for the message to flush, then
    /// disconnects everything. The manager is inert afterwards.
    pub async fn shutdown(&self) {
        match self.control_announce(SHUTDOWN_MESSAGE).await {
            Ok(()) => tokio::time::sleep(SHUTDOWN_GRACE).await,
            Err(error) => debug!(%error, "skipping shutdown announce"),
        }

        *self.control.write() = None;
        let connections: Vec<(String, Arc<dyn NetworkHandle>)> =
            self.networks.write().drain().collect();
        for (name, handle) in connections {
            if let Err(error) = handle.disconnect().await {
                warn!(network = %name, %error, "failed to disconnect network");
            }
        }
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}
