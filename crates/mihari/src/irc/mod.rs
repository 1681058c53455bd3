//! IRC connection management.

pub mod manager;
pub mod network;

pub use manager::{ConnectionManager, ManagerError};
pub use network::{ChannelWatcher, NetworkError, NetworkFactory, NetworkHandle};
