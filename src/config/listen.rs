//! Network listener configuration.

use serde::Deserialize;
use std::net::SocketAddr;

use super::defaults::default_listen_address;

/// Network listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (default: "0.0.0.0:50007").
    #[serde(default = "default_listen_address")]
    pub address: SocketAddr,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: default_listen_address(),
        }
    }
}
