//! Per-connection limits configuration.

use serde::Deserialize;
use std::time::Duration;

use super::defaults::{
    default_max_frame_len, default_nick_len, default_read_timeout_secs, default_sendq,
};

/// Per-connection limits.
///
/// These bound what a single peer can make the server buffer, and how long
/// a read may sit idle before it is retried.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum handle length (default: 9).
    #[serde(default = "default_nick_len")]
    pub nick_len: usize,
    /// Maximum frame payload in bytes, both directions (default: 1 MiB).
    #[serde(default = "default_max_frame_len")]
    pub max_frame_len: usize,
    /// Outbound queue capacity in frames (default: 256).
    /// A subscriber whose queue is full when a broadcast arrives is disconnected.
    #[serde(default = "default_sendq")]
    pub sendq: usize,
    /// Seconds a single read may wait before it is retried (default: 5).
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

impl LimitsConfig {
    /// Per-read timeout as a [`Duration`].
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            nick_len: default_nick_len(),
            max_frame_len: default_max_frame_len(),
            sendq: default_sendq(),
            read_timeout_secs: default_read_timeout_secs(),
        }
    }
}
