//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

use std::net::{Ipv4Addr, SocketAddr};

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_server_name() -> String {
    "relayd".to_string()
}

// =============================================================================
// Listen Defaults
// =============================================================================

pub const DEFAULT_PORT: u16 = 50007;

pub fn default_listen_address() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT))
}

// =============================================================================
// Limit Defaults
// =============================================================================

pub fn default_nick_len() -> usize {
    relay_proto::DEFAULT_NICK_MAX_LEN
}

pub fn default_max_frame_len() -> usize {
    relay_proto::DEFAULT_MAX_FRAME_LEN
}

pub fn default_sendq() -> usize {
    256
}

pub fn default_read_timeout_secs() -> u64 {
    5
}
