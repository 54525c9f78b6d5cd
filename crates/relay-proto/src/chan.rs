//! The relay's single shared channel.

/// Name of the one channel every client joins.
pub const GLOBAL_CHANNEL: &str = "#global";

/// Whether `name` refers to the shared channel.
#[inline]
pub fn is_global(name: &str) -> bool {
    name == GLOBAL_CHANNEL
}
