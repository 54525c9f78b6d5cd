//! Connection identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one accepted connection, unique for the life of the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnId(u64);

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Hands out [`ConnId`]s in accept order.
#[derive(Debug, Default)]
pub struct ConnIdGenerator {
    counter: AtomicU64,
}

impl ConnIdGenerator {
    /// Create a generator whose first id is `c1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the next unique id.
    pub fn next(&self) -> ConnId {
        ConnId(self.counter.fetch_add(1, Ordering::Relaxed) + 1)
    }
}
