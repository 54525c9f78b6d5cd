//! State management module.
//!
//! Contains the [`Registry`] (shared server state) and the per-connection
//! [`Outbox`] it routes broadcasts through.

mod outbox;
mod registry;
mod uid;

pub use outbox::{DeliveryError, Outbox};
pub use registry::Registry;
pub use uid::{ConnId, ConnIdGenerator};
