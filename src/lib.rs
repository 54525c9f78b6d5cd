//! relayd - a single-channel chat relay.
//!
//! Clients connect over TCP, claim a handle, join `#global` and exchange
//! lines that the server fans out to everyone in the channel. Every
//! message travels in a length-prefixed frame (see [`relay_proto::frame`]).
//!
//! The pieces, leaves first:
//! - [`state`]: the shared [`Registry`](state::Registry) of handles and
//!   subscribers, and the per-connection [`Outbox`](state::Outbox).
//! - [`session`]: the per-connection registration state machine.
//! - [`network`]: the accept loop and connection tasks.
//! - [`client`]: the client half of the protocol.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod network;
pub mod session;
pub mod state;
