//! # relay-proto
//!
//! Wire protocol shared by the `relayd` server and its clients.
//!
//! ## Layers
//!
//! - [`frame`]: 64-byte decimal length header + UTF-8 payload, as a
//!   `tokio_util` codec ([`FrameCodec`]).
//! - [`command`]: the six client commands (`NICK`, `USER`, `JOIN`, `PART`,
//!   `PRIVMSG`, `QUIT`).
//! - [`reply`]: server lines, both numerics and channel announcements.
//! - [`nick`]: handle validation.
//!
//! ## Quick Start
//!
//! ```rust
//! use relay_proto::{Command, Reply};
//!
//! let join: Command = "JOIN #global".parse().unwrap();
//! assert_eq!(join, Command::JOIN("#global".into()));
//!
//! let reply: Reply = ":alice PRIVMSG #global :hi".parse().unwrap();
//! assert_eq!(reply.source(), Some("alice"));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod chan;
pub mod command;
pub mod error;
#[cfg(feature = "tokio")]
pub mod frame;
pub mod nick;
pub mod reply;
pub mod response;

pub use self::chan::{is_global, GLOBAL_CHANNEL};
pub use self::command::Command;
pub use self::error::{MessageParseError, ProtocolError};
#[cfg(feature = "tokio")]
pub use self::frame::{encode_frame, FrameCodec, DEFAULT_MAX_FRAME_LEN, HEADER_LEN};
pub use self::nick::{is_valid_nick, DEFAULT_NICK_MAX_LEN};
pub use self::reply::Reply;
pub use self::response::Response;
