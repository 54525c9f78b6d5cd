//! Error types for the relay protocol library.
//!
//! This module defines error types for framing failures on the byte
//! stream and for parsing the text lines carried inside frames.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Framing-level protocol errors.
///
/// Every variant except [`ProtocolError::Io`] means the peer violated the
/// wire format; the connection cannot be resynchronised and must be closed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The 64-byte length header was not a space-padded decimal integer.
    #[error("invalid frame header: {header:?}")]
    InvalidHeader {
        /// The header as received, lossily decoded for display.
        header: String,
    },

    /// The decimal payload length does not fit in the fixed-width header.
    #[error("payload length {len} does not fit in a {width}-byte header")]
    HeaderOverflow {
        /// Payload length that was being encoded.
        len: usize,
        /// Header width in bytes.
        width: usize,
    },

    /// Declared payload length exceeds the codec's limit.
    #[error("frame too long: {actual} bytes (limit: {limit})")]
    FrameTooLong {
        /// Declared payload length.
        actual: usize,
        /// Maximum allowed payload length.
        limit: usize,
    },

    /// The stream ended in the middle of a frame.
    #[error("connection closed mid-frame: expected {expected} bytes, received {received}")]
    Truncated {
        /// Bytes needed to complete the frame (header included).
        expected: usize,
        /// Bytes that were buffered when the stream ended.
        received: usize,
    },

    /// Payload bytes were not valid UTF-8.
    #[error("invalid UTF-8 in payload at byte {byte_pos}")]
    InvalidUtf8 {
        /// Byte position where UTF-8 validation failed.
        byte_pos: usize,
    },
}

impl ProtocolError {
    /// Whether this error came from the transport rather than the peer's framing.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// Errors encountered when parsing a command or reply line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Line was empty or only whitespace.
    #[error("empty message")]
    EmptyMessage,

    /// Command keyword is not part of the relay vocabulary.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A known command arrived without a required parameter.
    #[error("not enough parameters for {command}")]
    NotEnoughParams {
        /// Command name, upper-cased.
        command: &'static str,
    },

    /// A server line did not match any known reply shape.
    #[error("invalid reply: {0}")]
    InvalidReply(String),
}
