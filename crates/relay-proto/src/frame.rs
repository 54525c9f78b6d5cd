//! Length-prefixed frame codec for tokio.
//!
//! Every message on the wire is a fixed 64-byte ASCII header holding the
//! payload length in decimal (left-justified, space-padded) followed by
//! exactly that many bytes of UTF-8 text:
//!
//! ```text
//! "5" + 63 spaces | "hello"
//! ```
//!
//! Receivers always know how many header bytes to wait for, so no
//! delimiter scanning is needed and payloads may contain any text.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, ProtocolError};

/// Width of the length header in bytes.
pub const HEADER_LEN: usize = 64;

/// Default upper bound on a single payload (1 MiB).
pub const DEFAULT_MAX_FRAME_LEN: usize = 1024 * 1024;

/// Encode a payload length as a 64-byte space-padded decimal header.
///
/// # Errors
///
/// Returns [`ProtocolError::HeaderOverflow`] if the decimal form is wider
/// than the header. This cannot happen for in-memory lengths on current
/// platforms but is checked rather than assumed.
pub fn encode_header(len: usize) -> error::Result<[u8; HEADER_LEN]> {
    let digits = len.to_string();
    if digits.len() > HEADER_LEN {
        return Err(ProtocolError::HeaderOverflow {
            len,
            width: HEADER_LEN,
        });
    }

    let mut header = [b' '; HEADER_LEN];
    header[..digits.len()].copy_from_slice(digits.as_bytes());
    Ok(header)
}

/// Parse a 64-byte header into the payload length it declares.
///
/// Trailing spaces are padding; what remains must be a non-empty run of
/// ASCII digits that fits in `usize`.
pub fn parse_header(header: &[u8]) -> error::Result<usize> {
    let invalid = || ProtocolError::InvalidHeader {
        header: String::from_utf8_lossy(header).into_owned(),
    };

    let end = header
        .iter()
        .rposition(|b| *b != b' ')
        .map_or(0, |pos| pos + 1);
    let digits = &header[..end];

    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }

    // All-ASCII-digit slices are valid UTF-8; only overflow can fail here.
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(invalid)
}

/// Encode one complete frame into a fresh buffer.
///
/// Convenience for callers writing to a raw socket without a `Framed`.
pub fn encode_frame(text: &str) -> error::Result<Vec<u8>> {
    let header = encode_header(text.len())?;
    let mut frame = Vec::with_capacity(HEADER_LEN + text.len());
    frame.extend_from_slice(&header);
    frame.extend_from_slice(text.as_bytes());
    Ok(frame)
}

/// Tokio codec for 64-byte-header frames carrying UTF-8 text.
///
/// Decoding is resumable: a header that has been parsed is remembered
/// while the payload is still arriving, so a read that is interrupted
/// (for example by a timeout) picks up where it left off.
#[derive(Debug, Clone)]
pub struct FrameCodec {
    /// Payload length of a frame whose header has already been consumed.
    pending: Option<usize>,
    /// Maximum payload length accepted or produced.
    max_len: usize,
}

impl FrameCodec {
    /// Create a codec with the default payload limit.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_FRAME_LEN)
    }

    /// Create a codec with a custom payload limit.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            pending: None,
            max_len,
        }
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for FrameCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        let len = match self.pending {
            Some(len) => len,
            None => {
                if src.len() < HEADER_LEN {
                    src.reserve(HEADER_LEN - src.len());
                    return Ok(None);
                }

                let len = parse_header(&src[..HEADER_LEN])?;
                if len > self.max_len {
                    return Err(ProtocolError::FrameTooLong {
                        actual: len,
                        limit: self.max_len,
                    });
                }

                src.advance(HEADER_LEN);
                self.pending = Some(len);
                len
            }
        };

        if src.len() < len {
            src.reserve(len - src.len());
            return Ok(None);
        }

        self.pending = None;
        let payload = src.split_to(len);
        String::from_utf8(payload.to_vec())
            .map(Some)
            .map_err(|e| ProtocolError::InvalidUtf8 {
                byte_pos: e.utf8_error().valid_up_to(),
            })
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }

        match self.pending {
            None if src.is_empty() => Ok(None),
            None => Err(ProtocolError::Truncated {
                expected: HEADER_LEN,
                received: src.len(),
            }),
            Some(len) => Err(ProtocolError::Truncated {
                expected: HEADER_LEN + len,
                received: HEADER_LEN + src.len(),
            }),
        }
    }
}

impl<T: AsRef<str>> Encoder<T> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: T, dst: &mut BytesMut) -> error::Result<()> {
        let payload = item.as_ref().as_bytes();
        if payload.len() > self.max_len {
            return Err(ProtocolError::FrameTooLong {
                actual: payload.len(),
                limit: self.max_len,
            });
        }

        let header = encode_header(payload.len())?;
        dst.reserve(HEADER_LEN + payload.len());
        dst.extend_from_slice(&header);
        dst.extend_from_slice(payload);
        Ok(())
    }
}
