//! Handle checks.
//!
//! A handle is printed in front of every line a member sends, so it is kept
//! short and restricted to characters that cannot be confused with the line
//! syntax: no spaces, no leading `:` or `#`, nothing outside printable ASCII.

/// Handle length used when the server configuration does not set one.
pub const DEFAULT_NICK_MAX_LEN: usize = 9;

/// Punctuation allowed anywhere in a handle.
const PUNCT: &[u8] = b"[]\\`_^{|}";

fn allowed(b: u8, leading: bool) -> bool {
    b.is_ascii_alphabetic() || PUNCT.contains(&b) || (!leading && (b.is_ascii_digit() || b == b'-'))
}

/// Whether `nick` may be used as a handle of at most `max_len` bytes.
///
/// Letters and `[]\`_^{|}` may appear anywhere; digits and `-` only after
/// the first byte.
///
/// ```
/// use relay_proto::is_valid_nick;
///
/// assert!(is_valid_nick("alice", 9));
/// assert!(is_valid_nick("[bot]", 9));
/// assert!(!is_valid_nick("9lives", 9));
/// assert!(!is_valid_nick("alice", 4));
/// ```
pub fn is_valid_nick(nick: &str, max_len: usize) -> bool {
    match nick.as_bytes().split_first() {
        Some((&first, rest)) if nick.len() <= max_len => {
            allowed(first, true) && rest.iter().all(|&b| allowed(b, false))
        }
        _ => false,
    }
}
