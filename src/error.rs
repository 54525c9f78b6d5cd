//! Unified error handling for relayd.
//!
//! Command handlers return [`HandlerError`]; the session turns each one into
//! the numeric reply the client sees.

use relay_proto::{GLOBAL_CHANNEL, Reply, Response};
use thiserror::Error;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("not enough parameters for {0}")]
    NeedMoreParams(&'static str),

    #[error("no text to send")]
    NoTextToSend,

    #[error("no nickname given")]
    NoNicknameGiven,

    #[error("nickname in use: {0}")]
    NicknameInUse(String),

    #[error("erroneous nickname: {0}")]
    ErroneousNickname(String),

    #[error("not registered")]
    NotRegistered,

    #[error("already registered")]
    AlreadyRegistered,

    #[error("no such channel: {0}")]
    NoSuchChannel(String),

    #[error("not on channel")]
    NotOnChannel,
}

impl HandlerError {
    /// Get a static error code string for log fields.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams(_) => "need_more_params",
            Self::NoTextToSend => "no_text_to_send",
            Self::NoNicknameGiven => "no_nickname_given",
            Self::NicknameInUse(_) => "nickname_in_use",
            Self::ErroneousNickname(_) => "erroneous_nickname",
            Self::NotRegistered => "not_registered",
            Self::AlreadyRegistered => "already_registered",
            Self::NoSuchChannel(_) => "no_such_channel",
            Self::NotOnChannel => "not_on_channel",
        }
    }

    /// Convert to the numeric reply sent back to the offending client.
    ///
    /// `nick` is the client's handle, or `*` before one is held.
    pub fn to_reply(&self, nick: &str) -> Reply {
        match self {
            Self::NeedMoreParams(command) => Reply::numeric(
                Response::ERR_NEEDMOREPARAMS,
                [nick, *command, "Not enough parameters"],
            ),
            Self::NoTextToSend => {
                Reply::numeric(Response::ERR_NOTEXTTOSEND, [nick, "No text to send"])
            }
            Self::NoNicknameGiven => {
                Reply::numeric(Response::ERR_NONICKNAMEGIVEN, [nick, "No nickname given"])
            }
            Self::NicknameInUse(bad_nick) => Reply::nickname_in_use(bad_nick.as_str()),
            Self::ErroneousNickname(bad_nick) => Reply::numeric(
                Response::ERR_ERRONEUSNICKNAME,
                [nick, bad_nick.as_str(), "Erroneous nickname"],
            ),
            Self::NotRegistered => Reply::numeric(
                Response::ERR_NOTREGISTERED,
                ["*", "You have not registered"],
            ),
            Self::AlreadyRegistered => Reply::numeric(
                Response::ERR_ALREADYREGISTRED,
                [nick, "You may not reregister"],
            ),
            Self::NoSuchChannel(bad_chan) => Reply::numeric(
                Response::ERR_NOSUCHCHANNEL,
                [nick, bad_chan.as_str(), "No such channel"],
            ),
            Self::NotOnChannel => Reply::numeric(
                Response::ERR_NOTONCHANNEL,
                [nick, GLOBAL_CHANNEL, "You're not on that channel"],
            ),
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult<T = ()> = Result<T, HandlerError>;
