//! Server-to-client replies.
//!
//! The server sends two shapes of line:
//!
//! - numerics, `<code> <params...> :<text>`, addressed to the connection
//!   that caused them, and
//! - channel announcements, `:<nick> <COMMAND> <channel> [:text]`, fanned
//!   out to every channel member.
//!
//! [`Reply`] formats both for the server and classifies them for clients.

use std::fmt;
use std::str::FromStr;

use crate::command::{split_params, trim_line};
use crate::error::MessageParseError;
use crate::response::Response;

/// A parsed server line.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Reply {
    /// `001 <nick> :Welcome to the Internet Relay Network <nick>!`
    Welcome {
        /// Handle the server accepted.
        nick: String,
    },
    /// `433 * <nick> :Nickname is already in use.`
    NicknameInUse {
        /// Handle that was refused.
        nick: String,
    },
    /// Any other numeric.
    Numeric {
        /// Reply code.
        response: Response,
        /// Parameters after the code, trailing text last.
        params: Vec<String>,
    },
    /// `:<nick> JOIN <channel>`
    Join {
        /// Handle that joined.
        nick: String,
        /// Channel joined.
        channel: String,
    },
    /// `:<nick> PART <channel>`
    Part {
        /// Handle that left.
        nick: String,
        /// Channel left.
        channel: String,
    },
    /// `:<nick> PRIVMSG <channel> :<text>`
    Privmsg {
        /// Sending handle.
        nick: String,
        /// Channel the text was sent to.
        channel: String,
        /// Message text.
        text: String,
    },
}

impl Reply {
    /// RPL_WELCOME for a freshly reserved handle.
    pub fn welcome(nick: impl Into<String>) -> Self {
        Self::Welcome { nick: nick.into() }
    }

    /// ERR_NICKNAMEINUSE for a refused handle.
    pub fn nickname_in_use(nick: impl Into<String>) -> Self {
        Self::NicknameInUse { nick: nick.into() }
    }

    /// A generic numeric with the given parameters.
    pub fn numeric<I, S>(response: Response, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Numeric {
            response,
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// The numeric code of this reply, if it is a numeric.
    pub fn response(&self) -> Option<Response> {
        match self {
            Self::Welcome { .. } => Some(Response::RPL_WELCOME),
            Self::NicknameInUse { .. } => Some(Response::ERR_NICKNAMEINUSE),
            Self::Numeric { response, .. } => Some(*response),
            Self::Join { .. } | Self::Part { .. } | Self::Privmsg { .. } => None,
        }
    }

    /// The handle a channel announcement originates from.
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Join { nick, .. } | Self::Part { nick, .. } | Self::Privmsg { nick, .. } => {
                Some(nick)
            }
            _ => None,
        }
    }
}

fn write_numeric(f: &mut fmt::Formatter<'_>, response: Response, params: &[&str]) -> fmt::Result {
    write!(f, "{response}")?;
    if let Some((last, middle)) = params.split_last() {
        for param in middle {
            write!(f, " {param}")?;
        }
        write!(f, " :{last}")?;
    }
    Ok(())
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Welcome { nick } => write_numeric(
                f,
                Response::RPL_WELCOME,
                &[nick, &format!("Welcome to the Internet Relay Network {nick}!")],
            ),
            Self::NicknameInUse { nick } => write_numeric(
                f,
                Response::ERR_NICKNAMEINUSE,
                &["*", nick, "Nickname is already in use."],
            ),
            Self::Numeric { response, params } => {
                let params: Vec<&str> = params.iter().map(String::as_str).collect();
                write_numeric(f, *response, &params)
            }
            Self::Join { nick, channel } => write!(f, ":{nick} JOIN {channel}"),
            Self::Part { nick, channel } => write!(f, ":{nick} PART {channel}"),
            Self::Privmsg {
                nick,
                channel,
                text,
            } => write!(f, ":{nick} PRIVMSG {channel} :{text}"),
        }
    }
}

impl FromStr for Reply {
    type Err = MessageParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = trim_line(line);
        let invalid = || MessageParseError::InvalidReply(line.to_string());

        if line.trim().is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }

        if let Some(rest) = line.strip_prefix(':') {
            let (nick, rest) = rest.split_once(' ').ok_or_else(invalid)?;
            let params = split_params(rest);
            let command = params.first().ok_or_else(invalid)?.to_ascii_uppercase();
            let channel = params.get(1).ok_or_else(invalid)?.to_string();
            let nick = nick.to_string();

            return match command.as_str() {
                "JOIN" => Ok(Self::Join { nick, channel }),
                "PART" => Ok(Self::Part { nick, channel }),
                "PRIVMSG" => Ok(Self::Privmsg {
                    nick,
                    channel,
                    text: params.get(2).map(|s| s.to_string()).unwrap_or_default(),
                }),
                _ => Err(invalid()),
            };
        }

        let params = split_params(line);
        let (code, args) = params.split_first().ok_or_else(invalid)?;
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let response = code
            .parse::<u16>()
            .ok()
            .and_then(Response::from_code)
            .ok_or_else(invalid)?;

        match response {
            Response::RPL_WELCOME => Ok(Self::Welcome {
                nick: args.first().ok_or_else(invalid)?.to_string(),
            }),
            Response::ERR_NICKNAMEINUSE => Ok(Self::NicknameInUse {
                nick: args.get(1).ok_or_else(invalid)?.to_string(),
            }),
            _ => Ok(Self::Numeric {
                response,
                params: args.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }
}
