//! Numeric reply codes used by the relay.
//!
//! A subset of the RFC 2812 numerics: the welcome, plus the error replies
//! the server sends when a command cannot be honoured.

#![allow(non_camel_case_types)]

use std::fmt;

/// IRC-style numeric response code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    /// 001 - Welcome to the network
    RPL_WELCOME = 1,
    /// 403 - No such channel
    ERR_NOSUCHCHANNEL = 403,
    /// 412 - No text to send
    ERR_NOTEXTTOSEND = 412,
    /// 431 - No nickname given
    ERR_NONICKNAMEGIVEN = 431,
    /// 432 - Erroneous nickname
    ERR_ERRONEUSNICKNAME = 432,
    /// 433 - Nickname is already in use
    ERR_NICKNAMEINUSE = 433,
    /// 442 - You're not on that channel
    ERR_NOTONCHANNEL = 442,
    /// 451 - You have not registered
    ERR_NOTREGISTERED = 451,
    /// 461 - Not enough parameters
    ERR_NEEDMOREPARAMS = 461,
    /// 462 - You may not reregister
    ERR_ALREADYREGISTRED = 462,
}

impl Response {
    /// Numeric value of this response.
    #[inline]
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Look up a response by numeric value.
    pub fn from_code(code: u16) -> Option<Self> {
        Some(match code {
            1 => Self::RPL_WELCOME,
            403 => Self::ERR_NOSUCHCHANNEL,
            412 => Self::ERR_NOTEXTTOSEND,
            431 => Self::ERR_NONICKNAMEGIVEN,
            432 => Self::ERR_ERRONEUSNICKNAME,
            433 => Self::ERR_NICKNAMEINUSE,
            442 => Self::ERR_NOTONCHANNEL,
            451 => Self::ERR_NOTREGISTERED,
            461 => Self::ERR_NEEDMOREPARAMS,
            462 => Self::ERR_ALREADYREGISTRED,
            _ => return None,
        })
    }
}

impl fmt::Display for Response {
    /// Always three digits, zero-padded.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}
