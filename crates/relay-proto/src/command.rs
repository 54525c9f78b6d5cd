//! Client-to-server commands.
//!
//! The relay understands six commands. Lines are parsed with the usual IRC
//! parameter rules: space-separated parameters, and a final parameter
//! starting with `:` that runs to the end of the line.
//!
//! ```
//! use relay_proto::Command;
//!
//! let cmd: Command = "PRIVMSG #global :hello there".parse().unwrap();
//! assert_eq!(cmd, Command::PRIVMSG("#global".into(), "hello there".into()));
//! assert_eq!(cmd.to_string(), "PRIVMSG #global :hello there");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::MessageParseError;

/// A parsed client command.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Command {
    /// `NICK nickname`
    NICK(String),
    /// `USER username * * :realname`
    USER(String, String),
    /// `JOIN channel`
    JOIN(String),
    /// `PART channel`
    PART(String),
    /// `PRIVMSG target :text`
    PRIVMSG(String, String),
    /// `QUIT [:reason]`
    QUIT(Option<String>),
}

impl Command {
    /// Upper-case command keyword.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NICK(_) => "NICK",
            Self::USER(..) => "USER",
            Self::JOIN(_) => "JOIN",
            Self::PART(_) => "PART",
            Self::PRIVMSG(..) => "PRIVMSG",
            Self::QUIT(_) => "QUIT",
        }
    }
}

/// Split a line into IRC parameters.
///
/// Runs of spaces separate parameters; a parameter starting with `:` is the
/// trailing parameter and keeps everything after the colon, spaces included.
pub(crate) fn split_params(line: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut rest = line;

    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }
        if let Some(trailing) = rest.strip_prefix(':') {
            params.push(trailing);
            break;
        }
        match rest.find(' ') {
            Some(pos) => {
                params.push(&rest[..pos]);
                rest = &rest[pos + 1..];
            }
            None => {
                params.push(rest);
                break;
            }
        }
    }

    params
}

/// Strip any trailing line terminator a peer may have left in the payload.
pub(crate) fn trim_line(line: &str) -> &str {
    line.trim_end_matches(&['\r', '\n'][..])
}

impl FromStr for Command {
    type Err = MessageParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut line = trim_line(line).trim_start_matches(' ');

        // Clients have no business sending a prefix; skip it like servers do.
        if line.starts_with(':') {
            line = line.find(' ').map_or("", |pos| &line[pos + 1..]);
        }

        let params = split_params(line);
        let (keyword, args) = match params.split_first() {
            Some((keyword, args)) => (keyword.to_ascii_uppercase(), args),
            None => return Err(MessageParseError::EmptyMessage),
        };

        let need = |idx: usize, command: &'static str| {
            args.get(idx)
                .map(|s| s.to_string())
                .ok_or(MessageParseError::NotEnoughParams { command })
        };

        match keyword.as_str() {
            "NICK" => Ok(Self::NICK(need(0, "NICK")?)),
            "USER" => {
                let username = need(0, "USER")?;
                let realname = args.get(3).map_or_else(|| username.clone(), |s| s.to_string());
                Ok(Self::USER(username, realname))
            }
            "JOIN" => Ok(Self::JOIN(need(0, "JOIN")?)),
            "PART" => Ok(Self::PART(need(0, "PART")?)),
            // Missing text is left for the server to answer with ERR_NOTEXTTOSEND.
            "PRIVMSG" => Ok(Self::PRIVMSG(
                need(0, "PRIVMSG")?,
                args.get(1).map(|s| s.to_string()).unwrap_or_default(),
            )),
            "QUIT" => Ok(Self::QUIT(args.first().map(|s| s.to_string()))),
            _ => Err(MessageParseError::UnknownCommand(keyword)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NICK(nick) => write!(f, "NICK {nick}"),
            Self::USER(username, realname) => write!(f, "USER {username} * * :{realname}"),
            Self::JOIN(channel) => write!(f, "JOIN {channel}"),
            Self::PART(channel) => write!(f, "PART {channel}"),
            Self::PRIVMSG(target, text) => write!(f, "PRIVMSG {target} :{text}"),
            Self::QUIT(None) => f.write_str("QUIT"),
            Self::QUIT(Some(reason)) => write!(f, "QUIT :{reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_params() {
        assert_eq!(split_params("JOIN #global"), vec!["JOIN", "#global"]);
        assert_eq!(
            split_params("PRIVMSG #global :hi  there :)"),
            vec!["PRIVMSG", "#global", "hi  there :)"]
        );
        assert_eq!(split_params("  NICK   alice  "), vec!["NICK", "alice"]);
        assert_eq!(split_params("PRIVMSG #global :"), vec!["PRIVMSG", "#global", ""]);
        assert!(split_params("").is_empty());
    }

    #[test]
    fn test_parse_registration() {
        assert_eq!(
            "NICK alice".parse::<Command>(),
            Ok(Command::NICK("alice".into()))
        );
        assert_eq!(
            "USER alice * * :Alice Liddell".parse::<Command>(),
            Ok(Command::USER("alice".into(), "Alice Liddell".into()))
        );
        assert_eq!(
            "USER alice".parse::<Command>(),
            Ok(Command::USER("alice".into(), "alice".into()))
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "join #global".parse::<Command>(),
            Ok(Command::JOIN("#global".into()))
        );
        assert_eq!("Quit".parse::<Command>(), Ok(Command::QUIT(None)));
    }

    #[test]
    fn test_parse_skips_prefix_and_line_ending() {
        assert_eq!(
            ":alice PART #global\r\n".parse::<Command>(),
            Ok(Command::PART("#global".into()))
        );
    }

    #[test]
    fn test_parse_privmsg_without_text() {
        assert_eq!(
            "PRIVMSG #global".parse::<Command>(),
            Ok(Command::PRIVMSG("#global".into(), String::new()))
        );
    }

    #[test]
    fn test_parse_quit_reason() {
        assert_eq!(
            "QUIT :gone fishing".parse::<Command>(),
            Ok(Command::QUIT(Some("gone fishing".into())))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(MessageParseError::EmptyMessage));
        assert_eq!("   ".parse::<Command>(), Err(MessageParseError::EmptyMessage));
        assert_eq!(
            "NICK".parse::<Command>(),
            Err(MessageParseError::NotEnoughParams { command: "NICK" })
        );
        assert_eq!(
            "PRIVMSG".parse::<Command>(),
            Err(MessageParseError::NotEnoughParams { command: "PRIVMSG" })
        );
        assert_eq!(
            "Hello!".parse::<Command>(),
            Err(MessageParseError::UnknownCommand("HELLO!".into()))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Command::USER("alice".into(), "A".into()).to_string(),
            "USER alice * * :A"
        );
        assert_eq!(
            Command::PRIVMSG("#global".into(), "hi".into()).to_string(),
            "PRIVMSG #global :hi"
        );
        assert_eq!(Command::QUIT(None).to_string(), "QUIT");
        assert_eq!(
            Command::QUIT(Some("bye now".into())).to_string(),
            "QUIT :bye now"
        );
    }
}
