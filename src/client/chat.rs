//! Interactive chat loop: user input in, server events out.

use anyhow::bail;
use relay_proto::Command;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use super::{ChatEvent, ChatView, ClientReceiver, ClientSession, SERVER_SENDER};

/// One line of user input.
#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    /// `/quit`, with or without a reason.
    Quit,
    /// `/nick <name>`.
    Nick(&'a str),
    /// Anything else, sent to the channel as is.
    Text(&'a str),
    /// Nothing but whitespace.
    Empty,
}

/// Classify one line typed by the user. Commands are case-insensitive.
pub fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }

    let (word, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
    if word.eq_ignore_ascii_case("/quit") {
        return Input::Quit;
    }
    if word.eq_ignore_ascii_case("/nick") {
        let nick = rest.trim();
        if !nick.is_empty() {
            return Input::Nick(nick);
        }
    }
    Input::Text(line)
}

/// Run a chat until the user leaves or the server hangs up.
///
/// Registration must already have been sent. The channel is joined once
/// the server welcomes us. After a refused handle the user may pick
/// another with `/nick`; typing anything else, or closing the input, ends
/// the chat with an error. `/quit` and end of input leave politely with
/// PART then QUIT.
pub async fn chat<R, V>(
    mut session: ClientSession,
    mut receiver: ClientReceiver,
    input: R,
    view: &mut V,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    V: ChatView + ?Sized,
{
    let mut input = input.lines();
    let mut refused: Option<String> = None;

    loop {
        tokio::select! {
            event = receiver.next_event() => {
                let Some(event) = event? else {
                    view.show(SERVER_SENDER, "Connection closed by server.");
                    return Ok(());
                };
                view.show_event(&event);
                match event {
                    ChatEvent::Welcome { .. } => {
                        refused = None;
                        session.join().await?;
                    }
                    ChatEvent::NicknameInUse { nick } => {
                        refused = Some(nick);
                        view.show(SERVER_SENDER, "Pick another handle with /nick <name>, or /quit.");
                    }
                    _ => {}
                }
            }
            line = input.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    if let Some(nick) = &refused {
                        bail!("nickname {nick} is already in use");
                    }
                    return leave(&mut session).await;
                };
                match parse_input(&line) {
                    Input::Empty => {}
                    Input::Quit => return leave(&mut session).await,
                    Input::Nick(nick) => session.send(Command::NICK(nick.to_string())).await?,
                    Input::Text(text) => match &refused {
                        Some(nick) => bail!("nickname {nick} is already in use"),
                        None => session.privmsg(text).await?,
                    },
                }
            }
        }
    }
}

async fn leave(session: &mut ClientSession) -> anyhow::Result<()> {
    session.part().await?;
    session.quit().await
}
