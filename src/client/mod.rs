//! Client side of the relay protocol.
//!
//! [`Client::connect`] splits one connection into a [`ClientSession`] for
//! sending commands and a [`ClientReceiver`] that decodes what the server
//! sends back. The two halves are independent so input and output can run
//! in separate tasks, or be driven together by [`chat()`].

mod chat;
mod view;

pub use chat::{Input, chat, parse_input};
pub use view::{ChatView, ConsoleView};

use futures_util::{SinkExt, StreamExt};
use relay_proto::{Command, DEFAULT_MAX_FRAME_LEN, FrameCodec, GLOBAL_CHANNEL, Reply};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, instrument};

/// Sender shown for lines that come from the server itself.
pub const SERVER_SENDER: &str = "server";

/// Largest frame accepted from the server: a full-size message plus its prefix.
const MAX_INBOUND_FRAME_LEN: usize = 2 * DEFAULT_MAX_FRAME_LEN;

/// Entry point for client connections.
pub struct Client;

impl Client {
    /// Connect to a relay server.
    pub async fn connect<A: ToSocketAddrs>(
        addr: A,
    ) -> anyhow::Result<(ClientSession, ClientReceiver)> {
        let stream = TcpStream::connect(addr).await?;
        let (read_half, write_half) = stream.into_split();

        Ok((
            ClientSession {
                writer: FramedWrite::new(write_half, FrameCodec::new()),
            },
            ClientReceiver {
                reader: FramedRead::new(read_half, FrameCodec::with_max_len(MAX_INBOUND_FRAME_LEN)),
            },
        ))
    }
}

/// Sending half of a client connection.
pub struct ClientSession {
    writer: FramedWrite<OwnedWriteHalf, FrameCodec>,
}

impl ClientSession {
    /// Send one command as a frame.
    pub async fn send(&mut self, command: Command) -> anyhow::Result<()> {
        debug!(command = command.name(), "Sending");
        self.writer.send(command.to_string()).await?;
        Ok(())
    }

    /// Send NICK then USER.
    pub async fn register(&mut self, nick: &str, realname: &str) -> anyhow::Result<()> {
        self.send(Command::NICK(nick.to_string())).await?;
        self.send(Command::USER(nick.to_string(), realname.to_string()))
            .await
    }

    /// Join the shared channel.
    pub async fn join(&mut self) -> anyhow::Result<()> {
        self.send(Command::JOIN(GLOBAL_CHANNEL.to_string())).await
    }

    /// Say something in the shared channel.
    pub async fn privmsg(&mut self, text: &str) -> anyhow::Result<()> {
        self.send(Command::PRIVMSG(
            GLOBAL_CHANNEL.to_string(),
            text.to_string(),
        ))
        .await
    }

    /// Leave the shared channel.
    pub async fn part(&mut self) -> anyhow::Result<()> {
        self.send(Command::PART(GLOBAL_CHANNEL.to_string())).await
    }

    /// Tell the server we are leaving.
    pub async fn quit(&mut self) -> anyhow::Result<()> {
        self.send(Command::QUIT(None)).await
    }
}

/// Something the user should see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// The server accepted our handle.
    Welcome {
        /// Handle granted.
        nick: String,
    },
    /// The handle we asked for is taken.
    NicknameInUse {
        /// Handle refused.
        nick: String,
    },
    /// Someone joined the channel.
    Joined {
        /// Who.
        nick: String,
    },
    /// Someone left the channel.
    Parted {
        /// Who.
        nick: String,
    },
    /// A channel message.
    Message {
        /// Sender's handle.
        nick: String,
        /// Message text.
        text: String,
    },
    /// Any other server numeric.
    Notice {
        /// Human-readable part of the numeric.
        text: String,
    },
}

impl ChatEvent {
    /// Map a parsed server line to what the user sees.
    pub fn from_reply(reply: Reply) -> Self {
        match reply {
            Reply::Welcome { nick } => Self::Welcome { nick },
            Reply::NicknameInUse { nick } => Self::NicknameInUse { nick },
            Reply::Join { nick, .. } => Self::Joined { nick },
            Reply::Part { nick, .. } => Self::Parted { nick },
            Reply::Privmsg { nick, text, .. } => Self::Message { nick, text },
            Reply::Numeric { mut params, .. } => Self::Notice {
                text: params.pop().unwrap_or_default(),
            },
            other => Self::Notice {
                text: other.to_string(),
            },
        }
    }

    /// Who the line is attributed to.
    pub fn sender(&self) -> &str {
        match self {
            Self::Joined { nick } | Self::Parted { nick } | Self::Message { nick, .. } => nick,
            Self::Welcome { .. } | Self::NicknameInUse { .. } | Self::Notice { .. } => {
                SERVER_SENDER
            }
        }
    }

    /// The text to display.
    pub fn text(&self) -> String {
        match self {
            Self::Welcome { nick } => format!("Welcome to the Internet Relay Network {nick}!"),
            Self::NicknameInUse { nick } => format!("Nickname {nick} is already in use."),
            Self::Joined { .. } => format!("joined {GLOBAL_CHANNEL}"),
            Self::Parted { .. } => format!("left {GLOBAL_CHANNEL}"),
            Self::Message { text, .. } | Self::Notice { text } => text.clone(),
        }
    }
}

/// Receiving half of a client connection.
pub struct ClientReceiver {
    reader: FramedRead<OwnedReadHalf, FrameCodec>,
}

impl ClientReceiver {
    /// Wait for the next displayable event.
    ///
    /// Returns `Ok(None)` once the server closes the connection. Lines that
    /// do not parse as a server reply are skipped.
    pub async fn next_event(&mut self) -> anyhow::Result<Option<ChatEvent>> {
        while let Some(frame) = self.reader.next().await {
            let line = frame?;
            match line.parse::<Reply>() {
                Ok(reply) => return Ok(Some(ChatEvent::from_reply(reply))),
                Err(e) => debug!(error = %e, raw = %line, "Skipping unrecognised line"),
            }
        }
        Ok(None)
    }

    /// Feed every event to `view` until the server closes the connection.
    #[instrument(skip_all, name = "receiver")]
    pub async fn run<V: ChatView + ?Sized>(mut self, view: &mut V) -> anyhow::Result<()> {
        while let Some(event) = self.next_event().await? {
            view.show_event(&event);
        }
        debug!("Server closed connection");
        Ok(())
    }
}
