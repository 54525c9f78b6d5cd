//! Per-connection session state.
//!
//! ```text
//! ┌──────────────┐   JOIN #global   ┌────────────┐
//! │ Unregistered ├─────────────────►│ Registered │
//! └──────┬───────┘  (handle held)   └─────┬──────┘
//!        │                                │
//!        │   QUIT / peer close / error    │
//!        └──────────────┬─────────────────┘
//!                       ▼
//!                  ┌────────┐
//!                  │ Closed │
//!                  └────────┘
//! ```
//!
//! A successful NICK reserves the handle and answers `001` but leaves the
//! session Unregistered; the first JOIN moves it to Registered. PART keeps
//! it Registered, and it may JOIN again.
//!
//! The session never writes to another connection. Its own replies go into
//! its [`Outbox`]; everything meant for the channel goes through
//! [`Registry::broadcast`].

mod handlers;

use relay_proto::{Command, GLOBAL_CHANNEL, MessageParseError, Reply};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::HandlerError;
use crate::state::{ConnId, Outbox, Registry};

/// Registration state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connected; may or may not hold a handle yet.
    Unregistered,
    /// Has joined the channel at least once.
    Registered,
    /// Torn down. Terminal.
    Closed,
}

/// What the connection should do after a line was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading.
    Continue,
    /// The client quit; stop reading.
    Quit,
}

/// Server-side state for one client connection.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    nick: Option<String>,
    joined: bool,
    outbox: Outbox,
    registry: Arc<Registry>,
    nick_len: usize,
}

impl Session {
    /// Create a session that replies through `outbox`.
    pub fn new(outbox: Outbox, registry: Arc<Registry>, nick_len: usize) -> Self {
        Self {
            state: SessionState::Unregistered,
            nick: None,
            joined: false,
            outbox,
            registry,
            nick_len,
        }
    }

    /// Connection this session belongs to.
    pub fn id(&self) -> ConnId {
        self.outbox.id()
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Handle held by this session, if any.
    pub fn nick(&self) -> Option<&str> {
        self.nick.as_deref()
    }

    /// Whether the session is subscribed to the channel.
    ///
    /// The registry drops a subscriber that cannot keep up without asking
    /// the session, so membership is checked against it.
    pub fn is_joined(&self) -> bool {
        self.joined && self.registry.is_subscribed(self.id())
    }

    /// Closed, or told to disconnect and waiting for the connection to
    /// notice.
    fn is_finished(&self) -> bool {
        self.state == SessionState::Closed || self.outbox.is_disconnected()
    }

    /// Handle one inbound frame.
    ///
    /// Lines that do not parse are dropped; a known command with missing
    /// parameters is answered with a numeric.
    pub fn handle_line(&mut self, line: &str) -> Flow {
        if self.is_finished() {
            return Flow::Quit;
        }

        match line.parse::<Command>() {
            Ok(command) => self.handle(command),
            Err(MessageParseError::NotEnoughParams { command: "NICK" }) => {
                self.reject("NICK", HandlerError::NoNicknameGiven);
                Flow::Continue
            }
            Err(MessageParseError::NotEnoughParams { command }) => {
                self.reject(command, HandlerError::NeedMoreParams(command));
                Flow::Continue
            }
            Err(e) => {
                debug!(conn = %self.id(), error = %e, line, "Dropping unparseable line");
                Flow::Continue
            }
        }
    }

    /// Apply one parsed command.
    pub fn handle(&mut self, command: Command) -> Flow {
        if self.is_finished() {
            return Flow::Quit;
        }

        let name = command.name();
        let result = match command {
            Command::NICK(nick) => self.handle_nick(nick),
            Command::USER(username, _) => {
                debug!(conn = %self.id(), %username, "USER accepted");
                Ok(())
            }
            Command::JOIN(channel) => self.handle_join(&channel),
            Command::PART(channel) => self.handle_part(&channel),
            Command::PRIVMSG(target, text) => self.handle_privmsg(&target, &text),
            Command::QUIT(reason) => {
                info!(conn = %self.id(), nick = ?self.nick, ?reason, "Client quit");
                self.close();
                return Flow::Quit;
            }
            other => {
                debug!(conn = %self.id(), command = other.name(), "Ignoring command");
                Ok(())
            }
        };

        if let Err(e) = result {
            self.reject(name, e);
        }
        Flow::Continue
    }

    /// Tear the session down. Safe to call more than once; only the first
    /// call has any effect.
    ///
    /// A session that joined is unsubscribed and its departure announced to
    /// the remaining subscribers, also when the registry already dropped it
    /// for falling behind; then its handle is released.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.state = SessionState::Closed;

        if self.joined {
            self.joined = false;
            self.registry.unsubscribe(self.id());
            if let Some(nick) = &self.nick {
                let part = Reply::Part {
                    nick: nick.clone(),
                    channel: GLOBAL_CHANNEL.to_string(),
                };
                self.registry.broadcast(&part.to_string());
            }
        }

        if let Some(nick) = self.nick.take() {
            self.registry.release(&nick);
            debug!(conn = %self.id(), %nick, "Handle released");
        }
    }

    fn reject(&self, command: &str, error: HandlerError) {
        debug!(
            conn = %self.id(),
            command,
            error_code = error.error_code(),
            "Command rejected"
        );
        self.reply(error.to_reply(self.nick().unwrap_or("*")));
    }

    fn reply(&self, reply: Reply) {
        if let Err(e) = self.outbox.receives(reply.to_string()) {
            warn!(conn = %self.id(), error = %e, "Reply undeliverable, disconnecting");
            self.outbox.disconnect();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
