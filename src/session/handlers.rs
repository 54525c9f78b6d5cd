//! Command handlers for [`Session`].

use relay_proto::{GLOBAL_CHANNEL, Reply, is_global, is_valid_nick};
use tracing::{debug, info};

use super::{Session, SessionState};
use crate::error::{HandlerError, HandlerResult};

impl Session {
    pub(super) fn handle_nick(&mut self, nick: String) -> HandlerResult {
        if self.nick.is_some() {
            return Err(HandlerError::AlreadyRegistered);
        }
        if !is_valid_nick(&nick, self.nick_len) {
            return Err(HandlerError::ErroneousNickname(nick));
        }
        if !self.registry.reserve(&nick) {
            return Err(HandlerError::NicknameInUse(nick));
        }

        info!(conn = %self.id(), %nick, "Handle reserved");
        self.reply(Reply::welcome(nick.as_str()));
        self.nick = Some(nick);
        Ok(())
    }

    pub(super) fn handle_join(&mut self, channel: &str) -> HandlerResult {
        let nick = self.require_nick()?;
        if !is_global(channel) {
            return Err(HandlerError::NoSuchChannel(channel.to_string()));
        }
        if self.is_joined() {
            debug!(conn = %self.id(), %nick, "Already joined");
            return Ok(());
        }

        self.registry.subscribe(&self.outbox);
        self.joined = true;
        self.state = SessionState::Registered;
        info!(conn = %self.id(), %nick, "Joined channel");

        self.announce(Reply::Join {
            nick,
            channel: GLOBAL_CHANNEL.to_string(),
        });
        Ok(())
    }

    pub(super) fn handle_part(&mut self, channel: &str) -> HandlerResult {
        let nick = self.require_nick()?;
        if !is_global(channel) {
            return Err(HandlerError::NoSuchChannel(channel.to_string()));
        }
        if !self.is_joined() {
            return Err(HandlerError::NotOnChannel);
        }

        // Announce first so the parting client sees its own PART.
        self.announce(Reply::Part {
            nick: nick.clone(),
            channel: GLOBAL_CHANNEL.to_string(),
        });
        self.registry.unsubscribe(self.id());
        self.joined = false;
        info!(conn = %self.id(), %nick, "Left channel");
        Ok(())
    }

    pub(super) fn handle_privmsg(&mut self, target: &str, text: &str) -> HandlerResult {
        let nick = self.require_nick()?;
        if text.is_empty() {
            return Err(HandlerError::NoTextToSend);
        }
        if !is_global(target) {
            return Err(HandlerError::NoSuchChannel(target.to_string()));
        }
        if !self.is_joined() {
            return Err(HandlerError::NotOnChannel);
        }

        self.announce(Reply::Privmsg {
            nick,
            channel: GLOBAL_CHANNEL.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    fn require_nick(&self) -> HandlerResult<String> {
        self.nick.clone().ok_or(HandlerError::NotRegistered)
    }

    fn announce(&self, reply: Reply) {
        self.registry.broadcast(&reply.to_string());
    }
}
