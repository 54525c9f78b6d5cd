//! Test relay client.
//!
//! Speaks raw frames so tests can send anything, including garbage, and
//! assert on exactly what the server sends back.

use futures_util::{SinkExt, StreamExt};
use relay_proto::{Command, FrameCodec, Reply, Response};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;
use tokio_util::codec::{FramedRead, FramedWrite};

/// A test relay client.
pub struct TestClient {
    reader: FramedRead<OwnedReadHalf, FrameCodec>,
    writer: FramedWrite<OwnedWriteHalf, FrameCodec>,
    nick: String,
}

#[allow(dead_code)]
impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: SocketAddr, nick: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: FramedRead::new(read_half, FrameCodec::with_max_len(usize::MAX)),
            writer: FramedWrite::new(write_half, FrameCodec::with_max_len(usize::MAX)),
            nick: nick.to_string(),
        })
    }

    /// The handle this client registers with.
    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// Send one line as a frame.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.send(line).await?;
        Ok(())
    }

    /// Write bytes straight to the socket, bypassing framing.
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        let socket = self.writer.get_mut();
        socket.write_all(bytes).await?;
        socket.flush().await?;
        Ok(())
    }

    /// Close our sending side; the server sees end of stream.
    pub async fn shutdown_write(&mut self) -> anyhow::Result<()> {
        self.writer.get_mut().shutdown().await?;
        Ok(())
    }

    /// Send a command.
    pub async fn send(&mut self, cmd: Command) -> anyhow::Result<()> {
        self.send_raw(&cmd.to_string()).await
    }

    /// Receive one frame's text.
    pub async fn recv_line(&mut self) -> anyhow::Result<String> {
        self.recv_line_timeout(Duration::from_secs(5)).await
    }

    /// Receive one frame's text with a timeout.
    pub async fn recv_line_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        match timeout(dur, self.reader.next()).await? {
            Some(frame) => Ok(frame?),
            None => anyhow::bail!("connection closed"),
        }
    }

    /// Receive and parse one reply.
    pub async fn recv(&mut self) -> anyhow::Result<Reply> {
        let line = self.recv_line().await?;
        line.parse::<Reply>()
            .map_err(|e| anyhow::anyhow!("Parse error: {e} (line: {line:?})"))
    }

    /// Assert nothing arrives for `dur`.
    pub async fn expect_silence(&mut self, dur: Duration) -> anyhow::Result<()> {
        match timeout(dur, self.reader.next()).await {
            Err(_) => Ok(()),
            Ok(Some(frame)) => anyhow::bail!("unexpected frame: {:?}", frame),
            Ok(None) => anyhow::bail!("connection closed"),
        }
    }

    /// Wait for the server to close the connection.
    pub async fn expect_closed(&mut self) -> anyhow::Result<()> {
        loop {
            match timeout(Duration::from_secs(5), self.reader.next()).await? {
                None | Some(Err(_)) => return Ok(()),
                Some(Ok(_)) => continue,
            }
        }
    }

    /// Send NICK + USER and wait for the welcome.
    pub async fn register(&mut self) -> anyhow::Result<()> {
        self.send(Command::NICK(self.nick.clone())).await?;
        self.send(Command::USER(
            self.nick.clone(),
            format!("Test User {}", self.nick),
        ))
        .await?;

        match self.recv().await? {
            Reply::Welcome { nick } if nick == self.nick => Ok(()),
            other => anyhow::bail!("Registration failed: {other:?}"),
        }
    }

    /// Join `#global` and wait for our own JOIN to come back.
    pub async fn join(&mut self) -> anyhow::Result<()> {
        self.send(Command::JOIN("#global".to_string())).await?;
        let me = self.nick.clone();
        self.recv_until(move |reply| matches!(reply, Reply::Join { nick, .. } if *nick == me))
            .await
    }

    /// Register and join in one go.
    pub async fn register_and_join(&mut self) -> anyhow::Result<()> {
        self.register().await?;
        self.join().await
    }

    /// Send a PRIVMSG to `#global`.
    pub async fn privmsg(&mut self, text: &str) -> anyhow::Result<()> {
        self.send(Command::PRIVMSG("#global".to_string(), text.to_string()))
            .await
    }

    /// Send QUIT.
    pub async fn quit(&mut self) -> anyhow::Result<()> {
        self.send(Command::QUIT(None)).await
    }

    /// Receive replies until one satisfies `predicate`.
    pub async fn recv_until<F>(&mut self, predicate: F) -> anyhow::Result<()>
    where
        F: Fn(&Reply) -> bool,
    {
        loop {
            let reply = self.recv().await?;
            if predicate(&reply) {
                return Ok(());
            }
        }
    }

    /// Receive one reply and check it is the given numeric.
    pub async fn expect_numeric(&mut self, expected: Response) -> anyhow::Result<Reply> {
        let reply = self.recv().await?;
        if reply.response() != Some(expected) {
            anyhow::bail!("expected {expected}, got {reply:?}");
        }
        Ok(reply)
    }
}
