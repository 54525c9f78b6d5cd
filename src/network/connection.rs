//! Connection - Handles an individual client connection.
//!
//! Each connection runs as two Tokio tasks:
//!
//! ```text
//!   socket ──► FramedRead ──► Session ──► Registry::broadcast
//!                                │                 │
//!                                ▼                 ▼
//!                             Outbox ◄──────── (other sessions)
//!                                │
//!                                ▼
//!   socket ◄── FramedWrite ◄── writer task
//! ```
//!
//! The writer task is the only thing that touches the write half, so
//! frames never interleave and leave in the order they were queued.

use futures_util::{SinkExt, StreamExt};
use relay_proto::{FrameCodec, ProtocolError};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::config::LimitsConfig;
use crate::session::{Flow, Session};
use crate::state::{ConnId, Outbox, Registry};

/// How long queued frames get to reach the socket once the session is over.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Why the read loop stopped.
#[derive(Debug)]
enum Exit {
    /// QUIT, orderly close, or a disconnect request.
    Clean(&'static str),
    /// The peer broke the framing or the transport failed.
    Failed(ProtocolError),
}

/// A client connection handler.
pub struct Connection {
    id: ConnId,
    addr: SocketAddr,
    stream: TcpStream,
    registry: Arc<Registry>,
    limits: LimitsConfig,
    shutdown: CancellationToken,
}

impl Connection {
    /// Create a new connection handler.
    ///
    /// The connection ends on its own terms or when `shutdown` is cancelled.
    pub fn new(
        id: ConnId,
        stream: TcpStream,
        addr: SocketAddr,
        registry: Arc<Registry>,
        limits: LimitsConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            id,
            addr,
            stream,
            registry,
            limits,
            shutdown,
        }
    }

    /// Run the connection until the client leaves or is dropped.
    ///
    /// Session cleanup always runs before this returns. Framing violations
    /// and transport failures come back as errors after cleanup.
    #[instrument(skip(self), fields(conn = %self.id, addr = %self.addr), name = "connection")]
    pub async fn run(self) -> anyhow::Result<()> {
        info!("Client connected");

        if let Err(e) = enable_keepalive(&self.stream) {
            warn!(error = %e, "Failed to enable TCP keepalive");
        }

        let (read_half, write_half) = self.stream.into_split();
        let mut reader =
            FramedRead::new(read_half, FrameCodec::with_max_len(self.limits.max_frame_len));
        // Outbound frames carry a prefix on top of already-bounded input.
        let writer = FramedWrite::new(write_half, FrameCodec::with_max_len(usize::MAX));

        let kill = self.shutdown.child_token();
        let (outbox, outgoing_rx) = Outbox::new(self.id, self.limits.sendq, kill.clone());
        let mut writer_task = tokio::spawn(write_loop(writer, outgoing_rx, kill.clone()));

        let mut session = Session::new(outbox, self.registry, self.limits.nick_len);
        let exit = read_loop(&mut reader, &mut session, &kill, self.limits.read_timeout()).await;

        session.close();
        drop(session);
        finish_writer(&mut writer_task, &kill).await;

        match exit {
            Exit::Clean(reason) => {
                info!(reason, "Client disconnected");
                Ok(())
            }
            Exit::Failed(e) if e.is_io() => {
                info!(error = %e, "Client connection lost");
                Ok(())
            }
            Exit::Failed(e) => {
                warn!(error = %e, "Closing connection on framing error");
                Err(e.into())
            }
        }
    }
}

fn enable_keepalive(stream: &TcpStream) -> io::Result<()> {
    use socket2::{SockRef, TcpKeepalive};

    let sock = SockRef::from(stream);
    let keepalive = TcpKeepalive::new()
        .with_time(Duration::from_secs(120))
        .with_interval(Duration::from_secs(30));

    sock.set_tcp_keepalive(&keepalive)
}

async fn read_loop<R>(
    reader: &mut FramedRead<R, FrameCodec>,
    session: &mut Session,
    kill: &CancellationToken,
    read_timeout: Duration,
) -> Exit
where
    R: tokio::io::AsyncRead + Unpin,
{
    loop {
        let next = tokio::select! {
            biased;
            _ = kill.cancelled() => return Exit::Clean("disconnected by server"),
            next = tokio::time::timeout(read_timeout, reader.next()) => next,
        };

        // FramedRead keeps partial frames buffered, so a timed-out read is
        // simply retried.
        let Ok(next) = next else {
            continue;
        };

        match next {
            Some(Ok(line)) => {
                debug!(raw = %line, "Received frame");
                if session.handle_line(&line) == Flow::Quit {
                    if kill.is_cancelled() {
                        return Exit::Clean("disconnected by server");
                    }
                    return Exit::Clean("quit");
                }
            }
            Some(Err(e)) => return classify_read_error(e),
            None => return Exit::Clean("peer closed connection"),
        }
    }
}

/// A reset or abort counts as an ordinary hang-up.
fn classify_read_error(e: ProtocolError) -> Exit {
    if let ProtocolError::Io(io_err) = &e
        && matches!(
            io_err.kind(),
            io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::BrokenPipe
        )
    {
        return Exit::Clean("connection reset");
    }
    Exit::Failed(e)
}

async fn write_loop(
    mut writer: FramedWrite<OwnedWriteHalf, FrameCodec>,
    mut outgoing_rx: mpsc::Receiver<String>,
    kill: CancellationToken,
) {
    loop {
        let frame = tokio::select! {
            biased;
            _ = kill.cancelled() => break,
            frame = outgoing_rx.recv() => frame,
        };
        let Some(frame) = frame else {
            break;
        };
        // A peer that stops reading must not pin this task once it is told to go.
        let sent = tokio::select! {
            biased;
            _ = kill.cancelled() => break,
            sent = writer.send(frame) => sent,
        };
        if let Err(e) = sent {
            debug!(error = %e, "Write failed");
            kill.cancel();
            break;
        }
    }
}

/// Give the writer a moment to flush what is already queued, then stop it.
async fn finish_writer(writer_task: &mut JoinHandle<()>, kill: &CancellationToken) {
    if !kill.is_cancelled()
        && tokio::time::timeout(WRITER_DRAIN_TIMEOUT, &mut *writer_task)
            .await
            .is_ok()
    {
        return;
    }
    kill.cancel();
    if let Err(e) = writer_task.await {
        warn!(error = %e, "Writer task failed");
    }
}
