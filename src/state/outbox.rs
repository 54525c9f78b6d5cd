//! Per-connection outbound queue.
//!
//! An [`Outbox`] is the only handle other tasks get on a connection: a
//! bounded queue drained by that connection's writer task, plus the token
//! that tears the connection down. Cloning is cheap; every clone feeds the
//! same queue.

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::ConnId;

/// Why a frame could not be queued for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The queue is full; the peer is not reading fast enough.
    #[error("SendQ exceeded")]
    SendQExceeded,
    /// The writer task is gone.
    #[error("connection closed")]
    Closed,
}

/// Sending side of a connection's outbound queue.
#[derive(Debug, Clone)]
pub struct Outbox {
    id: ConnId,
    tx: mpsc::Sender<String>,
    kill: CancellationToken,
}

impl Outbox {
    /// Create an outbox with room for `capacity` frames.
    ///
    /// `kill` is cancelled by [`disconnect`](Self::disconnect); the owning
    /// connection watches it. Returns the receiver for the writer task.
    pub fn new(
        id: ConnId,
        capacity: usize,
        kill: CancellationToken,
    ) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { id, tx, kill }, rx)
    }

    /// Connection this outbox belongs to.
    pub fn id(&self) -> ConnId {
        self.id
    }

    /// Queue one frame without waiting.
    pub fn receives(&self, text: impl Into<String>) -> Result<(), DeliveryError> {
        self.tx.try_send(text.into()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::SendQExceeded,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    /// Ask the owning connection to shut down.
    pub fn disconnect(&self) {
        self.kill.cancel();
    }

    /// Whether [`disconnect`](Self::disconnect) has been requested.
    pub fn is_disconnected(&self) -> bool {
        self.kill.is_cancelled()
    }
}
