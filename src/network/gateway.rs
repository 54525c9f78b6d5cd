//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds the listen socket and spawns a [`Connection`] task for
//! each incoming client. There is no cap on concurrent connections.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use crate::config::{Config, LimitsConfig};
use crate::network::Connection;
use crate::state::{ConnIdGenerator, Registry};

/// Pause after a failed accept before trying again.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// The Gateway accepts incoming TCP connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    registry: Arc<Registry>,
    limits: LimitsConfig,
    ids: ConnIdGenerator,
    shutdown: CancellationToken,
}

impl Gateway {
    /// Bind the gateway to the configured listen address.
    pub async fn bind(config: &Config, registry: Arc<Registry>) -> anyhow::Result<Self> {
        let addr = config.listen.address;
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, server = %config.server.name, "Listener bound");

        Ok(Self {
            listener,
            registry,
            limits: config.limits.clone(),
            ids: ConnIdGenerator::new(),
            shutdown: CancellationToken::new(),
        })
    }

    /// Address actually bound; useful when the configured port was 0.
    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until `shutdown` resolves.
    ///
    /// On shutdown every open connection is told to close and runs its
    /// normal cleanup.
    #[instrument(skip(self, shutdown), name = "gateway")]
    pub async fn run_until<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => self.spawn_connection(stream, addr),
                    Err(e) => {
                        error!(error = %e, "Failed to accept connection");
                        tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                    }
                },
            }
        }

        self.shutdown.cancel();
        Ok(())
    }

    /// Accept connections until Ctrl-C.
    pub async fn run_until_ctrl_c(self) -> anyhow::Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    fn spawn_connection(&self, stream: tokio::net::TcpStream, addr: SocketAddr) {
        let id = self.ids.next();
        info!(conn = %id, %addr, "Connection accepted");

        let connection = Connection::new(
            id,
            stream,
            addr,
            Arc::clone(&self.registry),
            self.limits.clone(),
            self.shutdown.clone(),
        );

        tokio::spawn(async move {
            if let Err(e) = connection.run().await {
                error!(conn = %id, %addr, error = %e, "Connection error");
            }
            info!(conn = %id, %addr, "Connection closed");
        });
    }
}
