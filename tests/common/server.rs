//! Test server management.
//!
//! Runs a relayd gateway inside the test's runtime on an ephemeral port.

use relayd::config::Config;
use relayd::network::Gateway;
use relayd::state::Registry;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A test server instance.
pub struct TestServer {
    addr: SocketAddr,
    registry: Arc<Registry>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<anyhow::Result<()>>>,
}

impl TestServer {
    /// Spawn a server with default limits.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn a server after letting the caller adjust the config.
    pub async fn spawn_with<F>(configure: F) -> anyhow::Result<Self>
    where
        F: FnOnce(&mut Config),
    {
        let mut config = Config::default().with_listen_address("127.0.0.1:0".parse()?);
        configure(&mut config);
        config.validate()?;

        let registry = Arc::new(Registry::new());
        let gateway = Gateway::bind(&config, Arc::clone(&registry)).await?;
        let addr = gateway.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(gateway.run_until(async {
            let _ = shutdown_rx.await;
        }));

        Ok(Self {
            addr,
            registry,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }

    /// Get the server address.
    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    /// The server's shared registry, for asserting on state.
    #[allow(dead_code)]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Create a new test client connected to this server.
    #[allow(dead_code)]
    pub async fn connect(&self, nick: &str) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(self.addr, nick).await
    }

    /// Stop accepting and tell every connection to close.
    #[allow(dead_code)]
    pub async fn shutdown(mut self) -> anyhow::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match self.task.take() {
            Some(task) => task.await?,
            None => Ok(()),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
