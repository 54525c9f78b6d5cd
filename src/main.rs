//! relayd - single-channel chat relay server.

use clap::Parser;
use relayd::cli::ServerCli;
use relayd::network::Gateway;
use relayd::state::Registry;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let cli = ServerCli::parse();
    let config = cli.load_config().map_err(|e| {
        error!(error = %e, "Failed to load config");
        e
    })?;

    info!(
        server = %config.server.name,
        address = %config.listen.address,
        "Starting relayd"
    );

    let registry = Arc::new(Registry::new());
    let gateway = Gateway::bind(&config, registry).await.map_err(|e| {
        error!(address = %config.listen.address, error = %e, "Failed to bind");
        e
    })?;

    gateway.run_until_ctrl_c().await?;
    info!("Server stopped");
    Ok(())
}
