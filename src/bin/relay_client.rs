//! relay-client - terminal client for relayd.
//!
//! Lines typed on stdin go to `#global`. `/nick <name>` retries
//! registration after a refused handle; `/quit` leaves.

use anyhow::Context;
use clap::Parser;
use relayd::cli::ClientCli;
use relayd::client::{Client, ConsoleView, chat};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so they never mix with chat lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = ClientCli::parse();
    let (mut session, receiver) = Client::connect((cli.host.as_str(), cli.port))
        .await
        .with_context(|| format!("failed to connect to {}:{}", cli.host, cli.port))?;
    info!(host = %cli.host, port = cli.port, "Connected");

    session.register(&cli.nick, cli.realname()).await?;

    let stdin = BufReader::new(tokio::io::stdin());
    chat(session, receiver, stdin, &mut ConsoleView).await
}
