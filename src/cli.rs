//! Command-line arguments for the two binaries.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::config::Config;

/// Single-channel chat relay server.
#[derive(Parser, Debug, Clone)]
#[command(name = "relayd", author, version, about, long_about = None)]
pub struct ServerCli {
    /// Port to listen on; overrides the port of the configured address.
    pub port: Option<u16>,

    /// TOML configuration file. Built-in defaults are used without one.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Address to bind, e.g. 127.0.0.1:50007.
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

impl ServerCli {
    /// Load the configuration file, if any, and apply overrides.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(bind) = self.bind {
            config = config.with_listen_address(bind);
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Terminal client for a relay server.
#[derive(Parser, Debug, Clone)]
#[command(name = "relay-client", author, version, about, long_about = None)]
pub struct ClientCli {
    /// Server host name or IP.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Handle to register.
    #[arg(long)]
    pub nick: String,

    /// Real name sent with USER; defaults to the handle.
    #[arg(long)]
    pub realname: Option<String>,
}

impl ClientCli {
    /// Real name to register with.
    pub fn realname(&self) -> &str {
        self.realname.as_deref().unwrap_or(&self.nick)
    }
}
