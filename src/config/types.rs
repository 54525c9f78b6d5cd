//! Core configuration types and loading.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

use super::defaults::default_server_name;
use super::limits::LimitsConfig;
use super::listen::ListenConfig;
use super::validation::{ValidationError, validate};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server information.
    #[serde(default)]
    pub server: ServerConfig,
    /// Network listen configuration.
    #[serde(default)]
    pub listen: ListenConfig,
    /// Per-connection limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self).map_err(ConfigError::Invalid)
    }

    /// Replace the listen address.
    pub fn with_listen_address(mut self, address: SocketAddr) -> Self {
        self.listen.address = address;
        self
    }

    /// Replace only the listen port, keeping the bind IP.
    pub fn with_port(mut self, port: u16) -> Self {
        self.listen.address.set_port(port);
        self
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name, used in logs (default: "relayd").
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_file_uses_defaults() {
        let file = write_config("");
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.name, "relayd");
        assert_eq!(config.listen.address, "0.0.0.0:50007".parse().unwrap());
        assert_eq!(config.limits.nick_len, 9);
    }

    #[test]
    fn full_file_overrides_defaults() {
        let file = write_config(
            r#"
            [server]
            name = "relay.example"

            [listen]
            address = "127.0.0.1:6000"

            [limits]
            nick_len = 12
            max_frame_len = 4096
            sendq = 16
            read_timeout_secs = 30
            "#,
        );
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.name, "relay.example");
        assert_eq!(config.listen.address, "127.0.0.1:6000".parse().unwrap());
        assert_eq!(config.limits.nick_len, 12);
        assert_eq!(config.limits.max_frame_len, 4096);
        assert_eq!(config.limits.sendq, 16);
        assert_eq!(config.limits.read_timeout_secs, 30);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let file = write_config("[listen]\naddress = \"not an address\"\n");
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_limit_is_rejected() {
        let file = write_config("[limits]\nsendq = 0\n");
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert_eq!(err.to_string(), "invalid config: limits.sendq must be greater than zero");
    }

    #[test]
    fn port_override_keeps_ip() {
        let config = Config::default()
            .with_listen_address("127.0.0.1:1".parse().unwrap())
            .with_port(7000);
        assert_eq!(config.listen.address, "127.0.0.1:7000".parse().unwrap());
    }
}
