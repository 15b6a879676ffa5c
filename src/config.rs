//! Configuration module for simplechat.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::console::RoleKind;
use crate::{ChatError, Result};

/// Port used by both roles when nothing else is given.
pub const DEFAULT_PORT: u16 = 5555;

/// Client console configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Host to connect to when no host argument is given.
    #[serde(default = "default_client_host")]
    pub host: String,
    /// Port to connect to when no port argument is given.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_client_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_client_host(),
            port: default_port(),
        }
    }
}

/// Server console configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_server_host")]
    pub host: String,
    /// Port to listen on when no port argument is given.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum number of concurrent client connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_max_connections() -> usize {
    20
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_port(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory the per-role log files are written to.
    #[serde(default = "default_log_dir")]
    pub dir: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl LoggingConfig {
    /// Log file for one console role, e.g. `logs/simplechat-server.log`.
    pub fn log_path(&self, role: RoleKind) -> PathBuf {
        Path::new(&self.dir).join(format!("simplechat-{role}.log"))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: default_log_dir(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Client configuration.
    #[serde(default)]
    pub client: ClientConfig,
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ChatError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration if the file exists, otherwise return defaults.
    ///
    /// Environment overrides are applied in both cases.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = if path.as_ref().exists() {
            Self::load(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ChatError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `SIMPLECHAT_LOG_LEVEL`: Override the log level
    /// - `SIMPLECHAT_HOST`: Override the default client host
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("SIMPLECHAT_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
        if let Ok(host) = std::env::var("SIMPLECHAT_HOST") {
            if !host.is_empty() {
                self.client.host = host;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.client.port == 0 || self.server.port == 0 {
            return Err(ChatError::Validation("port must be non-zero".to_string()));
        }
        if self.server.max_connections == 0 {
            return Err(ChatError::Validation(
                "server.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
