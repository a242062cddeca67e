//! Server configuration: TOML file plus command-line overrides

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;
use proglog_log::LogConfig;
use proglog_logging::LoggingConfig;
use serde::Deserialize;

use crate::error::ServerError;

/// Default listen address
pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "proglog-server", about = "Append-only record log over HTTP")]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, env = "PROGLOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on (overrides the config file)
    #[arg(long)]
    pub addr: Option<SocketAddr>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Maximum number of records the log accepts
    #[arg(long)]
    pub max_records: Option<u64>,

    /// Human-readable console logs instead of JSONL
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    /// Load the config file (if any) and apply command-line overrides
    pub fn into_config(self) -> Result<ServerConfig, ServerError> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };

        if let Some(addr) = self.addr {
            config.addr = addr;
        }
        if let Some(level) = self.log_level {
            config.logging.default_level = level;
        }
        if let Some(max_records) = self.max_records {
            config.log.max_records = Some(max_records);
        }
        if self.pretty {
            config.logging.console.pretty = true;
            config.logging.console.ansi = true;
        }

        Ok(config)
    }
}

// ---- TOML Config ----

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: SocketAddr,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            log: LogConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ServerError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ServerError::Config {
            context: "read",
            detail: format!("'{}': {e}", path.display()),
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            ServerError::Config { context, detail } => ServerError::Config {
                context,
                detail: format!("'{}': {detail}", path.display()),
            },
            other => other,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, ServerError> {
        toml::from_str(content).map_err(|e| ServerError::Config {
            context: "parse",
            detail: e.to_string(),
        })
    }
}
