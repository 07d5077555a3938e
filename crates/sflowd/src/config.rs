//! Configuration file support for sflowd
//!
//! Loads and validates the collector configuration from TOML files.
//! Default location: /etc/sonic/sflowd.toml

use crate::error::{Result, SflowdError};
use crate::sink::OutputFormat;
use serde::{Deserialize, Serialize};
use sflow_v5::V5FormatOptions;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use tracing::warn;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sonic/sflowd.toml";

/// UDP listener configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListenerConfig {
    /// Bind address, `ip:port`
    #[serde(default = "default_address")]
    pub address: String,

    /// Largest datagram accepted; longer datagrams are truncated by the socket
    #[serde(default = "default_read_buffer_bytes")]
    pub read_buffer_bytes: usize,

    /// Number of decode workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Datagrams queued per worker before new ones are dropped
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
}

/// Metric output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Complete sflowd configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SflowdConfig {
    #[serde(default)]
    pub listener: ListenerConfig,

    /// Decoder limits
    #[serde(default)]
    pub decoder: V5FormatOptions,

    #[serde(default)]
    pub output: OutputConfig,
}

fn default_address() -> String {
    "0.0.0.0:6343".to_string()
}

fn default_read_buffer_bytes() -> usize {
    65535
}

fn default_workers() -> usize {
    4
}

fn default_queue_depth() -> usize {
    1024
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            read_buffer_bytes: default_read_buffer_bytes(),
            workers: default_workers(),
            queue_depth: default_queue_depth(),
        }
    }
}

impl SflowdConfig {
    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                SflowdError::Configuration(format!(
                    "Failed to parse config file {}: {}",
                    path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(SflowdError::Io(e)),
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            SflowdError::Configuration(format!("Failed to serialize config: {}", e))
        })?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Parsed listener address
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listener.address.parse().map_err(|_| {
            SflowdError::Configuration(format!(
                "invalid listener address '{}'",
                self.listener.address
            ))
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;

        if self.listener.workers == 0 {
            return Err(SflowdError::Configuration(
                "workers must be > 0".to_string(),
            ));
        }

        if self.listener.queue_depth == 0 {
            return Err(SflowdError::Configuration(
                "queue_depth must be > 0".to_string(),
            ));
        }

        // version, address type and sample count alone take 12 bytes
        if self.listener.read_buffer_bytes < 12 {
            return Err(SflowdError::Configuration(
                "read_buffer_bytes must be >= 12".to_string(),
            ));
        }

        Ok(())
    }
}
