//! Error types for sflowd

use thiserror::Error;

/// Collector daemon errors
#[derive(Error, Debug)]
pub enum SflowdError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metric registry error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Output serialization error
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Result type for sflowd operations
pub type Result<T> = std::result::Result<T, SflowdError>;
