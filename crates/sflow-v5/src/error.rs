//! Error types for the sFlow v5 decoder

use sflow_decoder::DecodeError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SflowError {
    /// The datagram was rejected by the grammar
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Datagram header announces a version other than 5
    #[error("unsupported sFlow version {version}")]
    UnsupportedVersion { version: u32 },
}

/// Result type for sFlow decoding
pub type Result<T> = std::result::Result<T, SflowError>;
