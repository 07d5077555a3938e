//! Error types for the decoder engine

use crate::value::{Value, ValueKind};
use std::panic::Location;
use thiserror::Error;

/// Decode failures. Any of these aborts the current datagram.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Input ended before a primitive or bounded region could be read
    #[error("short read: needed {needed} bytes, {available} available")]
    ShortRead { needed: usize, available: usize },

    /// No alternative matched and no default was declared
    #[error("no case matches '{key}' = {value} (alt declared at {location})")]
    UnmatchedCase {
        key: String,
        value: Value,
        location: &'static Location<'static>,
    },

    /// Repetition count above the iteration guard
    #[error("iteration count {count} for '{key}' exceeds limit {max}")]
    IterationLimit { key: String, count: u64, max: u32 },

    /// Length-bounded region above its guard
    #[error("length {length} for '{key}' exceeds limit {max}")]
    LengthLimit { key: String, length: u64, max: u32 },

    /// A key was referenced before anything recorded it
    #[error("no value recorded for '{key}'")]
    MissingKey { key: String },

    /// A key used as a count, length or multiplier held a non-integer
    #[error("value of '{key}' is not an unsigned integer: {value}")]
    NotAnInteger { key: String, value: Value },

    /// Bound assertion failed
    #[error("'{key}' = {value} exceeds {max} (asserted at {location})")]
    AssertMax {
        key: String,
        value: u64,
        max: u64,
        location: &'static Location<'static>,
    },

    /// An operation was applied to a value of the wrong kind
    #[error("operation '{op}' cannot take a {kind} value")]
    TypeMismatch { op: &'static str, kind: ValueKind },

    /// Address formatting failed
    #[error("address error: {0}")]
    Address(#[from] sflow_types::ParseError),

    /// A metric was opened while another was still open
    #[error("metric '{name}' opened while '{open}' is still open")]
    MetricAlreadyOpen { name: String, open: String },

    /// Close without a matching open
    #[error("close_metric without an open metric")]
    NoOpenMetric,

    /// Decode finished with a metric still open
    #[error("metric '{name}' was never closed")]
    UnclosedMetric { name: String },

    /// A skip signal reached the top of the grammar without a bounded region to absorb it
    #[error("skip outside of a length-bounded region: {reason}")]
    SkipOutsideSub { reason: String },

    /// Explicit failure raised by the grammar
    #[error("decode failed: {0}")]
    Failed(String),
}

impl DecodeError {
    /// Creates a grammar-raised failure.
    pub fn failed(msg: impl Into<String>) -> Self {
        DecodeError::Failed(msg.into())
    }
}

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Control flow out of a directive: either the soft skip signal or a hard error.
#[derive(Debug)]
pub(crate) enum Interrupt {
    Skip(String),
    Fatal(DecodeError),
}

impl From<DecodeError> for Interrupt {
    fn from(err: DecodeError) -> Self {
        Interrupt::Fatal(err)
    }
}

pub(crate) type Step = std::result::Result<(), Interrupt>;
