//! sFlow v5 grammars.
//!
//! Two grammars are built over the same wire format: [`v5_format`] records
//! the whole datagram as an attribute tree, [`v5_metrics`] emits one `sflow`
//! metric per sampled packet header. [`SflowDecoder`] wraps both.

mod decoder;
mod error;
mod metrics;
mod options;
pub mod tables;
mod tree;

pub use decoder::{SflowDecoder, SFLOW_VERSION};
pub use error::{Result, SflowError};
pub use metrics::{v5_metrics, METRIC_NAME};
pub use options::V5FormatOptions;
pub use tree::v5_format;
