//! sFlow v5 collector daemon
//!
//! Listens for sFlow datagrams over UDP, decodes each one into flow metrics
//! and writes them to stdout as JSON or InfluxDB line protocol.

pub mod collector;
pub mod config;
pub mod error;
pub mod sink;
pub mod stats;

pub use collector::{shutdown_on, Collector};
pub use config::{ListenerConfig, OutputConfig, SflowdConfig, DEFAULT_CONFIG_PATH};
pub use error::{Result, SflowdError};
pub use sink::{to_line_protocol, MetricSink, OutputFormat, WriterSink};
pub use stats::DaemonStats;
