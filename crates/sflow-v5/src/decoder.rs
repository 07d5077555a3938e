//! Datagram-level entry point combining both grammars.

use crate::error::{Result, SflowError};
use crate::metrics::v5_metrics;
use crate::options::V5FormatOptions;
use crate::tree::v5_format;
use chrono::{DateTime, Utc};
use sflow_decoder::{Attributes, Plan, Reader};
use sflow_types::Metric;
use tracing::debug;

/// The only datagram version the grammars understand.
pub const SFLOW_VERSION: u32 = 5;

/// Decodes sFlow v5 datagrams into metrics or attribute trees.
///
/// Holds one plan per grammar. Decoding needs `&mut self`; give each worker
/// its own clone.
#[derive(Debug, Clone)]
pub struct SflowDecoder {
    metrics: Plan,
    tree: Plan,
}

impl SflowDecoder {
    pub fn new(options: &V5FormatOptions) -> Self {
        Self {
            metrics: Plan::new(v5_metrics(options)),
            tree: Plan::new(v5_format(options)),
        }
    }

    /// Decodes the metrics of one datagram, stamped with the current time.
    pub fn decode_metrics(&mut self, datagram: &[u8]) -> Result<Vec<Metric>> {
        self.decode_metrics_at(datagram, Utc::now())
    }

    pub fn decode_metrics_at(
        &mut self,
        datagram: &[u8],
        timestamp: DateTime<Utc>,
    ) -> Result<Vec<Metric>> {
        check_version(datagram)?;
        let decoded = self.metrics.decode_at(datagram, timestamp)?;
        debug!(metrics = decoded.metrics.len(), "decoded sFlow datagram");
        Ok(decoded.metrics)
    }

    /// Decodes the full attribute tree of one datagram.
    pub fn decode_tree(&mut self, datagram: &[u8]) -> Result<Attributes> {
        check_version(datagram)?;
        Ok(self.tree.decode(datagram)?.attributes)
    }
}

impl Default for SflowDecoder {
    fn default() -> Self {
        Self::new(&V5FormatOptions::default())
    }
}

fn check_version(datagram: &[u8]) -> Result<()> {
    let version = Reader::new(datagram).read_u32()?;
    if version != SFLOW_VERSION {
        return Err(SflowError::UnsupportedVersion { version });
    }
    Ok(())
}
