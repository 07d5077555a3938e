//! Limits applied while decoding sFlow v5 datagrams.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Decoder limits. Every bound defaults to `u32::MAX`, i.e. unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct V5FormatOptions {
    /// Flow records per flow sample. Samples above this are skipped.
    #[serde(default = "default_limit")]
    pub max_flows_per_sample: u32,

    /// Counter records per counter sample. Samples above this are skipped.
    #[serde(default = "default_limit")]
    pub max_counters_per_sample: u32,

    /// Samples per datagram. Datagrams above this fail.
    #[serde(default = "default_limit")]
    pub max_samples_per_packet: u32,

    /// Flow record and sampled header length.
    #[serde(default = "default_limit")]
    pub max_flow_header_length: u32,

    /// Counter record length.
    #[serde(default = "default_limit")]
    pub max_counter_header_length: u32,

    /// Sample length.
    #[serde(default = "default_limit")]
    pub max_sample_length: u32,

    /// Decode the sampled packet header (Ethernet, IP, TCP/UDP).
    #[serde(default = "default_include_headers")]
    pub include_headers: bool,
}

fn default_limit() -> u32 {
    u32::MAX
}

fn default_include_headers() -> bool {
    true
}

impl Default for V5FormatOptions {
    fn default() -> Self {
        Self {
            max_flows_per_sample: default_limit(),
            max_counters_per_sample: default_limit(),
            max_samples_per_packet: default_limit(),
            max_flow_header_length: default_limit(),
            max_counter_header_length: default_limit(),
            max_sample_length: default_limit(),
            include_headers: default_include_headers(),
        }
    }
}

impl V5FormatOptions {
    /// Logs every limit that differs from its default.
    pub fn log_if_not_default(&self) {
        let limits = [
            ("max_flows_per_sample", self.max_flows_per_sample),
            ("max_counters_per_sample", self.max_counters_per_sample),
            ("max_samples_per_packet", self.max_samples_per_packet),
            ("max_flow_header_length", self.max_flow_header_length),
            ("max_counter_header_length", self.max_counter_header_length),
            ("max_sample_length", self.max_sample_length),
        ];
        for (name, value) in limits {
            if value < u32::MAX {
                debug!(option = name, value, "non-default sFlow decoder limit");
            }
        }
        if !self.include_headers {
            debug!("sampled packet headers will not be decoded");
        }
    }
}
