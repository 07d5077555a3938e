//! Prometheus counters for the collector
//!
//! Rendered in the Prometheus text exposition format on shutdown and on
//! demand.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Collector statistics shared by the reader and all workers
#[derive(Clone)]
pub struct DaemonStats {
    datagrams_received: IntCounter,
    datagrams_dropped: IntCounter,
    decode_failures: IntCounterVec,
    metrics_emitted: IntCounter,
    sink_failures: IntCounter,
    decode_latency_seconds: Histogram,

    registry: Arc<Registry>,
}

impl DaemonStats {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let datagrams_received = IntCounter::new(
            "sflowd_datagrams_received_total",
            "Total datagrams read from the socket",
        )?;
        registry.register(Box::new(datagrams_received.clone()))?;

        let datagrams_dropped = IntCounter::new(
            "sflowd_datagrams_dropped_total",
            "Datagrams dropped because the worker queue was full",
        )?;
        registry.register(Box::new(datagrams_dropped.clone()))?;

        let decode_failures = IntCounterVec::new(
            Opts::new(
                "sflowd_decode_failures_total",
                "Datagrams that failed to decode, by reason",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(decode_failures.clone()))?;

        let metrics_emitted = IntCounter::new(
            "sflowd_metrics_emitted_total",
            "Metrics handed to the output sink",
        )?;
        registry.register(Box::new(metrics_emitted.clone()))?;

        let sink_failures = IntCounter::new(
            "sflowd_sink_failures_total",
            "Metric batches the output sink failed to write",
        )?;
        registry.register(Box::new(sink_failures.clone()))?;

        let decode_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "sflowd_decode_latency_seconds",
                "Per-datagram decode latency in seconds",
            )
            .buckets(vec![0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.01]),
        )?;
        registry.register(Box::new(decode_latency_seconds.clone()))?;

        Ok(Self {
            datagrams_received,
            datagrams_dropped,
            decode_failures,
            metrics_emitted,
            sink_failures,
            decode_latency_seconds,
            registry: Arc::new(registry),
        })
    }

    pub fn record_received(&self) {
        self.datagrams_received.inc();
    }

    pub fn record_dropped(&self) {
        self.datagrams_dropped.inc();
    }

    /// Record a failed decode; `reason` is a short stable label such as
    /// `short_read` or `limit`.
    pub fn record_decode_failure(&self, reason: &str) {
        self.decode_failures.with_label_values(&[reason]).inc();
    }

    pub fn record_emitted(&self, count: usize) {
        self.metrics_emitted.inc_by(count as u64);
    }

    pub fn record_sink_failure(&self) {
        self.sink_failures.inc();
    }

    /// Start decode latency timer
    pub fn start_decode_latency(&self) -> prometheus::HistogramTimer {
        self.decode_latency_seconds.start_timer()
    }

    pub fn datagrams_received(&self) -> u64 {
        self.datagrams_received.get()
    }

    pub fn datagrams_dropped(&self) -> u64 {
        self.datagrams_dropped.get()
    }

    pub fn metrics_emitted(&self) -> u64 {
        self.metrics_emitted.get()
    }

    /// Gather metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buf = vec![];
        encoder.encode(&self.registry.gather(), &mut buf).ok();
        String::from_utf8(buf).unwrap_or_else(|_| String::from("# Error encoding metrics\n"))
    }
}
