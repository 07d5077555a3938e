//! Metric output
//!
//! Decoded metrics are written one per line, either as JSON objects or in
//! InfluxDB line protocol.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use sflow_types::{FieldValue, Metric};
use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::Mutex;

/// Output encoding for decoded metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per metric
    #[default]
    Json,
    /// InfluxDB line protocol
    Line,
}

/// Destination for decoded metrics; shared by all decode workers.
pub trait MetricSink: Send + Sync {
    fn write(&self, metrics: &[Metric]) -> Result<()>;
}

/// Sink writing encoded metrics to any [`Write`] implementation.
pub struct WriterSink<W: Write + Send> {
    format: OutputFormat,
    writer: Mutex<W>,
}

impl WriterSink<io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(format, io::stdout())
    }
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(format: OutputFormat, writer: W) -> Self {
        Self {
            format,
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the sink, returning the underlying writer.
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> MetricSink for WriterSink<W> {
    fn write(&self, metrics: &[Metric]) -> Result<()> {
        if metrics.is_empty() {
            return Ok(());
        }

        let mut out = String::new();
        for metric in metrics {
            match self.format {
                OutputFormat::Json => out.push_str(&serde_json::to_string(metric)?),
                OutputFormat::Line => out.push_str(&to_line_protocol(metric)),
            }
            out.push('\n');
        }

        // a poisoned lock only means another worker panicked mid-write
        let mut writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        writer.write_all(out.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// Encodes a metric as a single InfluxDB line protocol record.
pub fn to_line_protocol(metric: &Metric) -> String {
    let mut line = escape(&metric.name, &[',', ' ']);

    for (name, value) in &metric.tags {
        if value.is_empty() {
            continue;
        }
        let _ = write!(
            line,
            ",{}={}",
            escape(name, &[',', ' ', '=']),
            escape(value, &[',', ' ', '='])
        );
    }

    let fields: Vec<String> = metric
        .fields
        .iter()
        .map(|(name, value)| {
            let name = escape(name, &[',', ' ', '=']);
            match value {
                FieldValue::UInt(v) => format!("{}={}u", name, v),
                FieldValue::Int(v) => format!("{}={}i", name, v),
                FieldValue::Str(s) => format!("{}=\"{}\"", name, escape(s, &['"'])),
            }
        })
        .collect();
    line.push(' ');
    line.push_str(&fields.join(","));

    let _ = write!(
        line,
        " {}",
        metric.timestamp.timestamp_nanos_opt().unwrap_or_default()
    );
    line
}

fn escape(s: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\\' || special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
