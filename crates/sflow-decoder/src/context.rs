//! Per-decode state: recorded attributes and metric emission.

use crate::error::{DecodeError, Result};
use crate::scope::{Attributes, ScopeStack};
use crate::value::Value;
use chrono::{DateTime, Utc};
use sflow_types::{FieldValue, Metric};
use std::collections::BTreeMap;
use tracing::trace;

/// Everything a single decode produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub attributes: Attributes,
    pub metrics: Vec<Metric>,
}

/// Metric state saved on entry to a bounded region.
#[derive(Debug)]
pub(crate) struct Checkpoint {
    open: Option<Metric>,
    closed: usize,
    tags: BTreeMap<String, String>,
    fields: BTreeMap<String, FieldValue>,
}

/// Mutable state threaded through one decode invocation.
///
/// Tags and fields emitted while a metric is open go to that metric;
/// emitted otherwise, they are held in the current scope and copied into
/// every metric opened later inside it.
#[derive(Debug)]
pub struct DecodeContext {
    scopes: ScopeStack,
    open: Option<Metric>,
    metrics: Vec<Metric>,
    timestamp: DateTime<Utc>,
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeContext {
    pub fn new() -> Self {
        Self::with_timestamp(Utc::now())
    }

    /// Metrics produced by this context carry `timestamp`.
    pub fn with_timestamp(timestamp: DateTime<Utc>) -> Self {
        Self {
            scopes: ScopeStack::default(),
            open: None,
            metrics: Vec::new(),
            timestamp,
        }
    }

    /// Looks up a value visible from the current scope.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        self.scopes.lookup(key)
    }

    pub fn require(&self, key: &str) -> Result<&Value> {
        self.lookup(key).ok_or_else(|| DecodeError::MissingKey {
            key: key.to_string(),
        })
    }

    /// Looks up a value and widens it to `u64`.
    pub fn require_u64(&self, key: &str) -> Result<u64> {
        let value = self.require(key)?;
        value.as_u64().ok_or_else(|| DecodeError::NotAnInteger {
            key: key.to_string(),
            value: value.clone(),
        })
    }

    pub fn record(&mut self, key: &str, value: Value) {
        trace!(key, %value, "record");
        self.scopes.record(key, value);
    }

    pub fn emit_tag(&mut self, name: &str, value: String) {
        match self.open.as_mut() {
            Some(metric) => metric.set_tag(name, value),
            None => self.scopes.pending_tag(name, value),
        }
    }

    pub fn emit_field(&mut self, name: &str, value: FieldValue) {
        match self.open.as_mut() {
            Some(metric) => metric.set_field(name, value),
            None => self.scopes.pending_field(name, value),
        }
    }

    /// Starts a metric, seeded with the tags and fields pending in enclosing scopes.
    pub fn open_metric(&mut self, name: &str) -> Result<()> {
        if let Some(open) = &self.open {
            return Err(DecodeError::MetricAlreadyOpen {
                name: name.to_string(),
                open: open.name.clone(),
            });
        }
        let mut metric = Metric::new(name, self.timestamp);
        let (tags, fields) = self.scopes.pending();
        metric.tags = tags;
        metric.fields = fields;
        self.open = Some(metric);
        Ok(())
    }

    pub fn close_metric(&mut self) -> Result<()> {
        let metric = self.open.take().ok_or(DecodeError::NoOpenMetric)?;
        self.metrics.push(metric);
        Ok(())
    }

    pub fn metric_open(&self) -> bool {
        self.open.is_some()
    }

    /// Captures the metric state a bounded region may later have to undo.
    pub(crate) fn checkpoint(&self) -> Checkpoint {
        let (tags, fields) = self.scopes.top_pending();
        Checkpoint {
            open: self.open.clone(),
            closed: self.metrics.len(),
            tags,
            fields,
        }
    }

    /// Undoes every tag, field and metric emitted since `checkpoint`.
    /// Recorded attributes are left alone.
    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        if let Some(metric) = &self.open {
            if checkpoint.open.is_none() {
                trace!(name = %metric.name, "discarding unfinished metric");
            }
        }
        self.open = checkpoint.open;
        self.metrics.truncate(checkpoint.closed);
        self.scopes
            .restore_top_pending(checkpoint.tags, checkpoint.fields);
    }

    /// Metrics closed so far.
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub(crate) fn push_scope(&mut self) {
        self.scopes.push();
    }

    pub(crate) fn pop_scope(&mut self) -> Attributes {
        self.scopes.pop()
    }

    pub(crate) fn push_record(&mut self, key: &str, record: Attributes) {
        self.scopes.push_record(key, record);
    }

    pub(crate) fn ensure_records(&mut self, key: &str) {
        self.scopes.ensure_records(key);
    }

    /// Ends the decode. Fails if a metric is still open.
    pub fn finish(self) -> Result<Decoded> {
        if let Some(metric) = self.open {
            return Err(DecodeError::UnclosedMetric { name: metric.name });
        }
        Ok(Decoded {
            attributes: self.scopes.into_root(),
            metrics: self.metrics,
        })
    }
}
