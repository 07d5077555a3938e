//! A compiled grammar ready to decode buffers.

use crate::context::{DecodeContext, Decoded};
use crate::directive::Directive;
use crate::error::{DecodeError, Interrupt, Result};
use crate::reader::Reader;
use chrono::{DateTime, Utc};
use tracing::trace;

/// Root of a grammar plus its per-decode scratch state.
///
/// Decoding takes `&mut self`, so one plan serves one decode at a time.
/// Clone the plan to decode on several threads.
#[derive(Debug, Clone)]
pub struct Plan {
    root: Directive,
}

impl Plan {
    pub fn new(root: impl Into<Directive>) -> Self {
        Self { root: root.into() }
    }

    /// Decodes one buffer. Metrics are stamped with the current time.
    pub fn decode(&mut self, buf: &[u8]) -> Result<Decoded> {
        self.decode_at(buf, Utc::now())
    }

    /// Decodes one buffer, stamping metrics with `timestamp`.
    pub fn decode_at(&mut self, buf: &[u8], timestamp: DateTime<Utc>) -> Result<Decoded> {
        self.reset();
        let mut reader = Reader::new(buf);
        let mut ctx = DecodeContext::with_timestamp(timestamp);
        match self.root.execute(&mut reader, &mut ctx) {
            Ok(()) => {}
            Err(Interrupt::Skip(reason)) => return Err(DecodeError::SkipOutsideSub { reason }),
            Err(Interrupt::Fatal(err)) => return Err(err),
        }
        let decoded = ctx.finish()?;
        trace!(
            bytes = buf.len(),
            trailing = reader.remaining(),
            metrics = decoded.metrics.len(),
            "decoded buffer"
        );
        Ok(decoded)
    }

    /// Clears scratch state left by the previous decode.
    pub fn reset(&mut self) {
        self.root.reset();
    }

    pub fn root(&self) -> &Directive {
        &self.root
    }
}
