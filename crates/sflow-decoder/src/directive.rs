//! The directive tree and its interpreter.

use crate::context::DecodeContext;
use crate::error::{DecodeError, Interrupt, Step};
use crate::ops::Ops;
use crate::reader::Reader;
use crate::value::{Value, ValueKind};
use std::panic::Location;
use tracing::{debug, warn};

/// Fixed-width big-endian primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    U16,
    U32,
    U64,
    I32,
    Bytes(usize),
}

impl Primitive {
    fn kind(self) -> ValueKind {
        match self {
            Primitive::U16 => ValueKind::U16,
            Primitive::U32 => ValueKind::U32,
            Primitive::U64 => ValueKind::U64,
            Primitive::I32 => ValueKind::I32,
            Primitive::Bytes(_) => ValueKind::Bytes,
        }
    }

    fn width(self) -> usize {
        match self {
            Primitive::U16 => 2,
            Primitive::U32 | Primitive::I32 => 4,
            Primitive::U64 => 8,
            Primitive::Bytes(n) => n,
        }
    }

}

/// A primitive read, optionally recorded under a key, followed by an
/// operation chain.
#[derive(Debug, Clone)]
pub struct Leaf {
    primitive: Primitive,
    key: Option<String>,
    ops: Ops,
    scratch: Vec<u8>,
}

impl Leaf {
    pub(crate) fn new(primitive: Primitive, key: Option<&str>) -> Self {
        Self {
            primitive,
            key: key.map(str::to_string),
            ops: Ops::default(),
            scratch: Vec::new(),
        }
    }

    fn label(&self) -> String {
        match &self.key {
            Some(key) => key.clone(),
            None => format!("<{}>", self.primitive.kind()),
        }
    }

    /// Attaches an operation chain.
    ///
    /// # Panics
    ///
    /// Panics if the chain cannot be applied to a value of this leaf's type.
    #[track_caller]
    pub fn with(mut self, ops: Ops) -> Self {
        let sample = Value::representative(self.primitive.kind(), self.primitive.width());
        ops.validate(sample, &self.label());
        self.ops = ops;
        self
    }

    /// Bytes held from the most recent byte read, emptied by `reset`.
    pub fn scratch(&self) -> &[u8] {
        &self.scratch
    }

    fn execute(&mut self, reader: &mut Reader<'_>, ctx: &mut DecodeContext) -> Step {
        let value = match self.primitive {
            Primitive::U16 => Value::U16(reader.read_u16()?),
            Primitive::U32 => Value::U32(reader.read_u32()?),
            Primitive::U64 => Value::U64(reader.read_u64()?),
            Primitive::I32 => Value::I32(reader.read_i32()?),
            Primitive::Bytes(n) => {
                self.scratch.clear();
                self.scratch.extend_from_slice(reader.take(n)?);
                if let Some(key) = &self.key {
                    ctx.record(key, Value::Bytes(self.scratch.clone()));
                }
                if !self.ops.is_empty() {
                    let label = self.label();
                    self.ops.run_bytes(&self.scratch, &label, Some(ctx))?;
                }
                return Ok(());
            }
        };
        if let Some(key) = &self.key {
            ctx.record(key, value.clone());
        }
        if !self.ops.is_empty() {
            let label = self.label();
            self.ops.run(value, &label, Some(ctx))?;
        }
        Ok(())
    }
}

/// One branch of an [`Directive::Alt`]. A case without a value is the default.
#[derive(Debug, Clone)]
pub struct Case {
    pub(crate) value: Option<Value>,
    pub(crate) body: Directive,
}

/// A node of the decoding grammar.
#[derive(Debug, Clone)]
pub enum Directive {
    /// Read a primitive.
    Leaf(Leaf),
    /// Run children in order.
    Seq(Vec<Directive>),
    /// Pick a branch by the value recorded under `key`.
    Alt {
        key: String,
        cases: Vec<(Value, Directive)>,
        default: Option<Box<Directive>>,
        location: &'static Location<'static>,
    },
    /// Run `body` once per count, each time in a fresh scope appended to the list under `key`.
    Iter {
        key: String,
        count_key: String,
        max: u32,
        body: Box<Directive>,
    },
    /// Run `body` over exactly the next `length_key` bytes. Absorbs the skip signal.
    Sub {
        length_key: String,
        max: u32,
        body: Box<Directive>,
    },
    /// Run `body` in a fresh scope recorded as a single-element list under `key`.
    Nest { key: String, body: Box<Directive> },
    /// Copy a recorded value to another key.
    Assign { from: String, to: String },
    /// Bound a recorded integer. With `unwrap` set, exceeding it skips instead of failing.
    AssertMax {
        key: String,
        max: u64,
        unwrap: bool,
        location: &'static Location<'static>,
    },
    /// Run an operation chain over an already recorded value.
    Apply { key: String, ops: Ops },
    /// Log a warning, naming the value under `key` if given, and raise the skip signal.
    WarnAndBreak { reason: String, key: Option<String> },
    OpenMetric(String),
    CloseMetric,
    /// Fail the decode.
    Fail(String),
}

impl From<Leaf> for Directive {
    fn from(leaf: Leaf) -> Self {
        Directive::Leaf(leaf)
    }
}

fn to_usize(key: &str, length: u64) -> crate::Result<usize> {
    usize::try_from(length).map_err(|_| DecodeError::LengthLimit {
        key: key.to_string(),
        length,
        max: u32::MAX,
    })
}

impl Directive {
    /// Empties every leaf's byte scratch. Capacity is kept for the next decode.
    pub fn reset(&mut self) {
        match self {
            Directive::Leaf(leaf) => leaf.scratch.clear(),
            Directive::Seq(children) => children.iter_mut().for_each(Directive::reset),
            Directive::Alt { cases, default, .. } => {
                cases.iter_mut().for_each(|(_, body)| body.reset());
                if let Some(d) = default {
                    d.reset();
                }
            }
            Directive::Iter { body, .. }
            | Directive::Sub { body, .. }
            | Directive::Nest { body, .. } => body.reset(),
            Directive::Assign { .. }
            | Directive::AssertMax { .. }
            | Directive::Apply { .. }
            | Directive::WarnAndBreak { .. }
            | Directive::OpenMetric(_)
            | Directive::CloseMetric
            | Directive::Fail(_) => {}
        }
    }

    pub(crate) fn execute(&mut self, reader: &mut Reader<'_>, ctx: &mut DecodeContext) -> Step {
        match self {
            Directive::Leaf(leaf) => leaf.execute(reader, ctx),

            Directive::Seq(children) => {
                for child in children.iter_mut() {
                    child.execute(reader, ctx)?;
                }
                Ok(())
            }

            Directive::Alt {
                key,
                cases,
                default,
                location,
            } => {
                let value = ctx.require(key)?.clone();
                if let Some((_, body)) = cases.iter_mut().find(|(v, _)| v.matches(&value)) {
                    return body.execute(reader, ctx);
                }
                match default {
                    Some(body) => body.execute(reader, ctx),
                    None => Err(DecodeError::UnmatchedCase {
                        key: key.clone(),
                        value,
                        location: *location,
                    }
                    .into()),
                }
            }

            Directive::Iter {
                key,
                count_key,
                max,
                body,
            } => {
                let count = ctx.require_u64(count_key)?;
                if count > u64::from(*max) {
                    return Err(DecodeError::IterationLimit {
                        key: count_key.clone(),
                        count,
                        max: *max,
                    }
                    .into());
                }
                ctx.ensure_records(key);
                for _ in 0..count {
                    ctx.push_scope();
                    let step = body.execute(reader, ctx);
                    let record = ctx.pop_scope();
                    ctx.push_record(key, record);
                    step?;
                }
                Ok(())
            }

            Directive::Sub {
                length_key,
                max,
                body,
            } => {
                let length = ctx.require_u64(length_key)?;
                if length > u64::from(*max) {
                    return Err(DecodeError::LengthLimit {
                        key: length_key.clone(),
                        length,
                        max: *max,
                    }
                    .into());
                }
                let region = reader.take(to_usize(length_key, length)?)?;
                let mut inner = Reader::new(region);
                let checkpoint = ctx.checkpoint();
                match body.execute(&mut inner, ctx) {
                    Ok(()) => Ok(()),
                    Err(Interrupt::Skip(reason)) => {
                        debug!(region = %length_key, %reason, "skipped rest of region");
                        ctx.restore(checkpoint);
                        Ok(())
                    }
                    Err(fatal) => Err(fatal),
                }
            }

            Directive::Nest { key, body } => {
                ctx.push_scope();
                let step = body.execute(reader, ctx);
                let record = ctx.pop_scope();
                ctx.push_record(key, record);
                step
            }

            Directive::Assign { from, to } => {
                let value = ctx.require(from)?.clone();
                ctx.record(to, value);
                Ok(())
            }

            Directive::AssertMax {
                key,
                max,
                unwrap,
                location,
            } => {
                let value = ctx.require_u64(key)?;
                if value <= *max {
                    return Ok(());
                }
                if *unwrap {
                    Err(Interrupt::Skip(format!(
                        "'{}' = {} exceeds {}",
                        key, value, max
                    )))
                } else {
                    Err(DecodeError::AssertMax {
                        key: key.clone(),
                        value,
                        max: *max,
                        location: *location,
                    }
                    .into())
                }
            }

            Directive::Apply { key, ops } => {
                let value = ctx.require(key)?.clone();
                ops.run(value, key, Some(ctx))?;
                Ok(())
            }

            Directive::WarnAndBreak { reason, key } => {
                let reason = match key.as_deref().and_then(|k| ctx.lookup(k).map(|v| (k, v))) {
                    Some((k, v)) => format!("{} ({} = {})", reason, k, v),
                    None => reason.clone(),
                };
                warn!(%reason, "skipping undecodable data");
                Err(Interrupt::Skip(reason))
            }

            Directive::OpenMetric(name) => Ok(ctx.open_metric(name)?),

            Directive::CloseMetric => Ok(ctx.close_metric()?),

            Directive::Fail(msg) => Err(DecodeError::Failed(msg.clone()).into()),
        }
    }
}
