//! Operation chains applied to a value after it is read.
//!
//! A chain is a list of steps. Transforming steps replace the running value;
//! sink steps (record, field, tag) publish it and pass it on unchanged.
//! Chains are dry-run against a representative value when attached to a
//! leaf, so a chain whose steps cannot accept each other's output is
//! rejected while the grammar is being built.

use crate::context::DecodeContext;
use crate::error::{DecodeError, Result};
use crate::value::{Value, ValueKind};
use sflow_types::{FieldValue, IpAddress, MacAddress};
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

type MapFn = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;
type MapBytesFn = Arc<dyn Fn(&[u8]) -> Result<Value> + Send + Sync>;

/// Code-to-name table used by [`Ops::lookup`].
pub type Table = &'static [(u32, &'static str)];

#[derive(Clone)]
enum Op {
    Record(String),
    Field(String),
    Tag(String),
    Map { name: &'static str, f: MapFn },
    MapBytes(MapBytesFn),
    Lookup(Table),
    ScaleBy(String),
    SameAs {
        key: String,
        equal: &'static str,
        different: &'static str,
    },
    FormatIp,
    FormatMac,
    ToText,
    AssertMax {
        max: u64,
        location: &'static Location<'static>,
    },
    Tee(Ops),
}

impl Op {
    fn name(&self) -> &'static str {
        match self {
            Op::Record(_) => "record",
            Op::Field(_) => "field",
            Op::Tag(_) => "tag",
            Op::Map { name, .. } => *name,
            Op::MapBytes(_) => "map_bytes",
            Op::Lookup(_) => "lookup",
            Op::ScaleBy(_) => "scale_by",
            Op::SameAs { .. } => "same_as",
            Op::FormatIp => "format_ip",
            Op::FormatMac => "format_mac",
            Op::ToText => "to_text",
            Op::AssertMax { .. } => "assert_max",
            Op::Tee(_) => "tee",
        }
    }
}

/// An operation chain. Build with [`ops`] and the chaining methods.
#[derive(Clone, Default)]
pub struct Ops {
    steps: Vec<Op>,
}

impl fmt::Debug for Ops {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.steps.iter().map(Op::name))
            .finish()
    }
}

/// Starts an empty chain.
pub fn ops() -> Ops {
    Ops::default()
}

fn integer(op: &'static str, value: &Value) -> Result<u64> {
    value.as_u64().ok_or(DecodeError::TypeMismatch {
        op,
        kind: value.kind(),
    })
}

fn bytes<'v>(op: &'static str, value: &'v Value) -> Result<&'v [u8]> {
    value.as_bytes().ok_or(DecodeError::TypeMismatch {
        op,
        kind: value.kind(),
    })
}

impl Ops {
    fn then(mut self, op: Op) -> Self {
        self.steps.push(op);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Records the running value under `key` in the current scope.
    pub fn record(self, key: &str) -> Self {
        self.then(Op::Record(key.to_string()))
    }

    /// Emits the running value as a metric field.
    pub fn field(self, name: &str) -> Self {
        self.then(Op::Field(name.to_string()))
    }

    /// Emits the running value, rendered as text, as a metric tag.
    pub fn tag(self, name: &str) -> Self {
        self.then(Op::Tag(name.to_string()))
    }

    /// Arbitrary value transform.
    pub fn map(
        self,
        name: &'static str,
        f: impl Fn(Value) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        self.then(Op::Map {
            name,
            f: Arc::new(f),
        })
    }

    pub fn map_u16(self, f: impl Fn(u16) -> u16 + Send + Sync + 'static) -> Self {
        self.map("map_u16", move |v| match v {
            Value::U16(x) => Ok(Value::U16(f(x))),
            other => Err(DecodeError::TypeMismatch {
                op: "map_u16",
                kind: other.kind(),
            }),
        })
    }

    pub fn map_u32(self, f: impl Fn(u32) -> u32 + Send + Sync + 'static) -> Self {
        self.map("map_u32", move |v| match v {
            Value::U32(x) => Ok(Value::U32(f(x))),
            other => Err(DecodeError::TypeMismatch {
                op: "map_u32",
                kind: other.kind(),
            }),
        })
    }

    pub fn map_u64(self, f: impl Fn(u64) -> u64 + Send + Sync + 'static) -> Self {
        self.map("map_u64", move |v| match v {
            Value::U64(x) => Ok(Value::U64(f(x))),
            other => Err(DecodeError::TypeMismatch {
                op: "map_u64",
                kind: other.kind(),
            }),
        })
    }

    /// Transforms a byte value into any value.
    pub fn map_bytes(self, f: impl Fn(&[u8]) -> Result<Value> + Send + Sync + 'static) -> Self {
        self.then(Op::MapBytes(Arc::new(f)))
    }

    /// Replaces an integer code with its name from `table`.
    /// Codes missing from the table render as decimal text.
    pub fn lookup(self, table: Table) -> Self {
        self.then(Op::Lookup(table))
    }

    /// Multiplies the running integer by the integer recorded under `key`.
    pub fn scale_by(self, key: &str) -> Self {
        self.then(Op::ScaleBy(key.to_string()))
    }

    /// Replaces the running value with `equal` when it matches the value
    /// recorded under `key`, otherwise with `different`.
    pub fn same_as(self, key: &str, equal: &'static str, different: &'static str) -> Self {
        self.then(Op::SameAs {
            key: key.to_string(),
            equal,
            different,
        })
    }

    /// Renders 4 or 16 bytes as an IP address.
    pub fn format_ip(self) -> Self {
        self.then(Op::FormatIp)
    }

    /// Renders 6 bytes as a colon-separated MAC address.
    pub fn format_mac(self) -> Self {
        self.then(Op::FormatMac)
    }

    pub fn to_text(self) -> Self {
        self.then(Op::ToText)
    }

    /// Fails the decode when the running integer exceeds `max`.
    #[track_caller]
    pub fn assert_max(self, max: u64) -> Self {
        self.then(Op::AssertMax {
            max,
            location: Location::caller(),
        })
    }

    /// Runs `branch` on a copy of the running value, then continues this
    /// chain with the value unchanged.
    pub fn tee(self, branch: Ops) -> Self {
        self.then(Op::Tee(branch))
    }

    /// Dry-runs the chain against `sample`, panicking if any step rejects
    /// its input.
    #[track_caller]
    pub(crate) fn validate(&self, sample: Value, label: &str) {
        if let Err(err) = self.run(sample, label, None) {
            panic!("invalid operation chain {:?} for '{}': {}", self, label, err);
        }
    }

    /// Applies the chain. Without a context the chain is a dry run:
    /// sinks are no-ops, `scale_by` multiplies by one and `same_as`
    /// takes the `different` branch.
    pub(crate) fn run(
        &self,
        value: Value,
        label: &str,
        ctx: Option<&mut DecodeContext>,
    ) -> Result<()> {
        self.apply(Running::Owned(value), label, ctx)
    }

    /// Applies the chain to borrowed bytes. The bytes are copied only if a
    /// step has to keep them as a [`Value`].
    pub(crate) fn run_bytes(
        &self,
        value: &[u8],
        label: &str,
        ctx: Option<&mut DecodeContext>,
    ) -> Result<()> {
        self.apply(Running::Bytes(value), label, ctx)
    }

    fn apply(
        &self,
        mut value: Running<'_>,
        label: &str,
        mut ctx: Option<&mut DecodeContext>,
    ) -> Result<()> {
        for step in &self.steps {
            value = match step {
                Op::Record(key) => {
                    if let Some(c) = ctx.as_deref_mut() {
                        c.record(key, value.to_value());
                    }
                    value
                }
                Op::Field(name) => {
                    if let Some(c) = ctx.as_deref_mut() {
                        c.emit_field(name, value.to_field());
                    }
                    value
                }
                Op::Tag(name) => {
                    if let Some(c) = ctx.as_deref_mut() {
                        c.emit_tag(name, value.to_string());
                    }
                    value
                }
                Op::Map { f, .. } => Running::Owned(f(value.into_value())?),
                Op::MapBytes(f) => Running::Owned(f(value.bytes("map_bytes")?)?),
                Op::Lookup(table) => {
                    let code = value.integer("lookup")?;
                    let name = table
                        .iter()
                        .find(|(c, _)| u64::from(*c) == code)
                        .map(|(_, n)| n.to_string());
                    Running::Owned(Value::Str(name.unwrap_or_else(|| code.to_string())))
                }
                Op::ScaleBy(key) => {
                    let base = value.integer("scale_by")?;
                    let factor = match ctx.as_deref() {
                        Some(c) => c.require_u64(key)?,
                        None => 1,
                    };
                    Running::Owned(Value::U64(base.saturating_mul(factor)))
                }
                Op::SameAs {
                    key,
                    equal,
                    different,
                } => {
                    let same = match ctx.as_deref() {
                        Some(c) => value.matches(c.require(key)?),
                        None => false,
                    };
                    Running::Owned(Value::Str(if same { equal } else { different }.to_string()))
                }
                Op::FormatIp => {
                    let addr = IpAddress::from_octets(value.bytes("format_ip")?)?;
                    Running::Owned(Value::Str(addr.to_string()))
                }
                Op::FormatMac => {
                    let mac = MacAddress::from_slice(value.bytes("format_mac")?)?;
                    Running::Owned(Value::Str(mac.to_string()))
                }
                Op::ToText => Running::Owned(Value::Str(value.to_string())),
                Op::AssertMax { max, location } => {
                    let v = value.integer("assert_max")?;
                    if v > *max {
                        return Err(DecodeError::AssertMax {
                            key: label.to_string(),
                            value: v,
                            max: *max,
                            location: *location,
                        });
                    }
                    value
                }
                Op::Tee(branch) => {
                    branch.apply(value.share(), label, ctx.as_deref_mut())?;
                    value
                }
            };
        }
        Ok(())
    }
}

/// The value flowing through a chain. Byte reads start out borrowed from
/// the leaf's scratch buffer.
enum Running<'b> {
    Owned(Value),
    Bytes(&'b [u8]),
}

impl<'b> Running<'b> {
    fn kind(&self) -> ValueKind {
        match self {
            Running::Owned(v) => v.kind(),
            Running::Bytes(_) => ValueKind::Bytes,
        }
    }

    fn integer(&self, op: &'static str) -> Result<u64> {
        match self {
            Running::Owned(v) => integer(op, v),
            Running::Bytes(_) => Err(DecodeError::TypeMismatch {
                op,
                kind: self.kind(),
            }),
        }
    }

    fn bytes(&self, op: &'static str) -> Result<&[u8]> {
        match self {
            Running::Owned(v) => bytes(op, v),
            Running::Bytes(b) => Ok(*b),
        }
    }

    fn matches(&self, other: &Value) -> bool {
        match self {
            Running::Owned(v) => other.matches(v),
            Running::Bytes(b) => other.as_bytes() == Some(*b),
        }
    }

    fn to_field(&self) -> FieldValue {
        match self {
            Running::Owned(v) => v.to_field(),
            Running::Bytes(_) => FieldValue::Str(self.to_string()),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Running::Owned(v) => v.clone(),
            Running::Bytes(b) => Value::Bytes(b.to_vec()),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Running::Owned(v) => v,
            Running::Bytes(b) => Value::Bytes(b.to_vec()),
        }
    }

    fn share(&self) -> Running<'b> {
        match self {
            Running::Owned(v) => Running::Owned(v.clone()),
            Running::Bytes(b) => Running::Bytes(*b),
        }
    }
}

impl fmt::Display for Running<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Running::Owned(v) => fmt::Display::fmt(v, f),
            Running::Bytes(b) => b.iter().try_for_each(|byte| write!(f, "{:02x}", byte)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;

    const PROTOCOLS: Table = &[(1, "ETHERNET-ISO88023"), (11, "IPv4")];

    fn ctx() -> DecodeContext {
        DecodeContext::with_timestamp(DateTime::<Utc>::UNIX_EPOCH)
    }

    fn finish_one(mut c: DecodeContext) -> sflow_types::Metric {
        c.close_metric().unwrap();
        c.finish().unwrap().metrics.remove(0)
    }

    #[test]
    fn test_record_then_transform() {
        let mut c = ctx();
        ops()
            .record("raw")
            .map_u32(|v| v >> 24)
            .record("type")
            .run(Value::U32(0x0200_01fe), "source", Some(&mut c))
            .unwrap();
        assert_eq!(c.lookup("raw"), Some(&Value::U32(0x0200_01fe)));
        assert_eq!(c.lookup("type"), Some(&Value::U32(2)));
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        let mut c = ctx();
        c.open_metric("sflow").unwrap();
        ops()
            .lookup(PROTOCOLS)
            .tag("header_protocol")
            .run(Value::U32(1), "protocol", Some(&mut c))
            .unwrap();
        ops()
            .lookup(PROTOCOLS)
            .tag("other")
            .run(Value::U32(99), "protocol", Some(&mut c))
            .unwrap();
        let m = finish_one(c);
        assert_eq!(m.tag("header_protocol"), Some("ETHERNET-ISO88023"));
        assert_eq!(m.tag("other"), Some("99"));
    }

    #[test]
    fn test_scale_by() {
        let mut c = ctx();
        c.record("samplingRate", Value::U32(0x400));
        c.open_metric("sflow").unwrap();
        ops()
            .field("frame_length")
            .scale_by("samplingRate")
            .field("bytes")
            .run(Value::U32(0x10b), "frameLength", Some(&mut c))
            .unwrap();
        let m = finish_one(c);
        assert_eq!(m.field("frame_length"), Some(&FieldValue::UInt(267)));
        assert_eq!(m.field("bytes"), Some(&FieldValue::UInt(0x042c00)));
    }

    #[test]
    fn test_same_as() {
        let mut c = ctx();
        c.record("sourceId", Value::U32(510));
        c.open_metric("sflow").unwrap();
        let chain = ops().tee(ops().tag("input_ifindex")).same_as(
            "sourceId",
            "ingress",
            "egress",
        );
        chain.run(Value::U32(510), "input", Some(&mut c)).unwrap();
        chain
            .clone()
            .tag("sample_direction")
            .run(Value::U32(528), "input", Some(&mut c))
            .unwrap();
        let m = finish_one(c);
        assert_eq!(m.tag("input_ifindex"), Some("528"));
        assert_eq!(m.tag("sample_direction"), Some("egress"));
    }

    #[test]
    fn test_format_addresses() {
        let mut c = ctx();
        c.open_metric("sflow").unwrap();
        ops()
            .format_ip()
            .tag("src_ip")
            .run(Value::Bytes(vec![192, 168, 9, 19]), "srcIP", Some(&mut c))
            .unwrap();
        ops()
            .format_mac()
            .tag("src_mac")
            .run(
                Value::Bytes(vec![0x94, 0xc6, 0x91, 0xaa, 0x97, 0x60]),
                "srcMac",
                Some(&mut c),
            )
            .unwrap();
        let m = finish_one(c);
        assert_eq!(m.tag("src_ip"), Some("192.168.9.19"));
        assert_eq!(m.tag("src_mac"), Some("94:c6:91:aa:97:60"));
    }

    #[test]
    fn test_borrowed_bytes() {
        let mut c = ctx();
        c.open_metric("sflow").unwrap();
        let mac = [0x94, 0xc6, 0x91, 0xaa, 0x97, 0x60];
        ops()
            .tee(ops().format_mac().tag("src_mac"))
            .tee(ops().tag("raw"))
            .record("srcMac")
            .map_bytes(|b| Ok(Value::U32(b.len() as u32)))
            .field("width")
            .run_bytes(&mac, "srcMac", Some(&mut c))
            .unwrap();
        assert_eq!(c.lookup("srcMac"), Some(&Value::Bytes(mac.to_vec())));
        let m = finish_one(c);
        assert_eq!(m.tag("src_mac"), Some("94:c6:91:aa:97:60"));
        assert_eq!(m.tag("raw"), Some("94c691aa9760"));
        assert_eq!(m.field("width"), Some(&FieldValue::UInt(6)));
    }

    #[test]
    fn test_borrowed_bytes_reject_integer_steps() {
        let err = ops()
            .lookup(PROTOCOLS)
            .run_bytes(&[0, 1], "protocol", None)
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::TypeMismatch {
                op: "lookup",
                kind: ValueKind::Bytes
            }
        );
    }

    #[test]
    fn test_assert_max_reports_location() {
        let chain = ops().assert_max(10);
        let err = chain.run(Value::U32(11), "count", None).unwrap_err();
        match err {
            DecodeError::AssertMax {
                key,
                value,
                max,
                location,
            } => {
                assert_eq!(key, "count");
                assert_eq!(value, 11);
                assert_eq!(max, 10);
                assert!(location.file().ends_with("ops.rs"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_accepts_valid_chain() {
        ops()
            .map_u16(|v| (v & 0xfc) >> 2)
            .to_text()
            .field("ip_dscp")
            .validate(Value::U16(0), "tos");
    }

    #[test]
    #[should_panic(expected = "invalid operation chain")]
    fn test_validate_rejects_mismatched_chain() {
        ops().to_text().map_u32(|v| v + 1).validate(Value::U32(0), "x");
    }

    #[test]
    #[should_panic(expected = "format_mac")]
    fn test_validate_rejects_wrong_width() {
        ops().format_mac().validate(Value::Bytes(vec![0; 4]), "mac");
    }
}
