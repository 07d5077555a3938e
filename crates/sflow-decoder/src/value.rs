//! Values produced by leaf reads and transformed by operation chains.

use serde::Serialize;
use sflow_types::FieldValue;
use std::fmt;

/// A decoded value.
///
/// The set is closed: every primitive read yields one of the integer or
/// byte variants, and text is produced only by operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    U16(u16),
    U32(u32),
    U64(u64),
    I32(i32),
    Bytes(Vec<u8>),
    Str(String),
}

/// The variant of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    U16,
    U32,
    U64,
    I32,
    Bytes,
    Str,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueKind::U16 => "u16",
            ValueKind::U32 => "u32",
            ValueKind::U64 => "u64",
            ValueKind::I32 => "i32",
            ValueKind::Bytes => "bytes",
            ValueKind::Str => "string",
        };
        f.write_str(s)
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::U16(_) => ValueKind::U16,
            Value::U32(_) => ValueKind::U32,
            Value::U64(_) => ValueKind::U64,
            Value::I32(_) => ValueKind::I32,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Str(_) => ValueKind::Str,
        }
    }

    /// A zero value of the given kind, used to dry-run operation chains.
    /// `width` sizes the byte variant.
    pub fn representative(kind: ValueKind, width: usize) -> Value {
        match kind {
            ValueKind::U16 => Value::U16(0),
            ValueKind::U32 => Value::U32(0),
            ValueKind::U64 => Value::U64(0),
            ValueKind::I32 => Value::I32(0),
            ValueKind::Bytes => Value::Bytes(vec![0; width]),
            ValueKind::Str => Value::Str(String::new()),
        }
    }

    /// Widens unsigned integers to `u64`. Signed and non-numeric values give `None`.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U16(v) => Some(u64::from(*v)),
            Value::U32(v) => Some(u64::from(*v)),
            Value::U64(v) => Some(*v),
            _ => None,
        }
    }

    /// Equality used by case matching: unsigned integers compare by numeric
    /// value across widths, everything else compares structurally.
    pub fn matches(&self, other: &Value) -> bool {
        match (self.as_u64(), other.as_u64()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Converts to a metric field value. Integers stay numeric; bytes render as hex.
    pub fn to_field(&self) -> FieldValue {
        match self {
            Value::U16(v) => FieldValue::UInt(u64::from(*v)),
            Value::U32(v) => FieldValue::UInt(u64::from(*v)),
            Value::U64(v) => FieldValue::UInt(*v),
            Value::I32(v) => FieldValue::Int(i64::from(*v)),
            Value::Bytes(_) => FieldValue::Str(self.to_string()),
            Value::Str(s) => FieldValue::Str(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::U16(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::Bytes(b) => {
                for byte in b {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::U16(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}
