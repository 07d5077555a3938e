//! Metric representation handed to the output side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A scalar metric field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    UInt(u64),
    Int(i64),
    Str(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::UInt(v) => write!(f, "{}", v),
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        FieldValue::UInt(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

/// A single measurement: name, tag set, field set and timestamp.
///
/// Tags and fields are kept in ordered maps so two metrics built from the
/// same input compare and serialize identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, FieldValue>,
    pub timestamp: DateTime<Utc>,
}

impl Metric {
    /// Creates an empty metric.
    pub fn new(name: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            tags: BTreeMap::new(),
            fields: BTreeMap::new(),
            timestamp,
        }
    }

    /// Returns the tag value for `name`, if present.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }

    /// Returns the field value for `name`, if present.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Sets a tag, replacing any previous value.
    pub fn set_tag(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(name.into(), value.into());
    }

    /// Sets a field, replacing any previous value.
    pub fn set_field(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_and_get() {
        let mut m = Metric::new("sflow", DateTime::<Utc>::UNIX_EPOCH);
        m.set_tag("agent_address", "192.168.1.2");
        m.set_field("bytes", FieldValue::UInt(273408));
        m.set_field("ip_dscp", FieldValue::from("0"));

        assert_eq!(m.tag("agent_address"), Some("192.168.1.2"));
        assert_eq!(m.field("bytes"), Some(&FieldValue::UInt(273408)));
        assert_eq!(m.field("ip_dscp"), Some(&FieldValue::Str("0".into())));
        assert_eq!(m.tag("missing"), None);
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::UInt(42).to_string(), "42");
        assert_eq!(FieldValue::Int(-3).to_string(), "-3");
        assert_eq!(FieldValue::from("ingress").to_string(), "ingress");
    }

    #[test]
    fn test_json_serialization() {
        let mut m = Metric::new("sflow", DateTime::<Utc>::UNIX_EPOCH);
        m.set_tag("src_port", "161");
        m.set_field("ip_ttl", FieldValue::UInt(64));
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"src_port\":\"161\""));
        assert!(json.contains("\"ip_ttl\":64"));
    }
}
