//! Recorded attributes and the scope stack that holds them during a decode.
//!
//! Each nested decode (an iteration element or a nest) pushes a scope.
//! Lookups read through to enclosing scopes; writes land in the innermost one.

use crate::value::Value;
use serde::Serialize;
use sflow_types::FieldValue;
use std::collections::BTreeMap;

/// One recorded entry: a scalar value or a list of child records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Attribute {
    Value(Value),
    Records(Vec<Attributes>),
}

/// Keyed attribute map produced by a decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, Attribute>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Attribute> {
        self.0.get(key)
    }

    /// Returns the scalar recorded under `key`.
    pub fn value(&self, key: &str) -> Option<&Value> {
        match self.0.get(key) {
            Some(Attribute::Value(v)) => Some(v),
            _ => None,
        }
    }

    /// Returns the child records under `key`.
    pub fn records(&self, key: &str) -> Option<&[Attributes]> {
        match self.0.get(key) {
            Some(Attribute::Records(r)) => Some(r),
            _ => None,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), Attribute::Value(value));
    }

    /// Appends a child record to the list under `key`, creating the list if needed.
    /// A scalar previously recorded under the same key is replaced.
    pub fn push_record(&mut self, key: &str, record: Attributes) {
        match self.0.get_mut(key) {
            Some(Attribute::Records(list)) => list.push(record),
            _ => {
                self.0
                    .insert(key.to_string(), Attribute::Records(vec![record]));
            }
        }
    }

    /// Ensures an (possibly empty) list exists under `key`.
    pub(crate) fn ensure_records(&mut self, key: &str) {
        if !matches!(self.0.get(key), Some(Attribute::Records(_))) {
            self.0.insert(key.to_string(), Attribute::Records(Vec::new()));
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Attribute)> {
        self.0.iter()
    }
}

/// A single scope: attributes plus tags and fields emitted while no metric was open.
#[derive(Debug, Default)]
struct Scope {
    attributes: Attributes,
    tags: BTreeMap<String, String>,
    fields: BTreeMap<String, FieldValue>,
}

/// Stack of scopes. The root scope is always present.
#[derive(Debug)]
pub(crate) struct ScopeStack {
    frames: Vec<Scope>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self {
            frames: vec![Scope::default()],
        }
    }
}

impl ScopeStack {
    fn top(&mut self) -> &mut Scope {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Innermost-first lookup.
    pub(crate) fn lookup(&self, key: &str) -> Option<&Value> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.attributes.value(key))
    }

    pub(crate) fn record(&mut self, key: &str, value: Value) {
        self.top().attributes.insert(key, value);
    }

    pub(crate) fn push(&mut self) {
        self.frames.push(Scope::default());
    }

    /// Pops the innermost scope and returns its attributes. The root is never popped.
    pub(crate) fn pop(&mut self) -> Attributes {
        if self.frames.len() > 1 {
            self.frames
                .pop()
                .map(|frame| frame.attributes)
                .unwrap_or_default()
        } else {
            Attributes::default()
        }
    }

    pub(crate) fn push_record(&mut self, key: &str, record: Attributes) {
        self.top().attributes.push_record(key, record);
    }

    pub(crate) fn ensure_records(&mut self, key: &str) {
        self.top().attributes.ensure_records(key);
    }

    pub(crate) fn pending_tag(&mut self, name: &str, value: String) {
        self.top().tags.insert(name.to_string(), value);
    }

    pub(crate) fn pending_field(&mut self, name: &str, value: FieldValue) {
        self.top().fields.insert(name.to_string(), value);
    }

    /// Tags and fields emitted in all live scopes, outer first so inner ones win.
    pub(crate) fn pending(&self) -> (BTreeMap<String, String>, BTreeMap<String, FieldValue>) {
        let mut tags = BTreeMap::new();
        let mut fields = BTreeMap::new();
        for frame in &self.frames {
            tags.extend(frame.tags.iter().map(|(k, v)| (k.clone(), v.clone())));
            fields.extend(frame.fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        (tags, fields)
    }

    /// Tags and fields pending in the innermost scope only.
    pub(crate) fn top_pending(&self) -> (BTreeMap<String, String>, BTreeMap<String, FieldValue>) {
        self.frames
            .last()
            .map(|frame| (frame.tags.clone(), frame.fields.clone()))
            .unwrap_or_default()
    }

    pub(crate) fn restore_top_pending(
        &mut self,
        tags: BTreeMap<String, String>,
        fields: BTreeMap<String, FieldValue>,
    ) {
        let top = self.top();
        top.tags = tags;
        top.fields = fields;
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn into_root(mut self) -> Attributes {
        self.frames.truncate(1);
        self.frames
            .pop()
            .map(|frame| frame.attributes)
            .unwrap_or_default()
    }
}
