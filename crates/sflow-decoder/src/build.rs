//! Grammar constructors.
//!
//! Leaves come in two flavours: `u32("key")` reads and records under a key,
//! `read_u32()` only reads (the value still flows through any attached
//! operation chain).

use crate::directive::{Case, Directive, Leaf, Primitive};
use crate::ops::Ops;
use crate::value::{Value, ValueKind};
use std::panic::Location;

pub fn u16(key: &str) -> Leaf {
    Leaf::new(Primitive::U16, Some(key))
}

pub fn u32(key: &str) -> Leaf {
    Leaf::new(Primitive::U32, Some(key))
}

pub fn u64(key: &str) -> Leaf {
    Leaf::new(Primitive::U64, Some(key))
}

pub fn i32(key: &str) -> Leaf {
    Leaf::new(Primitive::I32, Some(key))
}

/// Reads `len` raw bytes.
pub fn bin(key: &str, len: usize) -> Leaf {
    Leaf::new(Primitive::Bytes(len), Some(key))
}

pub fn read_u16() -> Leaf {
    Leaf::new(Primitive::U16, None)
}

pub fn read_u32() -> Leaf {
    Leaf::new(Primitive::U32, None)
}

pub fn read_u64() -> Leaf {
    Leaf::new(Primitive::U64, None)
}

pub fn read_i32() -> Leaf {
    Leaf::new(Primitive::I32, None)
}

pub fn read_bin(len: usize) -> Leaf {
    Leaf::new(Primitive::Bytes(len), None)
}

pub fn seq(children: Vec<Directive>) -> Directive {
    Directive::Seq(children)
}

/// Builds a [`Directive::Seq`] from anything convertible into a directive.
///
/// ```
/// use sflow_decoder::{seq, u16, u32};
///
/// let header = seq![u32("version"), u16("flags")];
/// ```
#[macro_export]
macro_rules! seq {
    ($($child:expr),* $(,)?) => {
        $crate::seq(vec![$($crate::Directive::from($child)),*])
    };
}

pub fn case(value: impl Into<Value>, body: impl Into<Directive>) -> Case {
    Case {
        value: Some(value.into()),
        body: body.into(),
    }
}

pub fn default_case(body: impl Into<Directive>) -> Case {
    Case {
        value: None,
        body: body.into(),
    }
}

/// Branches on the value recorded under `key`.
///
/// # Panics
///
/// Panics if more than one default case is given.
#[track_caller]
pub fn alt(key: &str, cases: Vec<Case>) -> Directive {
    let location = Location::caller();
    let mut matched = Vec::with_capacity(cases.len());
    let mut default = None;
    for Case { value, body } in cases {
        match value {
            Some(v) => matched.push((v, body)),
            None if default.is_none() => default = Some(Box::new(body)),
            None => panic!("alt on '{}' at {} has more than one default case", key, location),
        }
    }
    Directive::Alt {
        key: key.to_string(),
        cases: matched,
        default,
        location,
    }
}

/// Repeats `body` as many times as the integer under `count_key`,
/// failing if that exceeds `max`.
pub fn iter(key: &str, count_key: &str, max: u32, body: impl Into<Directive>) -> Directive {
    Directive::Iter {
        key: key.to_string(),
        count_key: count_key.to_string(),
        max,
        body: Box::new(body.into()),
    }
}

/// Decodes `body` over the next `length_key` bytes.
pub fn sub(length_key: &str, body: impl Into<Directive>) -> Directive {
    sub_bounded(length_key, u32::MAX, body)
}

/// Like [`sub`], failing if the length exceeds `max`.
pub fn sub_bounded(length_key: &str, max: u32, body: impl Into<Directive>) -> Directive {
    Directive::Sub {
        length_key: length_key.to_string(),
        max,
        body: Box::new(body.into()),
    }
}

pub fn nest(key: &str, body: impl Into<Directive>) -> Directive {
    Directive::Nest {
        key: key.to_string(),
        body: Box::new(body.into()),
    }
}

/// Copies the value recorded under `from` to `to`.
pub fn asgn(from: &str, to: &str) -> Directive {
    Directive::Assign {
        from: from.to_string(),
        to: to.to_string(),
    }
}

/// Asserts the integer under `key` is at most `max`.
/// With `unwrap` set a violation raises the skip signal instead of failing.
#[track_caller]
pub fn asrt_max(key: &str, max: u64, unwrap: bool) -> Directive {
    Directive::AssertMax {
        key: key.to_string(),
        max,
        unwrap,
        location: Location::caller(),
    }
}

/// Runs `ops` over the value already recorded under `key`.
///
/// # Panics
///
/// Panics if the chain cannot take a value of `kind`. Byte chains are
/// checked against an empty sample, so width-sensitive steps belong on the leaf.
#[track_caller]
pub fn apply(key: &str, kind: ValueKind, ops: Ops) -> Directive {
    ops.validate(Value::representative(kind, 0), key);
    Directive::Apply {
        key: key.to_string(),
        ops,
    }
}

/// Logs `reason` and stops decoding up to the end of the enclosing bounded region.
pub fn warn_and_break(reason: &str) -> Directive {
    Directive::WarnAndBreak {
        reason: reason.to_string(),
        key: None,
    }
}

/// Like [`warn_and_break`], appending the value recorded under `key` to the message.
pub fn warn_and_break_on(reason: &str, key: &str) -> Directive {
    Directive::WarnAndBreak {
        reason: reason.to_string(),
        key: Some(key.to_string()),
    }
}

pub fn open_metric(name: &str) -> Directive {
    Directive::OpenMetric(name.to_string())
}

pub fn close_metric() -> Directive {
    Directive::CloseMetric
}

pub fn fail(msg: &str) -> Directive {
    Directive::Fail(msg.to_string())
}
