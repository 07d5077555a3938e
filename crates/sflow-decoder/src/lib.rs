//! Declarative binary decoding.
//!
//! A grammar is a tree of [`Directive`]s built from the constructors in this
//! crate and wrapped in a [`Plan`]. Decoding a buffer walks the tree:
//!
//! - leaves read big-endian primitives and record them under keys
//! - counts, lengths and branch selectors are looked up from earlier records
//! - operation chains ([`Ops`]) transform values and emit metric tags and fields
//!
//! ```
//! use sflow_decoder::{iter, ops, seq, u32, Plan};
//!
//! let mut plan = Plan::new(seq![
//!     u32("n"),
//!     iter("items", "n", 100, u32("v").with(ops().field("v"))),
//! ]);
//! let decoded = plan.decode(&[0, 0, 0, 1, 0, 0, 0, 7]).unwrap();
//! assert_eq!(decoded.attributes.records("items").unwrap().len(), 1);
//! ```

mod build;
mod context;
mod directive;
mod error;
mod ops;
mod plan;
mod reader;
mod scope;
mod value;

pub use build::{
    alt, apply, asgn, asrt_max, bin, case, close_metric, default_case, fail, i32, iter, nest,
    open_metric, read_bin, read_i32, read_u16, read_u32, read_u64, seq, sub, sub_bounded, u16,
    u32, u64, warn_and_break, warn_and_break_on,
};
pub use context::{DecodeContext, Decoded};
pub use directive::{Case, Directive, Leaf, Primitive};
pub use error::{DecodeError, Result};
pub use ops::{ops, Ops, Table};
pub use plan::Plan;
pub use reader::Reader;
pub use scope::{Attribute, Attributes};
pub use value::{Value, ValueKind};
