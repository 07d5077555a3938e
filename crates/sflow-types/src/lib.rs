//! Common value types shared by the sFlow decoder, grammar and collector.
//!
//! - [`MacAddress`]: 48-bit Ethernet MAC addresses
//! - [`IpAddress`]: IPv4 and IPv6 addresses as carried on the wire
//! - [`Metric`]: a named set of tags and fields with a timestamp
//! - [`FieldValue`]: the scalar kinds a metric field may hold

mod ip;
mod mac;
mod metric;

pub use ip::IpAddress;
pub use mac::MacAddress;
pub use metric::{FieldValue, Metric};

/// Common error type for address parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid address width: expected {expected} bytes, got {actual}")]
    InvalidWidth { expected: &'static str, actual: usize },
}
