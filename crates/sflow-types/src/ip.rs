//! IP address type built from sFlow wire octets.

use crate::ParseError;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// An IP address that can be either IPv4 or IPv6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpAddress {
    V4(Ipv4Addr),
    V6(Ipv6Addr),
}

impl IpAddress {
    /// Builds an address from a 4-byte (IPv4) or 16-byte (IPv6) slice.
    ///
    /// # Examples
    ///
    /// ```
    /// use sflow_types::IpAddress;
    ///
    /// let addr = IpAddress::from_octets(&[192, 168, 1, 2]).unwrap();
    /// assert_eq!(addr.to_string(), "192.168.1.2");
    /// ```
    pub fn from_octets(bytes: &[u8]) -> Result<Self, ParseError> {
        match bytes.len() {
            4 => {
                let mut octets = [0u8; 4];
                octets.copy_from_slice(bytes);
                Ok(IpAddress::V4(Ipv4Addr::from(octets)))
            }
            16 => {
                let mut octets = [0u8; 16];
                octets.copy_from_slice(bytes);
                Ok(IpAddress::V6(Ipv6Addr::from(octets)))
            }
            actual => Err(ParseError::InvalidWidth {
                expected: "4 or 16",
                actual,
            }),
        }
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpAddress::V4(addr) => fmt::Display::fmt(addr, f),
            IpAddress::V6(addr) => fmt::Display::fmt(addr, f),
        }
    }
}
