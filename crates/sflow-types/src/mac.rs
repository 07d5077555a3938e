//! MAC address type with wire and text conversions.

use crate::ParseError;
use std::fmt;
use std::str::FromStr;

/// A 48-bit Ethernet MAC address.
///
/// # Examples
///
/// ```
/// use sflow_types::MacAddress;
///
/// let mac = MacAddress::from_slice(&[0x00, 0x0c, 0x29, 0x36, 0xd3, 0xd6]).unwrap();
/// assert_eq!(mac.to_string(), "00:0c:29:36:d3:d6");
///
/// let parsed: MacAddress = "00-0c-29-36-d3-d6".parse().unwrap();
/// assert_eq!(mac, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Builds a MAC address from a 6-byte wire slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseError> {
        let octets: [u8; 6] = bytes.try_into().map_err(|_| ParseError::InvalidWidth {
            expected: "6",
            actual: bytes.len(),
        })?;
        Ok(MacAddress(octets))
    }

    /// Returns the address as the low 48 bits of a `u64`.
    pub fn to_u64(&self) -> u64 {
        self.0.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let separator = if s.contains(':') { ':' } else { '-' };

        let parts: Vec<&str> = s.split(separator).collect();
        if parts.len() != 6 {
            return Err(ParseError::InvalidMacAddress(s.to_string()));
        }

        let mut bytes = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            bytes[i] = u8::from_str_radix(part, 16)
                .map_err(|_| ParseError::InvalidMacAddress(s.to_string()))?;
        }

        Ok(MacAddress(bytes))
    }
}
