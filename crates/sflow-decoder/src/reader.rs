//! Big-endian cursor over the input buffer.

use crate::error::{DecodeError, Result};
use byteorder::{BigEndian, ByteOrder};

/// Forward-only reader. Length-bounded regions are decoded from a child
/// reader over a sub-slice, so a region's body can never see past its end.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Consumes exactly `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if n > available {
            return Err(DecodeError::ShortRead {
                needed: n,
                available,
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(BigEndian::read_u64(self.take(8)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.take(4)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_big_endian_reads() {
        let buf = [
            0x00, 0x0a, 0x00, 0x00, 0x01, 0x0b, 0xff, 0xff, 0xff, 0xfe, 0x00, 0x00, 0x00, 0x03,
            0x5c, 0xfc, 0x18, 0xb2,
        ];
        let mut r = Reader::new(&buf);
        assert_eq!(r.read_u16().unwrap(), 10);
        assert_eq!(r.read_u32().unwrap(), 267);
        assert_eq!(r.read_i32().unwrap(), -2);
        assert_eq!(r.read_u64().unwrap(), 14444927154);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_short_read_does_not_advance() {
        let buf = [0x00, 0x01, 0x02];
        let mut r = Reader::new(&buf);
        let err = r.read_u32().unwrap_err();
        assert_eq!(
            err,
            DecodeError::ShortRead {
                needed: 4,
                available: 3
            }
        );
        assert_eq!(r.position(), 0);
        assert_eq!(r.take(3).unwrap(), &[0x00, 0x01, 0x02]);
    }
}
