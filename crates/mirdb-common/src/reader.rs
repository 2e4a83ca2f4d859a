//! Binary reader over database byte slices.
//!
//! This module provides [`BinaryReader`], a cursor that reads little-endian
//! primitives, variable-length integers and Latin-1 strings from a byte slice
//! without copying.

use crate::string::{decode_latin1, MAX_VAR_LENGTH_BYTES};
use crate::{Error, Point, Result};

/// A forward-only cursor over a byte slice.
///
/// Failed reads never advance the position, so the caller can report exactly
/// where a record stopped making sense.
///
/// # Example
///
/// ```
/// use mirdb_common::{BinaryReader, Point};
///
/// // Record index, then a length-prefixed name, then a map location.
/// let mut data = vec![0x11, 0x00, 0x00, 0x00, 0x04, b'B', b'i', 0xE9, b'n'];
/// data.extend_from_slice(&[0x52, 0, 0, 0, 0x2C, 0, 0, 0]);
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_i32().unwrap(), 17);
/// assert_eq!(reader.read_string().unwrap(), "Bi\u{e9}n");
/// assert_eq!(reader.read_point().unwrap(), Point::new(82, 44));
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

macro_rules! read_le {
    ($($(#[$meta:meta])* $name:ident -> $ty:ty;)+) => {
        $(
            $(#[$meta])*
            #[inline]
            pub fn $name(&mut self) -> Result<$ty> {
                self.fixed().map(<$ty>::from_le_bytes)
            }
        )+
    };
}

impl<'a> BinaryReader<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Offset of the next unread byte.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Bytes left between the cursor and the end of the slice.
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Consume exactly `count` bytes, or nothing at all.
    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if available < count {
            return Err(Error::StreamTruncated {
                needed: count,
                available,
            });
        }
        let bytes = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    fn fixed<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.take(1).map(|b| b[0])
    }

    /// Any non-zero byte reads as `true`.
    pub fn read_bool(&mut self) -> Result<bool> {
        self.read_u8().map(|b| b != 0)
    }

    read_le! {
        read_u16 -> u16;
        read_i16 -> i16;
        read_u32 -> u32;
        read_i32 -> i32;
        read_u64 -> u64;
        read_i64 -> i64;
        read_f32 -> f32;
    }

    /// Read a little-endian u64, yielding 0 on a short read.
    ///
    /// When fewer than eight bytes remain they are consumed and the value is
    /// treated as zero. Only fields that historically relied on this may use it.
    pub fn read_u64_lenient(&mut self) -> u64 {
        match self.read_u64() {
            Ok(value) => value,
            Err(_) => {
                self.position = self.data.len();
                0
            }
        }
    }

    /// Read a 7-bit variable-length unsigned integer.
    pub fn read_var_length(&mut self) -> Result<u32> {
        let start = self.position;
        let mut value: u32 = 0;

        for index in 0..MAX_VAR_LENGTH_BYTES {
            let byte = match self.read_u8() {
                Ok(byte) => byte,
                Err(e) => {
                    self.position = start;
                    return Err(e);
                }
            };
            let shift = 7 * index as u32;
            // The fifth byte may only carry the top four bits.
            if index == MAX_VAR_LENGTH_BYTES - 1 && byte > 0x0F {
                self.position = start;
                return Err(Error::VarLengthOverflow);
            }
            value |= u32::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }

        self.position = start;
        Err(Error::VarLengthOverflow)
    }

    /// Read a length-prefixed Latin-1 string.
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.position;
        let length = self.read_var_length()? as usize;
        if length == 0 {
            return Ok(String::new());
        }
        match self.take(length) {
            Ok(bytes) => Ok(decode_latin1(bytes)),
            Err(e) => {
                self.position = start;
                Err(e)
            }
        }
    }

    /// Read a point stored as two little-endian i32 values.
    pub fn read_point(&mut self) -> Result<Point> {
        let bytes: [u8; 8] = self.fixed()?;
        let (x, y) = bytes.split_at(4);
        Ok(Point::new(
            i32::from_le_bytes([x[0], x[1], x[2], x[3]]),
            i32::from_le_bytes([y[0], y[1], y[2], y[3]]),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_primitives() {
        let mut data = Vec::new();
        data.extend_from_slice(&(-3i32).to_le_bytes()); // monster index
        data.extend_from_slice(&1800u16.to_le_bytes()); // spell delay
        data.push(2); // any non-zero bool
        data.extend_from_slice(&1.5f32.to_le_bytes());
        data.extend_from_slice(&1_200_000i64.to_le_bytes());
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_i32().unwrap(), -3);
        assert_eq!(reader.read_u16().unwrap(), 1800);
        assert!(reader.read_bool().unwrap());
        assert_eq!(reader.read_f32().unwrap(), 1.5);
        assert_eq!(reader.remaining(), 8);
        assert_eq!(reader.read_i64().unwrap(), 1_200_000);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_eof_does_not_advance() {
        let data = [0x01, 0x02];
        let mut reader = BinaryReader::new(&data);

        let err = reader.read_u32().unwrap_err();
        assert!(matches!(err, Error::StreamTruncated { needed: 4, available: 2 }));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_lenient_u64_short_read() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u64_lenient(), 0);
        assert!(reader.is_empty());

        let full = 42u64.to_le_bytes();
        let mut reader = BinaryReader::new(&full);
        assert_eq!(reader.read_u64_lenient(), 42);
    }

    #[test]
    fn test_read_string_latin1() {
        let data = [0x03, b'a', 0xE9, 0xFF];
        let mut reader = BinaryReader::new(&data);
        assert_eq!(reader.read_string().unwrap(), "a\u{e9}\u{ff}");
    }

    #[test]
    fn test_truncated_string_payload() {
        let data = [0x05, b'a', b'b'];
        let mut reader = BinaryReader::new(&data);
        assert!(matches!(
            reader.read_string(),
            Err(Error::StreamTruncated { needed: 5, available: 2 })
        ));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_truncated_var_length() {
        let data = [0x80, 0x80];
        let mut reader = BinaryReader::new(&data);
        assert!(reader.read_var_length().is_err());
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_var_length_overflow() {
        let data = [0xFF, 0xFF, 0xFF, 0xFF, 0x7F];
        let mut reader = BinaryReader::new(&data);
        assert!(matches!(reader.read_var_length(), Err(Error::VarLengthOverflow)));
    }

    #[test]
    fn test_read_point() {
        let mut data = Vec::new();
        data.extend_from_slice(&82i32.to_le_bytes());
        data.extend_from_slice(&(-4i32).to_le_bytes());
        let mut reader = BinaryReader::new(&data);
        assert_eq!(reader.read_point().unwrap(), Point::new(82, -4));
    }
}
