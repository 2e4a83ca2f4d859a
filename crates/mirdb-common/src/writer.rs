//! Binary writer producing the database wire format.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::string::encode_string;
use crate::{Point, Result};

/// Little-endian writer over any [`Write`] sink.
///
/// Every method surfaces I/O and encoding failures so a caller can abort the
/// whole write on the first error.
#[derive(Debug)]
pub struct BinaryWriter<W> {
    inner: W,
    written: usize,
}

impl BinaryWriter<Vec<u8>> {
    /// Create a writer that collects output in memory.
    pub fn in_memory() -> Self {
        Self::new(Vec::new())
    }

    /// Borrow the bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.inner
    }
}

impl<W: Write> BinaryWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Number of bytes written through this writer.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        self.written += bytes.len();
        Ok(())
    }

    pub fn write_u8(&mut self, v: u8) -> Result<()> {
        self.inner.write_u8(v)?;
        self.written += 1;
        Ok(())
    }

    pub fn write_bool(&mut self, v: bool) -> Result<()> {
        self.write_u8(u8::from(v))
    }

    pub fn write_u16(&mut self, v: u16) -> Result<()> {
        self.inner.write_u16::<LittleEndian>(v)?;
        self.written += 2;
        Ok(())
    }

    pub fn write_i16(&mut self, v: i16) -> Result<()> {
        self.inner.write_i16::<LittleEndian>(v)?;
        self.written += 2;
        Ok(())
    }

    pub fn write_u32(&mut self, v: u32) -> Result<()> {
        self.inner.write_u32::<LittleEndian>(v)?;
        self.written += 4;
        Ok(())
    }

    pub fn write_i32(&mut self, v: i32) -> Result<()> {
        self.inner.write_i32::<LittleEndian>(v)?;
        self.written += 4;
        Ok(())
    }

    pub fn write_u64(&mut self, v: u64) -> Result<()> {
        self.inner.write_u64::<LittleEndian>(v)?;
        self.written += 8;
        Ok(())
    }

    pub fn write_i64(&mut self, v: i64) -> Result<()> {
        self.inner.write_i64::<LittleEndian>(v)?;
        self.written += 8;
        Ok(())
    }

    pub fn write_f32(&mut self, v: f32) -> Result<()> {
        self.inner.write_f32::<LittleEndian>(v)?;
        self.written += 4;
        Ok(())
    }

    /// Write a length-prefixed Latin-1 string. An empty string is one zero byte.
    pub fn write_string(&mut self, s: &str) -> Result<()> {
        let encoded = encode_string(s)?;
        self.write_bytes(&encoded)
    }

    pub fn write_point(&mut self, point: Point) -> Result<()> {
        self.write_i32(point.x)?;
        self.write_i32(point.y)
    }
}
