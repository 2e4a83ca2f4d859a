//! Record codec trait and shared field helpers.

use std::io::Write;

use mirdb_common::{BinaryReader, BinaryWriter};

use crate::version::{VersionPolicy, Width};
use crate::{Error, Result};

/// A record with a versioned binary form.
///
/// `decode` reads the layout selected by `policy`; `encode` always writes the
/// latest layout. Field order is part of the format and must not change.
pub trait Record: Sized {
    /// Name used in errors and logs.
    const KIND: &'static str;

    fn decode(reader: &mut BinaryReader<'_>, policy: &VersionPolicy) -> Result<Self>;

    fn encode<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()>;

    /// Checks that run after a complete decode.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Encode into a fresh buffer.
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = BinaryWriter::in_memory();
        self.encode(&mut writer)?;
        Ok(writer.into_inner())
    }

    /// Decode one record from the start of `data`.
    fn from_bytes(data: &[u8], policy: &VersionPolicy) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        Self::decode(&mut reader, policy)
    }
}

/// Read an i32 element count, rejecting negatives, counts above `max`, and
/// counts larger than the bytes left in the stream.
pub(crate) fn read_count(reader: &mut BinaryReader<'_>, what: &'static str, max: usize) -> Result<usize> {
    let count = reader.read_i32()?;
    let malformed = || Error::MalformedCount {
        what,
        count: i64::from(count),
    };
    let count = usize::try_from(count).map_err(|_| malformed())?;
    if count > max || count > reader.remaining() {
        return Err(malformed());
    }
    Ok(count)
}

/// Read a count-prefixed list of elements.
pub(crate) fn read_list<'a, T, F>(
    reader: &mut BinaryReader<'a>,
    what: &'static str,
    max: usize,
    mut read_one: F,
) -> Result<Vec<T>>
where
    F: FnMut(&mut BinaryReader<'a>) -> Result<T>,
{
    let count = read_count(reader, what, max)?;
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(read_one(reader)?);
    }
    Ok(items)
}

/// Write an i32 element count.
pub(crate) fn write_count<W: Write>(writer: &mut BinaryWriter<W>, what: &'static str, len: usize) -> Result<()> {
    let count = i32::try_from(len).map_err(|_| Error::ValueOutOfRange {
        field: what,
        value: len as i64,
    })?;
    writer.write_i32(count)?;
    Ok(())
}

/// Write a count-prefixed list of elements.
pub(crate) fn write_list<W, T, F>(
    writer: &mut BinaryWriter<W>,
    what: &'static str,
    items: &[T],
    mut write_one: F,
) -> Result<()>
where
    W: Write,
    F: FnMut(&mut BinaryWriter<W>, &T) -> Result<()>,
{
    write_count(writer, what, items.len())?;
    for item in items {
        write_one(writer, item)?;
    }
    Ok(())
}

/// Read an unsigned integer whose width depends on the version.
pub(crate) fn read_uint(reader: &mut BinaryReader<'_>, width: Width) -> Result<u32> {
    Ok(match width {
        Width::U8 => u32::from(reader.read_u8()?),
        Width::U16 => u32::from(reader.read_u16()?),
        _ => reader.read_u32()?,
    })
}

/// Narrow a legacy wide value to u16, saturating with a warning.
pub(crate) fn saturate_u16(field: &'static str, value: u32) -> u16 {
    u16::try_from(value).unwrap_or_else(|_| {
        tracing::warn!(field, value, "legacy value exceeds u16, saturating");
        u16::MAX
    })
}
