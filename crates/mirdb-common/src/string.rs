//! Length-prefixed Latin-1 string codec.
//!
//! Strings are stored as a 7-bit variable-length byte count followed by the
//! raw bytes. Every byte is one Latin-1 code point, so bytes `>= 0x80` map to
//! `U+0080..=U+00FF` rather than starting a UTF-8 sequence.

use crate::{Error, Result};

/// Maximum number of bytes a 32-bit variable-length integer may occupy.
pub const MAX_VAR_LENGTH_BYTES: usize = 5;

/// Append the variable-length encoding of `value` to `out`.
///
/// Seven bits are emitted per byte, least significant group first. The high
/// bit of a byte is set when more bytes follow.
pub fn encode_var_length(mut value: u32, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Number of bytes `encode_var_length` emits for `value`.
pub fn var_length_size(value: u32) -> usize {
    let bits = 32 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Decode a Latin-1 byte sequence. Never fails.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Encode a string as Latin-1 bytes.
///
/// Fails with [`Error::NotLatin1`] on the first character above `U+00FF`.
pub fn encode_latin1(value: &str) -> Result<Vec<u8>> {
    value
        .chars()
        .map(|c| u8::try_from(u32::from(c)).map_err(|_| Error::NotLatin1(c)))
        .collect()
}

/// Full wire form of a string: length prefix followed by Latin-1 payload.
pub fn encode_string(value: &str) -> Result<Vec<u8>> {
    let payload = encode_latin1(value)?;
    let mut out = Vec::with_capacity(payload.len() + MAX_VAR_LENGTH_BYTES);
    let len = u32::try_from(payload.len()).map_err(|_| Error::VarLengthOverflow)?;
    encode_var_length(len, &mut out);
    out.extend_from_slice(&payload);
    Ok(out)
}
