//! Low-level byte serialization utilities for the transaction wire format
//!
//! This module provides the compact-u16 variable-length integer codec and the
//! cursor primitives the rest of the wire format is built on.

use crate::error::{Result, SolkitError};
use std::io::Cursor;

/// A compact-u16 never takes more than three bytes.
pub const MAX_ENCODING_LENGTH: usize = 3;

/// Trait for types that can be serialized at the byte level
pub trait ByteSerialize {
    fn serialize_bytes(&self, writer: &mut Vec<u8>) -> Result<()>;
    fn byte_size(&self) -> usize;
}

/// Trait for types that can be deserialized from bytes
pub trait ByteDeserialize: Sized {
    fn deserialize_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Self>;
}

/// Compact-u16 encoding: 7 data bits per byte, high bit set on every byte
/// except the last.
pub fn encode_compact_u16(value: u16, writer: &mut Vec<u8>) {
    let mut rem = value;
    while rem > 0x7f {
        writer.push(((rem & 0x7f) | 0x80) as u8);
        rem >>= 7;
    }
    writer.push((rem & 0x7f) as u8);
}

/// Encode a collection length, failing if it does not fit in 16 bits
pub fn encode_length(len: usize, writer: &mut Vec<u8>) -> Result<()> {
    let value = u16::try_from(len).map_err(|_| SolkitError::LengthOverflow(len))?;
    encode_compact_u16(value, writer);
    Ok(())
}

/// Number of bytes the compact-u16 form of `value` occupies
pub fn compact_u16_size(value: usize) -> usize {
    if value <= 0x7f {
        1
    } else if value <= 0x3fff {
        2
    } else {
        3
    }
}

/// Decode compact-u16
///
/// Only the canonical (shortest) encoding is accepted: a zero byte after the
/// first one, a third byte with its continuation bit set, or a value above
/// `u16::MAX` all fail with `MalformedVarint`.
pub fn decode_compact_u16(cursor: &mut Cursor<&[u8]>) -> Result<u16> {
    let mut value: u32 = 0;

    for nth in 0..MAX_ENCODING_LENGTH {
        let byte = decode_u8(cursor)?;

        if byte == 0 && nth > 0 {
            return Err(SolkitError::MalformedVarint(
                "non-canonical encoding".to_string(),
            ));
        }

        value |= ((byte & 0x7f) as u32) << (nth * 7);

        if byte & 0x80 == 0 {
            return u16::try_from(value).map_err(|_| {
                SolkitError::MalformedVarint(format!("value {} overflows u16", value))
            });
        }
    }

    Err(SolkitError::MalformedVarint(format!(
        "encoding exceeds {} bytes",
        MAX_ENCODING_LENGTH
    )))
}

/// Manual encoding of length-prefixed byte arrays
pub fn encode_length_prefixed(data: &[u8], writer: &mut Vec<u8>) -> Result<()> {
    encode_length(data.len(), writer)?;
    writer.extend_from_slice(data);
    Ok(())
}

/// Decode length-prefixed byte arrays
pub fn decode_length_prefixed(cursor: &mut Cursor<&[u8]>) -> Result<Vec<u8>> {
    let length = decode_compact_u16(cursor)? as usize;
    Ok(take(cursor, length)?.to_vec())
}

/// Borrow the next `length` bytes and advance the cursor past them
pub fn take<'a>(cursor: &mut Cursor<&'a [u8]>, length: usize) -> Result<&'a [u8]> {
    let position = cursor.position() as usize;
    let data: &'a [u8] = *cursor.get_ref();

    if position + length > data.len() {
        return Err(SolkitError::BufferTooSmall {
            needed: position + length,
            available: data.len(),
        });
    }

    cursor.set_position((position + length) as u64);
    Ok(&data[position..position + length])
}

/// Decode a fixed-size byte array (public keys, hashes, signatures)
pub fn decode_array<const N: usize>(cursor: &mut Cursor<&[u8]>) -> Result<[u8; N]> {
    let mut out = [0u8; N];
    out.copy_from_slice(take(cursor, N)?);
    Ok(out)
}

/// Encode a u8
pub fn encode_u8(value: u8, writer: &mut Vec<u8>) {
    writer.push(value);
}

/// Decode a u8
pub fn decode_u8(cursor: &mut Cursor<&[u8]>) -> Result<u8> {
    Ok(take(cursor, 1)?[0])
}

/// Bytes left after the cursor position
pub fn remaining(cursor: &Cursor<&[u8]>) -> usize {
    cursor.get_ref().len().saturating_sub(cursor.position() as usize)
}
