//! Compact-array framing
//!
//! A compact array is a compact-u16 item count followed by the concatenated
//! bytes of every item. Items are serialized by their producer; the framing
//! itself never looks inside them. Decoding fixed-size items only needs the
//! item type, variable-size items need a decoder supplied by the caller.

use crate::error::Result;
use crate::serialization::{
    compact_u16_size, decode_compact_u16, encode_length, take, ByteDeserialize, ByteSerialize,
};
use bytemuck::Pod;
use std::io::Cursor;

/// An item count together with the already-concatenated item bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompactArray {
    length: usize,
    data: Vec<u8>,
}

impl CompactArray {
    /// Wrap bytes that already hold `length` serialized items
    pub fn new(length: usize, data: Vec<u8>) -> Self {
        Self { length, data }
    }

    /// Concatenate pre-serialized items
    pub fn from_items<I: AsRef<[u8]>>(items: &[I]) -> Self {
        let data = items.iter().flat_map(|item| item.as_ref().iter().copied()).collect();
        Self {
            length: items.len(),
            data,
        }
    }

    /// Concatenate fixed-size plain-old-data items
    pub fn from_pod<T: Pod>(items: &[T]) -> Self {
        Self {
            length: items.len(),
            data: bytemuck::cast_slice(items).to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn serialize_into(&self, writer: &mut Vec<u8>) -> Result<()> {
        encode_length(self.length, writer)?;
        writer.extend_from_slice(&self.data);
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.byte_size());
        self.serialize_into(&mut bytes)?;
        Ok(bytes)
    }

    pub fn byte_size(&self) -> usize {
        compact_u16_size(self.length) + self.data.len()
    }
}

/// Frame pre-serialized items
pub fn encode<I: AsRef<[u8]>>(items: &[I], writer: &mut Vec<u8>) -> Result<()> {
    encode_length(items.len(), writer)?;
    for item in items {
        writer.extend_from_slice(item.as_ref());
    }
    Ok(())
}

/// Frame fixed-size items (public keys, signatures, account indices)
pub fn encode_pod<T: Pod>(items: &[T], writer: &mut Vec<u8>) -> Result<()> {
    encode_length(items.len(), writer)?;
    writer.extend_from_slice(bytemuck::cast_slice(items));
    Ok(())
}

/// Frame items that know how to serialize themselves
pub fn encode_serializable<T: ByteSerialize>(items: &[T], writer: &mut Vec<u8>) -> Result<()> {
    encode_length(items.len(), writer)?;
    for item in items {
        item.serialize_bytes(writer)?;
    }
    Ok(())
}

/// Total byte size of a framed sequence
pub fn byte_size<T: ByteSerialize>(items: &[T]) -> usize {
    compact_u16_size(items.len()) + items.iter().map(|item| item.byte_size()).sum::<usize>()
}

/// Decode a compact array of fixed-size items
pub fn decode_pod<T: Pod>(cursor: &mut Cursor<&[u8]>) -> Result<Vec<T>> {
    let length = decode_compact_u16(cursor)? as usize;
    let item_size = std::mem::size_of::<T>();
    let bytes = take(cursor, length * item_size)?;

    Ok(bytes
        .chunks_exact(item_size)
        .map(bytemuck::pod_read_unaligned)
        .collect())
}

/// Decode a compact array whose items are read by `decode_item`
pub fn decode_with<T, F>(cursor: &mut Cursor<&[u8]>, mut decode_item: F) -> Result<Vec<T>>
where
    F: FnMut(&mut Cursor<&[u8]>) -> Result<T>,
{
    let length = decode_compact_u16(cursor)? as usize;
    // Each item takes at least one byte
    let mut items = Vec::with_capacity(length.min(crate::serialization::remaining(cursor)));
    for _ in 0..length {
        items.push(decode_item(cursor)?);
    }
    Ok(items)
}

/// Decode a compact array of self-describing items
pub fn decode_deserializable<T: ByteDeserialize>(cursor: &mut Cursor<&[u8]>) -> Result<Vec<T>> {
    decode_with(cursor, T::deserialize_bytes)
}
