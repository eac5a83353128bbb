//! Variable-length tail codecs.
//!
//! A variable field reserves a 4-byte slot in its record's header. The slot
//! holds the offset, relative to the record start, of the field's tail data.
//! For nested records and `any` values an offset of 0 stands for "absent".

use crate::{
    bb::{deserialize_offset, rest_at, serialize_offset, slice_at},
    error::DecodeError,
    registry::Registry,
    table::{AnyTable, Table},
    tag::Tag,
};

const NULL_OFFSET: usize = 0;

/// Resolve a slot to the tail it points at. `None` when the slot is null.
fn tail<'a>(src: &'a [u8], slot: usize) -> Result<Option<&'a [u8]>, DecodeError> {
    let offset = deserialize_offset(src, slot)?;
    if offset == NULL_OFFSET {
        return Ok(None);
    }
    rest_at(src, offset).map(Some)
}

pub fn string_length(value: &str) -> usize {
    4 + value.len()
}

pub fn serialize_string(dest: &mut [u8], slot: usize, offset: usize, value: &str) -> usize {
    serialize_offset(dest, slot, offset);
    serialize_offset(dest, offset, value.len());
    dest[offset + 4..offset + 4 + value.len()].copy_from_slice(value.as_bytes());
    string_length(value)
}

pub fn deserialize_string(src: &[u8], slot: usize) -> Result<String, DecodeError> {
    let offset = deserialize_offset(src, slot)?;
    let len = deserialize_offset(src, offset)?;
    let bytes = slice_at(src, offset + 4, len)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8 { offset })
}

pub fn sub_length<T: Table>(value: Option<&T>) -> usize {
    value.map_or(0, T::serialize_length)
}

pub fn serialize_sub<T: Table>(dest: &mut [u8], slot: usize, offset: usize, value: Option<&T>) -> usize {
    match value {
        None => {
            serialize_offset(dest, slot, NULL_OFFSET);
            0
        }
        Some(value) => {
            serialize_offset(dest, slot, offset);
            value.serialize(&mut dest[offset..])
        }
    }
}

/// Decoded records must fit in the bytes they were read from. Tails that
/// point at shared data would otherwise inflate the result past the input.
fn fitted<T: Table>(value: T, available: usize, offset: usize) -> Result<T, DecodeError> {
    if value.serialize_length() > available {
        return Err(DecodeError::OverlappingData { offset });
    }
    Ok(value)
}

pub fn deserialize_sub<T: Table>(src: &[u8], slot: usize, registry: &Registry) -> Result<Option<T>, DecodeError> {
    let offset = deserialize_offset(src, slot)?;
    match tail(src, slot)? {
        None => Ok(None),
        Some(body) => fitted(T::deserialize(body, registry)?, body.len(), offset).map(Some),
    }
}

pub fn sub_array_length<T: Table>(values: &[T]) -> usize {
    4 + values.iter().map(|v| 4 + v.serialize_length()).sum::<usize>()
}

/// Array tail layout: element count, one start offset per element (relative to
/// the tail start), then the elements back to back.
pub fn serialize_sub_array<T: Table>(dest: &mut [u8], slot: usize, offset: usize, values: &[T]) -> usize {
    serialize_offset(dest, slot, offset);
    let array = &mut dest[offset..];
    serialize_offset(array, 0, values.len());
    let mut cursor = 4 + 4 * values.len();
    for (i, value) in values.iter().enumerate() {
        serialize_offset(array, 4 + 4 * i, cursor);
        cursor += value.serialize(&mut array[cursor..]);
    }
    cursor
}

pub fn deserialize_sub_array<T: Table>(src: &[u8], slot: usize, registry: &Registry) -> Result<Vec<T>, DecodeError> {
    let offset = deserialize_offset(src, slot)?;
    let array = rest_at(src, offset)?;
    let count = deserialize_offset(array, 0)?;
    // Each element needs at least its 4-byte offset entry.
    slice_at(array, 4, count.saturating_mul(4))?;
    let mut values = Vec::with_capacity(count);
    // Elements are laid out back to back; each starts at or after the end of the previous one.
    let mut end = 4 + 4 * count;
    for i in 0..count {
        let start = deserialize_offset(array, 4 + 4 * i)?;
        if start < end {
            return Err(DecodeError::OverlappingData { offset: offset + start });
        }
        let body = rest_at(array, start)?;
        let value = fitted(T::deserialize(body, registry)?, body.len(), offset + start)?;
        end = start + value.serialize_length();
        values.push(value);
    }
    Ok(values)
}

pub fn any_length(value: Option<&AnyTable>) -> usize {
    value.map_or(0, |v| 4 + v.serialize_length())
}

/// `any` tail layout: the value's tag followed by its record bytes.
pub fn serialize_any(dest: &mut [u8], slot: usize, offset: usize, value: Option<&AnyTable>) -> usize {
    match value {
        None => {
            serialize_offset(dest, slot, NULL_OFFSET);
            0
        }
        Some(value) => {
            serialize_offset(dest, slot, offset);
            dest[offset..offset + 4].copy_from_slice(value.tag().as_bytes());
            4 + value.serialize(&mut dest[offset + 4..])
        }
    }
}

pub fn deserialize_any(src: &[u8], slot: usize, registry: &Registry) -> Result<Option<AnyTable>, DecodeError> {
    let offset = deserialize_offset(src, slot)?;
    let Some(body) = tail(src, slot)? else {
        return Ok(None);
    };
    let mut tag = [0u8; 4];
    tag.copy_from_slice(slice_at(body, 0, 4)?);
    let record = &body[4..];
    let value = registry.deserialize(Tag::new(tag), record)?;
    if value.serialize_length() > record.len() {
        return Err(DecodeError::OverlappingData { offset: offset + 4 });
    }
    Ok(Some(value))
}
