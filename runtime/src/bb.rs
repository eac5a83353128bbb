//! Fixed-width integer access at absolute byte offsets.
//!
//! Every header field of a record lives at an offset computed when the schema
//! was compiled, so unlike a streaming reader these helpers never track a
//! cursor. All integers are little-endian.

use crate::error::DecodeError;

/// Borrow `len` bytes of `src` starting at `offset`, or report how far the
/// read ran past the end of the buffer.
pub fn slice_at(src: &[u8], offset: usize, len: usize) -> Result<&[u8], DecodeError> {
    match offset.checked_add(len) {
        Some(end) if end <= src.len() => Ok(&src[offset..end]),
        _ => Err(DecodeError::OutOfBounds {
            offset,
            len,
            available: src.len(),
        }),
    }
}

/// Borrow everything from `offset` to the end of `src`.
pub fn rest_at(src: &[u8], offset: usize) -> Result<&[u8], DecodeError> {
    slice_at(src, offset, 0)?;
    Ok(&src[offset..])
}

macro_rules! fixed_codec {
    ($($ty:ty => $write:ident, $read:ident;)*) => {
        $(
            /// Write the value at `offset`. Panics if `dest` is too short; callers
            /// size `dest` from `serialize_length` first.
            pub fn $write(dest: &mut [u8], offset: usize, value: $ty) {
                let bytes = value.to_le_bytes();
                dest[offset..offset + bytes.len()].copy_from_slice(&bytes);
            }

            /// Read the value stored at `offset`.
            pub fn $read(src: &[u8], offset: usize) -> Result<$ty, DecodeError> {
                const WIDTH: usize = std::mem::size_of::<$ty>();
                let mut bytes = [0u8; WIDTH];
                bytes.copy_from_slice(slice_at(src, offset, WIDTH)?);
                Ok(<$ty>::from_le_bytes(bytes))
            }
        )*
    };
}

fixed_codec! {
    u8  => serialize_u8,  deserialize_u8;
    i16 => serialize_i16, deserialize_i16;
    u16 => serialize_u16, deserialize_u16;
    i32 => serialize_i32, deserialize_i32;
    u32 => serialize_u32, deserialize_u32;
}

/// Write a `usize` offset or length into a 4-byte slot.
pub(crate) fn serialize_offset(dest: &mut [u8], offset: usize, value: usize) {
    serialize_u32(dest, offset, value as u32);
}

pub(crate) fn deserialize_offset(src: &[u8], offset: usize) -> Result<usize, DecodeError> {
    deserialize_u32(src, offset).map(|v| v as usize)
}

#[test]
fn read_u8() {
    assert_eq!(deserialize_u8(&[7, 9], 1), Ok(9));
    assert_eq!(
        deserialize_u8(&[], 0),
        Err(DecodeError::OutOfBounds { offset: 0, len: 1, available: 0 })
    );
}

#[test]
fn read_i16() {
    assert_eq!(deserialize_i16(&[0xff, 0xff], 0), Ok(-1));
    assert_eq!(deserialize_i16(&[0, 0x34, 0x12], 1), Ok(0x1234));
    assert!(deserialize_i16(&[0x34], 0).is_err());
}

#[test]
fn read_u32() {
    assert_eq!(deserialize_u32(&[1, 0, 0, 0], 0), Ok(1));
    assert_eq!(deserialize_u32(&[0xff, 0xff, 0xff, 0xff], 0), Ok(u32::MAX));
    assert_eq!(
        deserialize_u32(&[0, 0, 0, 0], 2),
        Err(DecodeError::OutOfBounds { offset: 2, len: 4, available: 4 })
    );
}

#[test]
fn write_at_offsets() {
    let mut buf = [0u8; 11];
    serialize_u8(&mut buf, 0, 0xab);
    serialize_i16(&mut buf, 1, -2);
    serialize_u16(&mut buf, 3, 0x0102);
    serialize_i32(&mut buf, 5, -1);
    serialize_offset(&mut buf, 7, 0x0403);
    assert_eq!(buf, [0xab, 0xfe, 0xff, 0x02, 0x01, 0xff, 0xff, 0x03, 0x04, 0, 0]);
}

#[test]
fn slice_overflow_is_an_error() {
    assert!(slice_at(&[0; 4], usize::MAX, 2).is_err());
}

#[test]
fn read_every_width_at_an_offset() {
    let buf = [0xee, 0x78, 0x56, 0x34, 0x12];
    assert_eq!(deserialize_u8(&buf, 1), Ok(0x78));
    assert_eq!(deserialize_u16(&buf, 1), Ok(0x5678));
    assert_eq!(deserialize_i16(&buf, 3), Ok(0x1234));
    assert_eq!(deserialize_i32(&buf, 1), Ok(0x12345678));
    assert_eq!(deserialize_u32(&buf, 1), Ok(0x12345678));
    assert_eq!(
        deserialize_u32(&buf, 2),
        Err(DecodeError::OutOfBounds { offset: 2, len: 4, available: 5 })
    );
}
