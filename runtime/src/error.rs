use thiserror::Error;

use crate::Tag;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Read of {len} bytes at offset {offset} is out of bounds (buffer holds {available})")]
    OutOfBounds {
        offset:    usize,
        len:       usize,
        available: usize,
    },

    #[error("String at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },

    #[error("Data at offset {offset} overlaps data that was already decoded")]
    OverlappingData { offset: usize },

    #[error("No deserializer registered for tag {0}")]
    UnknownTag(Tag),

    #[error("Value {value} is not a member of enum {name}")]
    InvalidEnumValue {
        name:  &'static str,
        value: i64,
    },
}
