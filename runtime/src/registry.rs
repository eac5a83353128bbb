use std::collections::HashMap;

use crate::{error::DecodeError, table::{AnyTable, Table}, tag::Tag};

/// Decodes a record body into a type-erased table.
pub type DeserializeFn = fn(&[u8], &Registry) -> Result<AnyTable, DecodeError>;

fn deserialize_erased<T: Table>(src: &[u8], registry: &Registry) -> Result<AnyTable, DecodeError> {
    T::deserialize(src, registry).map(AnyTable::new)
}

/// Maps wire tags to deserializers so `any` fields can be decoded.
///
/// A registry belongs to whoever decodes; generated code fills it through
/// `register_tables` rather than through any global state.
#[derive(Default, Clone)]
pub struct Registry {
    deserializers: HashMap<Tag, DeserializeFn>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Bind `T::TAG` to `T::deserialize`, returning the previous binding.
    pub fn register<T: Table>(&mut self) -> Option<DeserializeFn> {
        self.register_fn(T::TAG, deserialize_erased::<T>)
    }

    pub fn register_fn(&mut self, tag: Tag, deserialize: DeserializeFn) -> Option<DeserializeFn> {
        self.deserializers.insert(tag, deserialize)
    }

    pub fn lookup(&self, tag: Tag) -> Option<DeserializeFn> {
        self.deserializers.get(&tag).copied()
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.deserializers.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.deserializers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deserializers.is_empty()
    }

    /// Decode `src` as the table registered under `tag`.
    pub fn deserialize(&self, tag: Tag, src: &[u8]) -> Result<AnyTable, DecodeError> {
        let deserialize = self.lookup(tag).ok_or(DecodeError::UnknownTag(tag))?;
        deserialize(src, self)
    }
}
