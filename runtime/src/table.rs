use std::any::Any;
use std::fmt;

use crate::{error::DecodeError, registry::Registry, tag::Tag};

/// A record type generated from a `table` declaration.
///
/// `serialize` writes the fixed header at the start of `dest` and appends the
/// variable-length tail after it, returning the number of bytes written. `dest`
/// must hold at least `serialize_length()` bytes.
pub trait Table: Any + Clone + fmt::Debug + PartialEq {
    const TAG: Tag;

    fn serialize_length(&self) -> usize;

    fn serialize(&self, dest: &mut [u8]) -> usize;

    fn deserialize(src: &[u8], registry: &Registry) -> Result<Self, DecodeError>;

    /// Serialize into a freshly allocated buffer.
    fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = vec![0; self.serialize_length()];
        let written = self.serialize(&mut buffer);
        buffer.truncate(written);
        buffer
    }
}

/// Object-safe view of a [`Table`], used to hold values of type `any`.
pub trait DynTable: fmt::Debug {
    fn dyn_tag(&self) -> Tag;
    fn dyn_serialize_length(&self) -> usize;
    fn dyn_serialize(&self, dest: &mut [u8]) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn clone_box(&self) -> Box<dyn DynTable>;
    fn eq_dyn(&self, other: &dyn DynTable) -> bool;
}

impl<T: Table> DynTable for T {
    fn dyn_tag(&self) -> Tag {
        T::TAG
    }

    fn dyn_serialize_length(&self) -> usize {
        self.serialize_length()
    }

    fn dyn_serialize(&self, dest: &mut [u8]) -> usize {
        self.serialize(dest)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn DynTable> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn DynTable) -> bool {
        other.as_any().downcast_ref::<T>() == Some(self)
    }
}

/// A table value whose concrete type is only known at runtime through its tag.
pub struct AnyTable(Box<dyn DynTable>);

impl AnyTable {
    pub fn new<T: Table>(value: T) -> AnyTable {
        AnyTable(Box::new(value))
    }

    pub fn tag(&self) -> Tag {
        self.0.dyn_tag()
    }

    pub fn downcast_ref<T: Table>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub(crate) fn serialize_length(&self) -> usize {
        self.0.dyn_serialize_length()
    }

    pub(crate) fn serialize(&self, dest: &mut [u8]) -> usize {
        self.0.dyn_serialize(dest)
    }
}

impl Clone for AnyTable {
    fn clone(&self) -> AnyTable {
        AnyTable(self.0.clone_box())
    }
}

impl PartialEq for AnyTable {
    fn eq(&self, other: &AnyTable) -> bool {
        self.0.eq_dyn(other.0.as_ref())
    }
}

impl fmt::Debug for AnyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}
