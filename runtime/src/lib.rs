//! Runtime support for records generated by the kserial schema compiler.
//!
//! A serialized record is a fixed-size header followed by a variable-length
//! tail. Integer and enum fields sit at constant header offsets, booleans are
//! packed eight to a byte at the end of the header, and strings, nested
//! records, record arrays and `any` values keep a 4-byte offset slot in the
//! header that points into the tail.
//!
//! ```
//! use kserial_runtime::*;
//!
//! #[derive(Debug, Clone, PartialEq, Default)]
//! struct Label {
//!     id:   u16,
//!     text: String,
//! }
//!
//! impl Table for Label {
//!     const TAG: Tag = Tag::new(*b"LABL");
//!
//!     fn serialize_length(&self) -> usize {
//!         6 + string_length(&self.text)
//!     }
//!
//!     fn serialize(&self, dest: &mut [u8]) -> usize {
//!         let mut offset = 6;
//!         serialize_u16(dest, 0, self.id);
//!         offset += serialize_string(dest, 2, offset, &self.text);
//!         offset
//!     }
//!
//!     fn deserialize(src: &[u8], _registry: &Registry) -> Result<Self, DecodeError> {
//!         Ok(Label {
//!             id:   deserialize_u16(src, 0)?,
//!             text: deserialize_string(src, 2)?,
//!         })
//!     }
//! }
//!
//! let label = Label { id: 7, text: "hi".to_owned() };
//! let bytes = label.to_bytes();
//! assert_eq!(bytes, [7, 0, 6, 0, 0, 0, 2, 0, 0, 0, b'h', b'i']);
//! assert_eq!(Label::deserialize(&bytes, &Registry::new()), Ok(label));
//! ```

pub mod bb;
pub mod codec;
pub mod error;
pub mod registry;
pub mod table;
pub mod tag;

pub use bb::*;
pub use codec::*;
pub use error::DecodeError;
pub use registry::{DeserializeFn, Registry};
pub use table::{AnyTable, DynTable, Table};
pub use tag::Tag;
