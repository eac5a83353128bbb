//! Byte layout of a table's fixed header.
//!
//! Fields are laid out in declaration order. Integer and enum fields take
//! their natural width, variable-length fields take a 4-byte offset slot, and
//! booleans are packed eight to a byte into chunks appended after everything
//! else. Chunk `i` sits at `base_length - i - 1`, so the first chunk occupies
//! the last header byte.

use serde::Serialize;
use tracing::trace;

use crate::classify::{ClassifiedField, LengthFn, StorageClass};

pub const BOOLS_PER_CHUNK: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSlot {
    pub name:   String,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoolChunk {
    pub offset:  usize,
    /// Member `j` is stored in bit `j`, least significant first.
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableField {
    pub name:   String,
    /// Offset of the field's 4-byte slot in the header.
    pub slot:   usize,
    pub length: LengthFn,
}

/// Target-independent layout of one table, shared by every emitter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutPlan {
    pub table:           String,
    pub tag:             String,
    pub base_length:     usize,
    /// Every field in declaration order.
    pub members:         Vec<ClassifiedField>,
    /// Header offset of every non-bool field, in declaration order.
    pub slots:           Vec<FieldSlot>,
    pub bool_chunks:     Vec<BoolChunk>,
    /// Fields that append to the tail, in declaration order.
    pub variable_fields: Vec<VariableField>,
}

impl LayoutPlan {
    pub fn compute(table: &str, tag: &str, members: Vec<ClassifiedField>) -> LayoutPlan {
        let mut base_length = 0;
        let mut slots = Vec::new();
        let mut chunks: Vec<Vec<String>> = Vec::new();
        let mut variable_fields = Vec::new();

        for field in &members {
            let Some(width) = field.class.header_width() else {
                // Chunks fill up regardless of what is declared between bools.
                match chunks.last_mut() {
                    Some(chunk) if chunk.len() < BOOLS_PER_CHUNK => chunk.push(field.name.clone()),
                    _ => chunks.push(vec![field.name.clone()]),
                }
                continue;
            };

            slots.push(FieldSlot {
                name:   field.name.clone(),
                offset: base_length,
            });
            if let Some(length) = field.class.length_fn() {
                variable_fields.push(VariableField {
                    name: field.name.clone(),
                    slot: base_length,
                    length,
                });
            }
            trace!(table, field = %field.name, offset = base_length, width, "placed field");
            base_length += width;
        }

        base_length += chunks.len();
        let bool_chunks = chunks
            .into_iter()
            .enumerate()
            .map(|(i, members)| BoolChunk {
                offset: base_length - i - 1,
                members,
            })
            .collect();

        LayoutPlan {
            table: table.to_string(),
            tag: tag.to_string(),
            base_length,
            members,
            slots,
            bool_chunks,
            variable_fields,
        }
    }

    pub fn has_variable_fields(&self) -> bool {
        !self.variable_fields.is_empty()
    }

    pub fn slot_of(&self, field: &str) -> Option<usize> {
        self.slots.iter().find(|s| s.name == field).map(|s| s.offset)
    }

    /// The chunk offset and bit index holding boolean `field`.
    pub fn bit_of(&self, field: &str) -> Option<(usize, usize)> {
        self.bool_chunks.iter().find_map(|chunk| {
            chunk
                .members
                .iter()
                .position(|m| m == field)
                .map(|bit| (chunk.offset, bit))
        })
    }

    /// Total serialized length given the tail length of each variable field,
    /// in `variable_fields` order.
    pub fn serialize_length(&self, tail_lengths: &[usize]) -> usize {
        self.base_length + tail_lengths.iter().sum::<usize>()
    }

    pub fn member(&self, field: &str) -> Option<&StorageClass> {
        self.members.iter().find(|m| m.name == field).map(|m| &m.class)
    }
}
