use serde::Serialize;

use crate::{
    error::KserialError,
    registry::{TypeEntry, TypeRegistry},
    types::{FieldDecl, IntKind},
};

/// Width of the offset slot a variable-length field keeps in the header.
pub const SLOT_WIDTH: usize = 4;

/// How a field is stored on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum StorageClass {
    Primitive { kind: IntKind },
    Bool,
    String,
    Any,
    Enum { name: String, repr: IntKind, first: String },
    Table { name: String },
    TableArray { name: String },
}

/// Runtime helper that measures a variable field's tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthFn {
    String,
    Any,
    Sub,
    SubArray,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    Zero,
    False,
    EmptyString,
    Null,
    EnumValue(String),
    EmptyArray,
}

impl StorageClass {
    /// Bytes the field occupies in the fixed header. Booleans have no slot of
    /// their own; they are packed into shared bytes by the layout.
    pub fn header_width(&self) -> Option<usize> {
        match self {
            StorageClass::Primitive { kind } => Some(kind.width()),
            StorageClass::Enum { repr, .. } => Some(repr.width()),
            StorageClass::Bool => None,
            StorageClass::String
            | StorageClass::Any
            | StorageClass::Table { .. }
            | StorageClass::TableArray { .. } => Some(SLOT_WIDTH),
        }
    }

    pub fn length_fn(&self) -> Option<LengthFn> {
        match self {
            StorageClass::String => Some(LengthFn::String),
            StorageClass::Any => Some(LengthFn::Any),
            StorageClass::Table { .. } => Some(LengthFn::Sub),
            StorageClass::TableArray { .. } => Some(LengthFn::SubArray),
            _ => None,
        }
    }

    pub fn is_variable(&self) -> bool {
        self.length_fn().is_some()
    }

    pub fn default_value(&self) -> DefaultValue {
        match self {
            StorageClass::Primitive { .. } => DefaultValue::Zero,
            StorageClass::Bool => DefaultValue::False,
            StorageClass::String => DefaultValue::EmptyString,
            StorageClass::Any | StorageClass::Table { .. } => DefaultValue::Null,
            StorageClass::Enum { first, .. } => DefaultValue::EnumValue(first.clone()),
            StorageClass::TableArray { .. } => DefaultValue::EmptyArray,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedField {
    pub name:  String,
    pub class: StorageClass,
}

/// Resolve a field's declared type. Built-in keywords take precedence over
/// declared names; anything else must already be in `registry`.
pub fn classify_field(table: &str, field: &FieldDecl, registry: &TypeRegistry) -> Result<ClassifiedField, KserialError> {
    let unsupported_array = || KserialError::UnsupportedArray {
        type_name: field.type_name.clone(),
        field:     field.name.clone(),
        table:     table.to_string(),
    };

    let builtin = match field.type_name.as_str() {
        "bool" => Some(StorageClass::Bool),
        "string" => Some(StorageClass::String),
        "any" => Some(StorageClass::Any),
        other => IntKind::from_keyword(other).map(|kind| StorageClass::Primitive { kind }),
    };

    let class = match (builtin, registry.lookup(&field.type_name)) {
        (Some(_), _) if field.is_array => return Err(unsupported_array()),
        (Some(class), _) => class,
        (None, None) => {
            return Err(KserialError::UnknownType {
                type_name: field.type_name.clone(),
                field:     field.name.clone(),
                table:     table.to_string(),
            })
        }
        (None, Some(TypeEntry::Enum { .. })) if field.is_array => return Err(unsupported_array()),
        (None, Some(TypeEntry::Enum { repr, values })) => {
            let first = values.first().ok_or_else(|| KserialError::EmptyEnumField {
                enum_name: field.type_name.clone(),
                field:     field.name.clone(),
                table:     table.to_string(),
            })?;
            StorageClass::Enum {
                name:  field.type_name.clone(),
                repr:  *repr,
                first: first.clone(),
            }
        }
        (None, Some(TypeEntry::Table { .. })) if field.is_array => StorageClass::TableArray { name: field.type_name.clone() },
        (None, Some(TypeEntry::Table { .. })) => StorageClass::Table { name: field.type_name.clone() },
    };

    Ok(ClassifiedField {
        name: field.name.clone(),
        class,
    })
}
