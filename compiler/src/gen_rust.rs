use std::collections::HashMap;

use crate::{
    classify::StorageClass,
    emit::Emitter,
    error::KserialError,
    layout::LayoutPlan,
    types::{EnumDecl, IntKind, TableDecl},
    utils::quote,
};

/// Converts a string to PascalCase.
/// - If the string contains underscores, it splits on underscores and converts each word
///   so that its first letter is uppercase and the rest lowercase.
/// - If the string does not contain underscores and is fully uppercase, only the first
///   letter stays uppercase.
/// - Otherwise, it ensures only the first letter is uppercase.
pub fn to_pascal_case(s: &str) -> String {
    fn capitalize(word: &str, lower_rest: bool) -> String {
        let mut chars = word.chars();
        match chars.next() {
            None => String::new(),
            Some(first) if lower_rest => first.to_uppercase().to_string() + &chars.as_str().to_lowercase(),
            Some(first) => first.to_uppercase().to_string() + chars.as_str(),
        }
    }

    if s.contains('_') {
        s.split('_')
         .filter(|word| !word.is_empty())
         .map(|word| capitalize(word, true))
         .collect::<String>()
    } else {
        capitalize(s, s == s.to_uppercase())
    }
}

/// Converts a string to snake_case.
/// This implementation avoids inserting underscores between consecutive uppercase letters,
/// so that acronyms remain intact (e.g. "sessionID" becomes "session_id").
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut snake = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                // Insert an underscore if the previous character is not uppercase,
                // or if the next character exists and is lowercase.
                if (!prev.is_uppercase() && prev != '_')
                    || (prev.is_uppercase() && i + 1 < chars.len() && chars[i + 1].is_lowercase())
                {
                    snake.push('_');
                }
            }
            snake.extend(c.to_lowercase());
        } else {
            snake.push(c);
        }
    }
    snake
}

/// Escapes Rust reserved keywords by suffixing with an underscore, and prefixes
/// names that start with a digit.
pub fn escape_rust_keyword(s: &str) -> String {
    let keywords = [
        "as", "break", "const", "continue", "crate", "else",
        "enum", "extern", "false", "fn", "for", "if", "impl",
        "in", "let", "loop", "match", "mod", "move", "mut",
        "pub", "ref", "return", "self", "Self", "static",
        "struct", "super", "trait", "true", "type", "unsafe",
        "use", "where", "while", "async", "await", "dyn",
        // reserved for future use
        "abstract", "become", "box", "do", "final", "macro",
        "override", "priv", "try", "typeof", "unsized", "virtual",
        "yield",
    ];
    if keywords.contains(&s) {
        format!("{}_", s)
    } else if s.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", s)
    } else {
        s.to_string()
    }
}

/// Record `generated` as taken within one scope, failing when it is not a
/// usable identifier or another schema name already maps to it.
fn claim(taken: &mut HashMap<String, String>, scope: &str, name: &str, generated: String) -> Result<String, KserialError> {
    if generated.is_empty() || generated == "_" {
        return Err(KserialError::InvalidIdentifier {
            name:  name.to_string(),
            scope: scope.to_string(),
        });
    }
    if let Some(first) = taken.insert(generated.clone(), name.to_string()) {
        return Err(KserialError::NameCollision {
            scope: scope.to_string(),
            first,
            second: name.to_string(),
            generated,
        });
    }
    Ok(generated)
}

fn type_name(name: &str) -> String {
    escape_rust_keyword(&to_pascal_case(name))
}

fn field_name(name: &str) -> String {
    escape_rust_keyword(&to_snake_case(name))
}

fn int_type(kind: IntKind) -> &'static str {
    match kind {
        IntKind::Byte   => "u8",
        IntKind::Int16  => "i16",
        IntKind::Uint16 => "u16",
        IntKind::Int32  => "i32",
        IntKind::Uint32 => "u32",
    }
}

/// Maps a storage class to the Rust type of the record member.
fn map_type(class: &StorageClass) -> String {
    match class {
        StorageClass::Primitive { kind } => int_type(*kind).to_string(),
        StorageClass::Bool => "bool".to_string(),
        StorageClass::String => "::std::string::String".to_string(),
        StorageClass::Any => "::core::option::Option<ks::AnyTable>".to_string(),
        StorageClass::Enum { name, .. } => type_name(name),
        // Boxed so that a table may contain itself.
        StorageClass::Table { name } => format!("::core::option::Option<::std::boxed::Box<{}>>", type_name(name)),
        StorageClass::TableArray { name } => format!("::std::vec::Vec<{}>", type_name(name)),
    }
}

/// Generates Rust records and `Table` implementations.
///
/// Generated code names everything outside the schema by its full path, so
/// schema types such as `Result` or `Box` cannot shadow what it relies on.
pub struct RustEmitter {
    runtime_path: String,
    tables:       Vec<String>,
    types:        HashMap<String, String>,
}

impl RustEmitter {
    pub fn new(runtime_path: &str) -> RustEmitter {
        RustEmitter {
            runtime_path: runtime_path.to_string(),
            tables:       Vec::new(),
            types:        HashMap::new(),
        }
    }
}

impl Emitter for RustEmitter {
    fn prelude(&mut self) -> String {
        format!(
            "// Code generated by kserial. DO NOT EDIT.\n\nuse {} as ks;",
            self.runtime_path
        )
    }

    fn emit_enum(&mut self, decl: &EnumDecl) -> Result<String, KserialError> {
        claim(&mut self.types, "schema", &decl.name, type_name(&decl.name))?;
        let scope = format!("enum {:?}", decl.name);
        let mut variants = HashMap::new();
        for value in &decl.values {
            claim(&mut variants, &scope, value, type_name(value))?;
        }
        Ok(generate_enum(decl))
    }

    fn emit_table(&mut self, decl: &TableDecl, plan: &LayoutPlan) -> Result<String, KserialError> {
        let struct_name = claim(&mut self.types, "schema", &decl.name, type_name(&decl.name))?;
        let scope = format!("table {:?}", decl.name);
        let mut members = HashMap::new();
        for member in &plan.members {
            claim(&mut members, &scope, &member.name, field_name(&member.name))?;
        }
        self.tables.push(struct_name);
        Ok(generate_struct(decl, plan))
    }

    fn finish(&mut self) -> Option<String> {
        let param = if self.tables.is_empty() { "_registry" } else { "registry" };
        let mut lines = vec![
            "/// Binds every table of this schema to its tag.".to_string(),
            format!("pub fn register_tables({}: &mut ks::Registry) {{", param),
        ];
        for table in &self.tables {
            lines.push(format!("    registry.register::<{}>();", table));
        }
        lines.push("}".to_string());
        Some(lines.join("\n"))
    }
}

/// Generates a Rust enum whose discriminants are the declaration positions,
/// plus a `TryFrom` conversion from the underlying integer.
fn generate_enum(decl: &EnumDecl) -> String {
    let enum_name = type_name(&decl.name);
    let repr = int_type(decl.repr);
    let mut lines = Vec::new();

    if decl.values.is_empty() {
        // A zero-variant enum can take neither a repr nor a default.
        lines.push("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]".to_string());
    } else {
        lines.push("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]".to_string());
        lines.push(format!("#[repr({})]", repr));
    }
    lines.push(format!("pub enum {} {{", enum_name));
    for (i, value) in decl.values.iter().enumerate() {
        if i == 0 {
            lines.push("    #[default]".to_string());
        }
        lines.push(format!("    {} = {},", type_name(value), i));
    }
    lines.push("}".to_string());
    lines.push(String::new());

    lines.push(format!("impl ::core::convert::TryFrom<{}> for {} {{", repr, enum_name));
    lines.push("    type Error = ks::DecodeError;".to_string());
    lines.push(String::new());
    lines.push(format!("    fn try_from(value: {}) -> ::core::result::Result<Self, ks::DecodeError> {{", repr));
    lines.push("        match value {".to_string());
    for (i, value) in decl.values.iter().enumerate() {
        lines.push(format!("            {} => Ok({}::{}),", i, enum_name, type_name(value)));
    }
    lines.push(format!(
        "            _ => Err(ks::DecodeError::InvalidEnumValue {{ name: {}, value: value as i64 }}),",
        quote(&decl.name)
    ));
    lines.push("        }".to_string());
    lines.push("    }".to_string());
    lines.push("}".to_string());

    lines.join("\n")
}

fn length_expr(class: &StorageClass, member: &str) -> Option<String> {
    match class {
        StorageClass::String => Some(format!("ks::string_length(&self.{})", member)),
        StorageClass::Any => Some(format!("ks::any_length(self.{}.as_ref())", member)),
        StorageClass::Table { .. } => Some(format!("ks::sub_length(self.{}.as_deref())", member)),
        StorageClass::TableArray { .. } => Some(format!("ks::sub_array_length(&self.{})", member)),
        _ => None,
    }
}

fn serialize_stmt(class: &StorageClass, member: &str, offset: usize) -> String {
    match class {
        StorageClass::Primitive { kind } => {
            format!("ks::serialize_{}(dest, {}, self.{});", int_type(*kind), offset, member)
        }
        StorageClass::Enum { repr, .. } => format!(
            "ks::serialize_{}(dest, {}, self.{} as {});",
            int_type(*repr),
            offset,
            member,
            int_type(*repr)
        ),
        StorageClass::String => format!("offset += ks::serialize_string(dest, {}, offset, &self.{});", offset, member),
        StorageClass::Any => format!("offset += ks::serialize_any(dest, {}, offset, self.{}.as_ref());", offset, member),
        StorageClass::Table { .. } => {
            format!("offset += ks::serialize_sub(dest, {}, offset, self.{}.as_deref());", offset, member)
        }
        StorageClass::TableArray { .. } => {
            format!("offset += ks::serialize_sub_array(dest, {}, offset, &self.{});", offset, member)
        }
        StorageClass::Bool => unreachable!("booleans are written by chunk"),
    }
}

fn deserialize_expr(class: &StorageClass, offset: usize) -> String {
    match class {
        StorageClass::Primitive { kind } => format!("ks::deserialize_{}(src, {})?", int_type(*kind), offset),
        StorageClass::Enum { name, repr, .. } => format!(
            "<{} as ::core::convert::TryFrom<{}>>::try_from(ks::deserialize_{}(src, {})?)?",
            type_name(name),
            int_type(*repr),
            int_type(*repr),
            offset
        ),
        StorageClass::String => format!("ks::deserialize_string(src, {})?", offset),
        StorageClass::Any => format!("ks::deserialize_any(src, {}, registry)?", offset),
        StorageClass::Table { name } => format!(
            "ks::deserialize_sub::<{}>(src, {}, registry)?.map(::std::boxed::Box::new)",
            type_name(name),
            offset
        ),
        StorageClass::TableArray { name } => format!(
            "ks::deserialize_sub_array::<{}>(src, {}, registry)?",
            type_name(name),
            offset
        ),
        StorageClass::Bool => unreachable!("booleans are read by chunk"),
    }
}

fn pack_bools(members: &[String]) -> String {
    if let [only] = members {
        return format!("self.{} as u8", field_name(only));
    }
    members
        .iter()
        .enumerate()
        .map(|(bit, m)| {
            if bit == 0 {
                format!("(self.{} as u8)", field_name(m))
            } else {
                format!("((self.{} as u8) << {})", field_name(m), bit)
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Generates the record struct and its `Table` implementation.
fn generate_struct(decl: &TableDecl, plan: &LayoutPlan) -> String {
    let struct_name = type_name(&decl.name);
    let base = plan.base_length;
    let mut lines = Vec::new();

    lines.push("#[derive(Debug, Clone, PartialEq, Default)]".to_string());
    lines.push(format!("pub struct {} {{", struct_name));
    for member in &plan.members {
        lines.push(format!("    pub {}: {},", field_name(&member.name), map_type(&member.class)));
    }
    lines.push("}".to_string());
    lines.push(String::new());

    lines.push(format!("impl ks::Table for {} {{", struct_name));
    lines.push(format!("    const TAG: ks::Tag = ks::Tag::new(*b{});", quote(&decl.tag)));
    lines.push(String::new());

    // serialize_length
    let mut length_terms = vec![base.to_string()];
    for variable in &plan.variable_fields {
        if let Some(class) = plan.member(&variable.name) {
            length_terms.extend(length_expr(class, &field_name(&variable.name)));
        }
    }
    lines.push("    fn serialize_length(&self) -> usize {".to_string());
    lines.push(format!("        {}", length_terms.join(" + ")));
    lines.push("    }".to_string());
    lines.push(String::new());

    // serialize
    let dest = if plan.members.is_empty() { "_dest" } else { "dest" };
    lines.push(format!("    fn serialize(&self, {}: &mut [u8]) -> usize {{", dest));
    if plan.has_variable_fields() {
        lines.push(format!("        let mut offset = {};", base));
    }
    for slot in &plan.slots {
        if let Some(class) = plan.member(&slot.name) {
            lines.push(format!("        {}", serialize_stmt(class, &field_name(&slot.name), slot.offset)));
        }
    }
    for chunk in &plan.bool_chunks {
        lines.push(format!("        ks::serialize_u8(dest, {}, {});", chunk.offset, pack_bools(&chunk.members)));
    }
    if plan.has_variable_fields() {
        lines.push("        offset".to_string());
    } else {
        lines.push(format!("        {}", base));
    }
    lines.push("    }".to_string());
    lines.push(String::new());

    // deserialize
    let needs_registry = plan.members.iter().any(|m| {
        matches!(m.class, StorageClass::Any | StorageClass::Table { .. } | StorageClass::TableArray { .. })
    });
    lines.push(format!(
        "    fn deserialize({}: &[u8], {}: &ks::Registry) -> ::core::result::Result<Self, ks::DecodeError> {{",
        if plan.members.is_empty() { "_src" } else { "src" },
        if needs_registry { "registry" } else { "_registry" }
    ));
    for (i, chunk) in plan.bool_chunks.iter().enumerate() {
        lines.push(format!("        let bools{} = ks::deserialize_u8(src, {})?;", i, chunk.offset));
    }
    lines.push(format!("        Ok({} {{", struct_name));
    for member in &plan.members {
        let value = match plan.bit_of(&member.name) {
            Some((chunk_offset, bit)) => {
                let chunk = plan
                    .bool_chunks
                    .iter()
                    .position(|c| c.offset == chunk_offset)
                    .unwrap_or_default();
                if bit == 0 {
                    format!("bools{} & 1 != 0", chunk)
                } else {
                    format!("(bools{} >> {}) & 1 != 0", chunk, bit)
                }
            }
            None => {
                let offset = plan.slot_of(&member.name).unwrap_or_default();
                deserialize_expr(&member.class, offset)
            }
        };
        lines.push(format!("            {}: {},", field_name(&member.name), value));
    }
    lines.push("        })".to_string());
    lines.push("    }".to_string());
    lines.push("}".to_string());

    lines.join("\n")
}
