use crate::{
    classify::{DefaultValue, StorageClass},
    emit::Emitter,
    error::KserialError,
    layout::LayoutPlan,
    types::{EnumDecl, IntKind, TableDecl},
    utils::quote,
};

fn runtime_suffix(kind: IntKind) -> &'static str {
    match kind {
        IntKind::Byte   => "Byte",
        IntKind::Int16  => "Int16",
        IntKind::Uint16 => "Uint16",
        IntKind::Int32  => "Int32",
        IntKind::Uint32 => "Uint32",
    }
}

fn map_type(class: &StorageClass) -> String {
    match class {
        StorageClass::Primitive { .. } => "number".to_string(),
        StorageClass::Bool => "boolean".to_string(),
        StorageClass::String => "string".to_string(),
        StorageClass::Any => "KSerializableAny|null".to_string(),
        StorageClass::Enum { name, .. } => name.clone(),
        StorageClass::Table { name } => format!("{}|null", name),
        StorageClass::TableArray { name } => format!("{}[]", name),
    }
}

fn default_literal(class: &StorageClass) -> String {
    let enum_name = match class {
        StorageClass::Enum { name, .. } => name.as_str(),
        _ => "",
    };
    match class.default_value() {
        DefaultValue::Zero => "0".to_string(),
        DefaultValue::False => "false".to_string(),
        DefaultValue::EmptyString => "''".to_string(),
        DefaultValue::Null => "null".to_string(),
        DefaultValue::EnumValue(value) => format!("{}.{}", enum_name, value),
        DefaultValue::EmptyArray => "[]".to_string(),
    }
}

/// Generates TypeScript classes against the `kserial` npm runtime.
pub struct TypeScriptEmitter {
    runtime_module: String,
}

impl TypeScriptEmitter {
    pub fn new(runtime_module: &str) -> TypeScriptEmitter {
        TypeScriptEmitter {
            runtime_module: runtime_module.to_string(),
        }
    }
}

impl Emitter for TypeScriptEmitter {
    fn prelude(&mut self) -> String {
        format!(
            "import {{KSerializableAny,KSerializable,register,\n\
             subLength,anyLength,subArrayLength,stringLength,\n\
             serializeSub,serializeSubArray,serializeInt32,serializeInt16,serializeUint32,serializeUint16,serializeByte,serializeString,serializeAny,\n\
             deserializeSub,deserializeSubArray,deserializeInt32,deserializeInt16,deserializeUint32,deserializeUint16,deserializeByte,deserializeString,deserializeAny\n\
             }} from {};",
            quote(&self.runtime_module).replace('"', "'")
        )
    }

    fn emit_enum(&mut self, decl: &EnumDecl) -> Result<String, KserialError> {
        let mut lines = vec![format!("export enum {} {{", decl.name)];
        for value in &decl.values {
            lines.push(format!("  {},", value));
        }
        lines.push("}".to_string());
        Ok(lines.join("\n"))
    }

    fn emit_table(&mut self, decl: &TableDecl, plan: &LayoutPlan) -> Result<String, KserialError> {
        let name = &decl.name;
        let base = plan.base_length;
        let mut lines = vec![
            format!("export class {} {{", name),
            format!("  static readonly id:string = '{}';", decl.tag),
        ];

        for member in &plan.members {
            lines.push(format!("  {}: {};", member.name, map_type(&member.class)));
        }
        if !plan.members.is_empty() {
            let defaults: Vec<String> = plan
                .members
                .iter()
                .map(|m| format!("{}={}", m.name, default_literal(&m.class)))
                .collect();
            let typed: Vec<String> = plan
                .members
                .iter()
                .map(|m| format!("{}?:{}", m.name, map_type(&m.class)))
                .collect();
            let assigns: Vec<String> = plan.members.iter().map(|m| format!("this.{0}={0};", m.name)).collect();
            lines.push(format!(
                "  constructor({{{}}}:{{{}}}={{}}) {{{}}}",
                defaults.join(","),
                typed.join(","),
                assigns.join(" ")
            ));
        }

        let mut length_terms = vec![base.to_string()];
        for variable in &plan.variable_fields {
            let helper = match plan.member(&variable.name) {
                Some(StorageClass::String) => "stringLength",
                Some(StorageClass::Any) => "anyLength",
                Some(StorageClass::TableArray { .. }) => "subArrayLength",
                _ => "subLength",
            };
            length_terms.push(format!("{}(this.{})", helper, variable.name));
        }
        lines.push(format!("  get serializeLength(): number {{ return {}; }}", length_terms.join("+")));

        lines.push("  serialize(dest: Uint8Array): number {".to_string());
        if plan.has_variable_fields() {
            lines.push(format!("    let offset = {};", base));
        }
        for slot in &plan.slots {
            let (m, o) = (&slot.name, slot.offset);
            let stmt = match plan.member(m) {
                Some(StorageClass::Primitive { kind }) | Some(StorageClass::Enum { repr: kind, .. }) => {
                    format!("serialize{}(dest, {}, this.{});", runtime_suffix(*kind), o, m)
                }
                Some(StorageClass::String) => format!("offset += serializeString(dest, {}, offset, this.{});", o, m),
                Some(StorageClass::Any) => format!("offset += serializeAny(dest, {}, offset, this.{});", o, m),
                Some(StorageClass::TableArray { .. }) => {
                    format!("offset += serializeSubArray(dest, {}, offset, this.{});", o, m)
                }
                _ => format!("offset += serializeSub(dest, {}, offset, this.{});", o, m),
            };
            lines.push(format!("    {}", stmt));
        }
        for chunk in &plan.bool_chunks {
            let bits: Vec<String> = chunk
                .members
                .iter()
                .enumerate()
                .map(|(bit, m)| {
                    if bit == 0 {
                        format!("((this.{}?1:0))", m)
                    } else {
                        format!("((this.{}?1:0)<<{})", m, bit)
                    }
                })
                .collect();
            lines.push(format!("    serializeByte(dest, {}, {});", chunk.offset, bits.join("+")));
        }
        if plan.has_variable_fields() {
            lines.push("    return offset;".to_string());
        } else {
            lines.push(format!("    return {};", base));
        }
        lines.push("  }".to_string());

        lines.push(format!("  static deserialize(src: Uint8Array): {} {{", name));
        let mut entries = Vec::new();
        for slot in &plan.slots {
            let (m, o) = (&slot.name, slot.offset);
            let value = match plan.member(m) {
                Some(StorageClass::Primitive { kind }) => format!("deserialize{}(src, {})", runtime_suffix(*kind), o),
                Some(StorageClass::Enum { name, repr, .. }) => {
                    format!("deserialize{}(src, {}) as {}", runtime_suffix(*repr), o, name)
                }
                Some(StorageClass::String) => format!("deserializeString(src, {})", o),
                Some(StorageClass::Any) => format!("deserializeAny(src, {})", o),
                Some(StorageClass::Table { name }) => format!("deserializeSub({0}.deserialize, src, {1}) as {0}|null", name, o),
                Some(StorageClass::TableArray { name }) => {
                    format!("deserializeSubArray({0}.deserialize, src, {1}) as {0}[]", name, o)
                }
                _ => continue,
            };
            entries.push(format!("{}: {}", m, value));
        }
        for (i, chunk) in plan.bool_chunks.iter().enumerate() {
            if let [only] = chunk.members.as_slice() {
                entries.push(format!("{}: !!(deserializeByte(src, {})&1)", only, chunk.offset));
                continue;
            }
            lines.push(format!("    const bools{} = deserializeByte(src, {});", i, chunk.offset));
            for (bit, m) in chunk.members.iter().enumerate() {
                entries.push(format!("{}: !!((bools{}>>{})&1)", m, i, bit));
            }
        }
        if entries.is_empty() {
            lines.push(format!("    return new {}();", name));
        } else {
            lines.push(format!("    return new {}({{", name));
            for entry in entries {
                lines.push(format!("      {},", entry));
            }
            lines.push("    });".to_string());
        }
        lines.push("  }".to_string());
        lines.push("}".to_string());
        lines.push(format!("register('{}', {}.deserialize);", decl.tag, name));

        Ok(lines.join("\n"))
    }
}
