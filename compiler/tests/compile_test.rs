use kserial_compiler::{
    compile_schema, compile_schema_with,
    classify::StorageClass,
    layout::BoolChunk,
    parse_schema,
    types::{Declaration, IntKind},
    EmitConfig, KserialError, Target,
};
use pretty_assertions::assert_eq;

const PET_SCHEMA: &str = "
enum Kind: byte { Cat, Dog }
table Pet: PETT { name: string; kind: Kind; tame: bool }
";

const PET_RUST: &str = r#"// Code generated by kserial. DO NOT EDIT.

use kserial::runtime as ks;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Kind {
    #[default]
    Cat = 0,
    Dog = 1,
}

impl ::core::convert::TryFrom<u8> for Kind {
    type Error = ks::DecodeError;

    fn try_from(value: u8) -> ::core::result::Result<Self, ks::DecodeError> {
        match value {
            0 => Ok(Kind::Cat),
            1 => Ok(Kind::Dog),
            _ => Err(ks::DecodeError::InvalidEnumValue { name: "Kind", value: value as i64 }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pet {
    pub name: ::std::string::String,
    pub kind: Kind,
    pub tame: bool,
}

impl ks::Table for Pet {
    const TAG: ks::Tag = ks::Tag::new(*b"PETT");

    fn serialize_length(&self) -> usize {
        6 + ks::string_length(&self.name)
    }

    fn serialize(&self, dest: &mut [u8]) -> usize {
        let mut offset = 6;
        offset += ks::serialize_string(dest, 0, offset, &self.name);
        ks::serialize_u8(dest, 4, self.kind as u8);
        ks::serialize_u8(dest, 5, self.tame as u8);
        offset
    }

    fn deserialize(src: &[u8], _registry: &ks::Registry) -> ::core::result::Result<Self, ks::DecodeError> {
        let bools0 = ks::deserialize_u8(src, 5)?;
        Ok(Pet {
            name: ks::deserialize_string(src, 0)?,
            kind: <Kind as ::core::convert::TryFrom<u8>>::try_from(ks::deserialize_u8(src, 4)?)?,
            tame: bools0 & 1 != 0,
        })
    }
}

/// Binds every table of this schema to its tag.
pub fn register_tables(registry: &mut ks::Registry) {
    registry.register::<Pet>();
}
"#;

const PET_TS: &str = r#"import {KSerializableAny,KSerializable,register,
subLength,anyLength,subArrayLength,stringLength,
serializeSub,serializeSubArray,serializeInt32,serializeInt16,serializeUint32,serializeUint16,serializeByte,serializeString,serializeAny,
deserializeSub,deserializeSubArray,deserializeInt32,deserializeInt16,deserializeUint32,deserializeUint16,deserializeByte,deserializeString,deserializeAny
} from 'kserial';

export enum Kind {
  Cat,
  Dog,
}

export class Pet {
  static readonly id:string = 'PETT';
  name: string;
  kind: Kind;
  tame: boolean;
  constructor({name='',kind=Kind.Cat,tame=false}:{name?:string,kind?:Kind,tame?:boolean}={}) {this.name=name; this.kind=kind; this.tame=tame;}
  get serializeLength(): number { return 6+stringLength(this.name); }
  serialize(dest: Uint8Array): number {
    let offset = 6;
    offset += serializeString(dest, 0, offset, this.name);
    serializeByte(dest, 4, this.kind);
    serializeByte(dest, 5, ((this.tame?1:0)));
    return offset;
  }
  static deserialize(src: Uint8Array): Pet {
    return new Pet({
      name: deserializeString(src, 0),
      kind: deserializeByte(src, 4) as Kind,
      tame: !!(deserializeByte(src, 5)&1),
    });
  }
}
register('PETT', Pet.deserialize);
"#;

#[test]
fn test_parse_schema() {
    let input = r#"
    namespace zoo;

    enum Kind: uint16 {
      Cat,
      Dog,
      Parrot,
    }

    table Pet: PETT {
      name: string;
      kind: Kind;
    }

    table Owner: OWNR { pets: [Pet]; best: Pet; all: Pet[] }
    "#;

    let schema = parse_schema(input).expect("parse_schema failed");
    assert_eq!(schema.declarations.len(), 3);

    let Declaration::Enum(kind) = &schema.declarations[0] else {
        panic!("expected an enum, got {:?}", schema.declarations[0]);
    };
    assert_eq!(kind.name, "Kind");
    assert_eq!(kind.repr, IntKind::Uint16);
    assert_eq!(kind.values, vec!["Cat", "Dog", "Parrot"]);
    assert_eq!((kind.line, kind.column), (4, 10));

    let Declaration::Table(pet) = &schema.declarations[1] else {
        panic!("expected a table, got {:?}", schema.declarations[1]);
    };
    assert_eq!(pet.name, "Pet");
    assert_eq!(pet.tag, "PETT");
    assert_eq!(pet.fields.len(), 2);
    assert_eq!(pet.fields[0].name, "name");
    assert_eq!(pet.fields[0].type_name, "string");
    assert!(!pet.fields[0].is_array);
    assert_eq!(pet.fields[1].type_name, "Kind");

    let Declaration::Table(owner) = &schema.declarations[2] else {
        panic!("expected a table, got {:?}", schema.declarations[2]);
    };
    let arrays: Vec<_> = owner.fields.iter().map(|f| (f.name.as_str(), f.type_name.as_str(), f.is_array)).collect();
    assert_eq!(arrays, vec![("pets", "Pet", true), ("best", "Pet", false), ("all", "Pet", true)]);
}

#[test]
fn pet_example_rust() {
    let compiled = compile_schema(PET_SCHEMA).unwrap();
    assert_eq!(compiled.output, PET_RUST);

    let plan = compiled.plan("Pet").unwrap();
    assert_eq!(plan.base_length, 6);
    assert_eq!(plan.slot_of("name"), Some(0));
    assert_eq!(plan.slot_of("kind"), Some(4));
    assert_eq!(plan.bool_chunks, vec![BoolChunk { offset: 5, members: vec!["tame".into()] }]);
    assert_eq!(compiled.deserializer_for("PETT"), Some("Pet"));
    assert_eq!(compiled.deserializer_for("KIND"), None);
}

#[test]
fn pet_example_typescript() {
    let compiled = compile_schema_with(PET_SCHEMA, &EmitConfig::new(Target::TypeScript)).unwrap();
    assert_eq!(compiled.output, PET_TS);
}

#[test]
fn enum_values_are_numbered_by_position() {
    let compiled = compile_schema("enum Color: byte { Red, Green, Blue }").unwrap();
    assert!(compiled.output.contains("    Red = 0,\n    Green = 1,\n    Blue = 2,\n"));
    assert!(compiled.output.contains("            2 => Ok(Color::Blue),\n"));
}

#[test]
fn enum_fields_use_their_underlying_width() {
    let compiled = compile_schema(
        "enum Wide: uint32 { A } enum Narrow: int16 { B }
         table T: TTTT { w: Wide; n: Narrow; x: byte }",
    )
    .unwrap();
    let plan = compiled.plan("T").unwrap();
    assert_eq!(plan.slot_of("n"), Some(4));
    assert_eq!(plan.slot_of("x"), Some(6));
    assert_eq!(plan.base_length, 7);
    assert!(compiled.output.contains("ks::serialize_i16(dest, 4, self.n as i16);"));
    assert!(compiled.output.contains("w: <Wide as ::core::convert::TryFrom<u32>>::try_from(ks::deserialize_u32(src, 0)?)?,"));
}

#[test]
fn nine_bools_pack_into_two_bytes() {
    let fields: Vec<String> = (0..9).map(|i| format!("b{}: bool", i)).collect();
    let compiled = compile_schema(&format!("table B: BOOL {{ {} }}", fields.join("; "))).unwrap();
    let plan = compiled.plan("B").unwrap();
    assert_eq!(plan.base_length, 2);
    assert_eq!(plan.bool_chunks.len(), 2);
    assert_eq!(plan.bit_of("b0"), Some((1, 0)));
    assert_eq!(plan.bit_of("b8"), Some((0, 0)));
    assert!(compiled.output.contains("        2\n    }"));
    assert!(compiled.output.contains("            b1: (bools0 >> 1) & 1 != 0,"));
    assert!(compiled.output.contains("            b8: bools1 & 1 != 0,"));
}

#[test]
fn layout_of_mixed_table() {
    let compiled = compile_schema("table M: MMMM { a: uint32; b: string; c: bool }").unwrap();
    let plan = compiled.plan("M").unwrap();
    assert_eq!(plan.base_length, 9);
    assert!(compiled.output.contains("        9 + ks::string_length(&self.b)\n"));
}

#[test]
fn variable_fields_append_in_declaration_order() {
    let compiled = compile_schema(
        "table P: PPPP { x: byte }
         table V: VVVV { s: string; p: P; ps: [P]; a: any; n: uint16 }",
    )
    .unwrap();
    let plan = compiled.plan("V").unwrap();
    assert_eq!(plan.base_length, 18);
    let slots: Vec<_> = plan.variable_fields.iter().map(|v| (v.name.as_str(), v.slot)).collect();
    assert_eq!(slots, vec![("s", 0), ("p", 4), ("ps", 8), ("a", 12)]);
    assert_eq!(
        plan.member("ps"),
        Some(&StorageClass::TableArray { name: "P".into() })
    );
    assert!(compiled.output.contains(
        "18 + ks::string_length(&self.s) + ks::sub_length(self.p.as_deref()) + ks::sub_array_length(&self.ps) + ks::any_length(self.a.as_ref())"
    ));
    assert!(compiled.output.contains(
        "    pub p: ::core::option::Option<::std::boxed::Box<P>>,\n    pub ps: ::std::vec::Vec<P>,\n    pub a: ::core::option::Option<ks::AnyTable>,\n"
    ));
}

#[test]
fn fixed_only_table_returns_constant_length() {
    let compiled = compile_schema("table F: FFFF { a: int32; b: bool }").unwrap();
    assert!(!compiled.plan("F").unwrap().has_variable_fields());
    assert!(!compiled.output.contains("let mut offset"));
    assert!(compiled.output.contains("        ks::serialize_u8(dest, 4, self.b as u8);\n        5\n"));
}

#[test]
fn types_must_be_declared_before_use() {
    let err = compile_schema(
        "table Owner: OWNR { pet: Pet }
         table Pet: PETT { name: string }",
    )
    .unwrap_err();
    match err {
        KserialError::UnknownType { type_name, field, table } => {
            assert_eq!((type_name.as_str(), field.as_str(), table.as_str()), ("Pet", "pet", "Owner"));
        }
        other => panic!("unexpected error {:?}", other),
    }

    assert!(matches!(
        compile_schema("table A: AAAA { k: Kind } enum Kind: byte { X }"),
        Err(KserialError::UnknownType { .. })
    ));
}

#[test]
fn table_may_reference_itself() {
    let compiled = compile_schema("table Node: NODE { value: int32; next: Node; children: [Node] }").unwrap();
    assert!(compiled.output.contains("    pub next: ::core::option::Option<::std::boxed::Box<Node>>,"));
    assert!(compiled.output.contains("ks::deserialize_sub::<Node>(src, 4, registry)?.map(::std::boxed::Box::new)"));
}

#[test]
fn empty_entries_are_ignored() {
    let a = compile_schema("enum E: byte { A, B, } table T: TTTT { a: byte;; }").unwrap();
    let b = compile_schema("enum E: byte { A, B } table T: TTTT { a: byte; }").unwrap();
    assert_eq!(a.output, b.output);
    assert_eq!(a.plans, b.plans);
}

#[test]
fn zero_values_and_zero_fields_are_allowed() {
    let compiled = compile_schema("enum Nothing: byte { } table Empty: EMPT { }").unwrap();
    assert!(compiled.output.contains("pub enum Nothing {\n}"));
    assert!(compiled.output.contains("    fn serialize(&self, _dest: &mut [u8]) -> usize {\n        0\n    }"));
    assert_eq!(compiled.plan("Empty").unwrap().base_length, 0);
}

#[test]
fn scanner_skips_namespaces_and_unknown_words() {
    let compiled = compile_schema(
        "namespace my.pets.v1;
         option whatever;
         ;; }
         // table Hidden: HIDE { }
         enum Kind: byte { Cat }",
    )
    .unwrap();
    assert_eq!(compiled.schema.declarations.len(), 1);
    assert_eq!(compiled.schema.declarations[0].name(), "Kind");
}

#[test]
fn namespace_without_terminator_ends_the_schema() {
    let compiled = compile_schema("namespace pets enum Kind: byte { Cat }").unwrap();
    assert!(compiled.schema.declarations.is_empty());
}

#[test]
fn tag_must_be_four_characters() {
    for tag in ["PET", "PETTT", "P-TT"] {
        let err = compile_schema(&format!("table Pet: {} {{ a: byte }}", tag)).unwrap_err();
        assert!(matches!(err, KserialError::TableGrammar { .. }), "{}: {:?}", tag, err);
    }
}

#[test]
fn grammar_errors_carry_the_fragment() {
    let err = compile_schema("enum Kind: int64 { A }").unwrap_err();
    match &err {
        KserialError::EnumGrammar { fragment, line, column } => {
            assert_eq!(fragment, "Kind: int64 { A }");
            assert_eq!((*line, *column), (1, 6));
        }
        other => panic!("unexpected error {:?}", other),
    }

    assert!(matches!(compile_schema("enum Kind: byte { A"), Err(KserialError::EnumGrammar { .. })));
    assert!(matches!(compile_schema("table T TTTT { }"), Err(KserialError::TableGrammar { .. })));
}

#[test]
fn invalid_enum_value_names_the_value() {
    let err = compile_schema("enum Color: byte { Red, Gr-een }").unwrap_err();
    match &err {
        KserialError::EnumValueName { enum_name, value } => {
            assert_eq!(enum_name, "Color");
            assert_eq!(value, "Gr-een");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(err.to_string(), "Invalid value name \"Gr-een\" in enum \"Color\"");
}

#[test]
fn malformed_field_names_the_entry() {
    let err = compile_schema("table T: TTTT { ok: byte; broken byte }").unwrap_err();
    match err {
        KserialError::FieldGrammar { table, entry } => {
            assert_eq!(table, "T");
            assert_eq!(entry, "broken byte");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(matches!(
        compile_schema("table T: TTTT { a: [byte }"),
        Err(KserialError::FieldGrammar { .. })
    ));
}

#[test]
fn arrays_of_scalars_are_unsupported() {
    assert!(matches!(
        compile_schema("table T: TTTT { a: [byte] }"),
        Err(KserialError::UnsupportedArray { .. })
    ));
}

#[test]
fn first_error_in_source_order_wins() {
    let err = compile_schema(
        "table A: AAAA { x: Missing }
         table B: BB { }",
    )
    .unwrap_err();
    assert!(matches!(err, KserialError::UnknownType { .. }));
}

#[test]
fn tags_bind_to_the_latest_table() {
    let compiled = compile_schema("table A: SAME { } table B: SAME { }").unwrap();
    assert_eq!(compiled.deserializer_for("SAME"), Some("B"));
}

#[test]
fn reserved_words_get_a_suffix() {
    let compiled = compile_schema("table Flags: FLGS { final: bool; try: byte; abstract: uint16; type: string }").unwrap();
    assert!(compiled
        .output
        .contains("    pub final_: bool,\n    pub try_: u8,\n    pub abstract_: u16,\n    pub type_: ::std::string::String,\n"));
    assert!(compiled.output.contains("ks::serialize_u16(dest, 1, self.abstract_);"));
}

#[test]
fn schema_names_do_not_shadow_generated_paths() {
    let compiled = compile_schema(
        "enum Option: byte { Some, None }
         table Result: RSLT { ok: bool; choice: Option }
         table Box: BOXX { inner: Result; all: [Box] }",
    )
    .unwrap();
    assert!(!compiled.output.contains("use kserial::runtime::{"));
    assert!(compiled.output.contains("pub struct Result {"));
    assert!(compiled.output.contains("impl ks::Table for Result {"));
    assert!(compiled.output.contains("    pub inner: ::core::option::Option<::std::boxed::Box<Result>>,\n    pub all: ::std::vec::Vec<Box>,\n"));
    assert!(compiled.output.contains("choice: <Option as ::core::convert::TryFrom<u8>>::try_from("));
    assert!(compiled.output.contains("fn deserialize(src: &[u8], registry: &ks::Registry) -> ::core::result::Result<Self, ks::DecodeError> {"));
}

#[test]
fn names_that_collide_after_case_conversion() {
    match compile_schema("enum Switch: byte { on, ON }").unwrap_err() {
        KserialError::NameCollision { scope, first, second, generated } => {
            assert_eq!(scope, "enum \"Switch\"");
            assert_eq!((first.as_str(), second.as_str(), generated.as_str()), ("on", "ON", "On"));
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(matches!(
        compile_schema("table T: TTTT { aB: byte; a_b: byte }"),
        Err(KserialError::NameCollision { .. })
    ));
    assert!(matches!(
        compile_schema("table pet_kind: PETK { } table PetKind: PETL { }"),
        Err(KserialError::NameCollision { .. })
    ));
    // Case is kept as written in TypeScript, so both spellings are fine there.
    assert!(compile_schema_with("enum Switch: byte { on, ON }", &EmitConfig::new(Target::TypeScript)).is_ok());
}

#[test]
fn underscore_is_not_a_name() {
    assert!(matches!(
        compile_schema("table T: TTTT { _: byte }"),
        Err(KserialError::InvalidIdentifier { .. })
    ));
    assert!(matches!(
        compile_schema("enum E: byte { A, _ }"),
        Err(KserialError::InvalidIdentifier { .. })
    ));
}

#[test]
fn enum_values_must_fit_the_underlying_type() {
    let values = |n: usize| (0..n).map(|i| format!("V{}", i)).collect::<Vec<_>>().join(", ");
    assert!(compile_schema(&format!("enum Full: byte {{ {} }}", values(256))).is_ok());
    match compile_schema(&format!("enum Over: byte {{ {} }}", values(257))).unwrap_err() {
        KserialError::EnumOverflow { enum_name, count, repr } => {
            assert_eq!((enum_name.as_str(), count, repr), ("Over", 257, "byte"));
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(compile_schema(&format!("enum Wide: int16 {{ {} }}", values(257))).is_ok());
}
