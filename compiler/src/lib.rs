//! kserial-compiler
//!
//! This crate implements:
//!  1) A tokenizer + declaration parser for kserial schema files,
//!  2) Type resolution in a single forward pass (types must be declared before use),
//!  3) Header layout computation (`LayoutPlan`), including boolean bit packing,
//!  4) Code generation through pluggable emitters (Rust and TypeScript),
//!  5) Error types (`KserialError`).
//!
//! ```
//! let compiled = kserial_compiler::compile_schema(
//!     "enum Kind: byte { Cat, Dog }
//!      table Pet: PETT { name: string; kind: Kind; tame: bool }",
//! ).unwrap();
//!
//! let pet = compiled.plan("Pet").unwrap();
//! assert_eq!(pet.base_length, 6);
//! assert_eq!(compiled.deserializer_for("PETT"), Some("Pet"));
//! assert!(compiled.output.contains("pub struct Pet {"));
//! ```

pub mod error;
pub mod types;
pub mod utils;
pub mod tokenizer;
pub mod parser;
pub mod registry;
pub mod classify;
pub mod layout;
pub mod emit;
pub mod gen_rust;
pub mod gen_ts;
pub mod compiler;

pub use compiler::{compile_schema, compile_schema_with, Compilation, Compiler};
pub use emit::{EmitConfig, Emitter, Target};
pub use error::KserialError;
pub use layout::LayoutPlan;
pub use parser::parse_schema;
