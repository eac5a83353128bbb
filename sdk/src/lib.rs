//! kserial
//!
//! One dependency for both halves of kserial:
//!
//! - `runtime`: the wire codec that generated Rust code is written against
//!   (`Table`, `AnyTable`, `Registry`, the `serialize_*`/`deserialize_*` helpers).
//! - The schema compiler entry points (`compile_schema`, `compile_schema_with`)
//!   for build scripts and tools.

pub use kserial_compiler::{
    compile_schema, compile_schema_with, Compilation, EmitConfig, KserialError, LayoutPlan, Target,
};
pub use kserial_runtime::{AnyTable, DecodeError, Registry, Table, Tag};

/// The wire codec. Generated Rust code imports it as `kserial::runtime`.
pub mod runtime {
    pub use kserial_runtime::*;
}

pub mod compiler {
    pub use kserial_compiler::*;
}

/// Compile a schema and render the layout of every table as pretty-printed JSON.
pub fn layout_to_json(text: &str) -> Result<String, KserialError> {
    let compiled = compile_schema(text)?;
    Ok(serde_json::to_string_pretty(&compiled.plans)?)
}
