use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::{
    error::KserialError,
    gen_rust::RustEmitter,
    gen_ts::TypeScriptEmitter,
    layout::LayoutPlan,
    types::{EnumDecl, TableDecl},
};

/// A code generation backend. The compiler calls `prelude` once, then one
/// `emit_*` per declaration in source order, then `finish`; the returned
/// chunks are concatenated with blank lines between them.
pub trait Emitter {
    fn prelude(&mut self) -> String;

    fn emit_enum(&mut self, decl: &EnumDecl) -> Result<String, KserialError>;

    fn emit_table(&mut self, decl: &TableDecl, plan: &LayoutPlan) -> Result<String, KserialError>;

    fn finish(&mut self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Rust,
    TypeScript,
}

impl Target {
    pub fn default_runtime_path(self) -> &'static str {
        match self {
            Target::Rust       => "kserial::runtime",
            Target::TypeScript => "kserial",
        }
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Target, String> {
        match s.to_ascii_lowercase().as_str() {
            "rust" | "rs" => Ok(Target::Rust),
            "typescript" | "ts" => Ok(Target::TypeScript),
            other => Err(format!("unknown target {:?} (expected rust or ts)", other)),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Target::Rust       => "rust",
            Target::TypeScript => "ts",
        })
    }
}

/// Options that shape generated code.
#[derive(Debug, Clone, Default)]
pub struct EmitConfig {
    pub target:       Target,
    /// Module path (Rust) or package name (TypeScript) the generated code
    /// imports the runtime from.
    pub runtime_path: Option<String>,
}

impl EmitConfig {
    pub fn new(target: Target) -> EmitConfig {
        EmitConfig {
            target,
            runtime_path: None,
        }
    }

    pub fn runtime_path(&self) -> &str {
        self.runtime_path
            .as_deref()
            .unwrap_or(self.target.default_runtime_path())
    }

    pub fn emitter(&self) -> Box<dyn Emitter> {
        match self.target {
            Target::Rust       => Box::new(RustEmitter::new(self.runtime_path())),
            Target::TypeScript => Box::new(TypeScriptEmitter::new(self.runtime_path())),
        }
    }
}
