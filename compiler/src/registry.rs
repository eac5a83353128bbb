use std::collections::HashMap;

use crate::types::{EnumDecl, IntKind, TableDecl};

#[derive(Debug, Clone, PartialEq)]
pub enum TypeEntry {
    Enum {
        repr:   IntKind,
        values: Vec<String>,
    },
    Table {
        tag: String,
    },
}

/// Names declared so far in one compilation, in the order they were seen.
///
/// Fields may only reference types already present here. Redeclaring a name
/// replaces its entry.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeEntry>,
}

impl TypeRegistry {
    pub fn new() -> TypeRegistry {
        TypeRegistry::default()
    }

    pub fn declare_enum(&mut self, decl: &EnumDecl) {
        self.types.insert(
            decl.name.clone(),
            TypeEntry::Enum {
                repr:   decl.repr,
                values: decl.values.clone(),
            },
        );
    }

    pub fn declare_table(&mut self, decl: &TableDecl) {
        self.types.insert(decl.name.clone(), TypeEntry::Table { tag: decl.tag.clone() });
    }

    pub fn lookup(&self, name: &str) -> Option<&TypeEntry> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
