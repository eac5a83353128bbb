use serde::Serialize;

/// The fixed-width integer kinds a field or an enum can be stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntKind {
    Byte,
    Int16,
    Uint16,
    Int32,
    Uint32,
}

impl IntKind {
    pub const ALL: [IntKind; 5] = [
        IntKind::Byte,
        IntKind::Int16,
        IntKind::Uint16,
        IntKind::Int32,
        IntKind::Uint32,
    ];

    pub fn from_keyword(keyword: &str) -> Option<IntKind> {
        IntKind::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            IntKind::Byte   => "byte",
            IntKind::Int16  => "int16",
            IntKind::Uint16 => "uint16",
            IntKind::Int32  => "int32",
            IntKind::Uint32 => "uint32",
        }
    }

    /// How many enum values fit: values are numbered from 0 and must stay
    /// non-negative.
    pub fn value_capacity(self) -> u64 {
        match self {
            IntKind::Byte   => 1 << 8,
            IntKind::Int16  => 1 << 15,
            IntKind::Uint16 => 1 << 16,
            IntKind::Int32  => 1 << 31,
            IntKind::Uint32 => 1 << 32,
        }
    }

    /// Width in bytes.
    pub fn width(self) -> usize {
        match self {
            IntKind::Byte                    => 1,
            IntKind::Int16 | IntKind::Uint16 => 2,
            IntKind::Int32 | IntKind::Uint32 => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Declaration {
    Enum(EnumDecl),
    Table(TableDecl),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Enum(decl)  => &decl.name,
            Declaration::Table(decl) => &decl.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumDecl {
    pub name:   String,
    pub line:   usize,
    pub column: usize,
    pub repr:   IntKind,
    /// Value names in declaration order; the value at index `i` encodes as `i`.
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDecl {
    pub name:   String,
    pub line:   usize,
    pub column: usize,
    pub tag:    String,
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDecl {
    pub name:      String,
    pub line:      usize,
    pub column:    usize,
    pub type_name: String,
    pub is_array:  bool,
}
