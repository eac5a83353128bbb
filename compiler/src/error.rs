use thiserror::Error;

#[derive(Debug, Error)]
pub enum KserialError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to match enum <name> : <byte|uint16|uint32|int16|int32> {{values}} at line {line}, column {column}: {fragment:?}")]
    EnumGrammar {
        fragment: String,
        line:     usize,
        column:   usize,
    },

    #[error("Enum {enum_name:?} has {count} values, more than {repr} can number")]
    EnumOverflow {
        enum_name: String,
        count:     usize,
        repr:      &'static str,
    },

    #[error("Invalid value name {value:?} in enum {enum_name:?}")]
    EnumValueName {
        enum_name: String,
        value:     String,
    },

    #[error("Failed to match table <name> : <tag> {{fields}} at line {line}, column {column}: {fragment:?}")]
    TableGrammar {
        fragment: String,
        line:     usize,
        column:   usize,
    },

    #[error("Failed to match '<name> : <type>' in fields of table {table:?}: {entry:?}")]
    FieldGrammar {
        table: String,
        entry: String,
    },

    #[error("Unrecognized type {type_name:?} for field {field:?} of table {table:?} - types must be declared before they are used")]
    UnknownType {
        type_name: String,
        field:     String,
        table:     String,
    },

    #[error("Field {field:?} of table {table:?} declares an array of {type_name:?}, but only arrays of tables are supported")]
    UnsupportedArray {
        type_name: String,
        field:     String,
        table:     String,
    },

    #[error("Field {field:?} of table {table:?} uses enum {enum_name:?}, which has no values")]
    EmptyEnumField {
        enum_name: String,
        field:     String,
        table:     String,
    },

    #[error("{first:?} and {second:?} in {scope} both generate the name {generated:?}")]
    NameCollision {
        scope:     String,
        first:     String,
        second:    String,
        generated: String,
    },

    #[error("Name {name:?} in {scope} has no valid form in generated code")]
    InvalidIdentifier {
        name:  String,
        scope: String,
    },
}
