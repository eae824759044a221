use thiserror::Error;

/// Errors produced while parsing a schema descriptor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("invalid schema JSON: {0}")]
    InvalidJson(String),

    #[error("top-level schema must be a record, got {0}")]
    NotARecord(String),

    #[error("missing or empty name in {0}")]
    MissingName(String),

    #[error("duplicate field name: {0}")]
    DuplicateField(String),

    #[error("unsupported type for field {field}: {found}")]
    UnsupportedType { field: String, found: String },
}

/// Result alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
