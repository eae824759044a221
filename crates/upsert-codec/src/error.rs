//! Error types for the codec crate.

/// Errors that can occur while encoding or decoding a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The bytes are not a valid encoding (truncated, garbage, trailing data).
    #[error("malformed record bytes: {0}")]
    Malformed(String),

    /// The encoded value count disagrees with the schema.
    #[error("field count mismatch: schema declares {expected}, bytes carry {actual}")]
    FieldCount { expected: usize, actual: usize },

    /// A value does not conform to its field's declared type.
    #[error("type mismatch for field {field}: expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    /// A non-nullable field holds null or is missing.
    #[error("field {0} is not nullable but has no value")]
    NullInRequiredField(String),

    /// Serialization failure while encoding.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for codec results.
pub type CodecResult<T> = Result<T, CodecError>;
