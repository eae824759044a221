use upsert_codec::CodecError;
use upsert_types::SchemaError;

/// Errors from payload construction and merging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// Record bytes could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// A schema string handed to the factory could not be parsed.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The configured ordering field cannot yield an ordering value.
    #[error("ordering field {field}: {reason}")]
    OrderingField { field: String, reason: String },

    /// Invalid payload configuration.
    #[error("invalid config: {0}")]
    Config(String),
}

/// Result alias for payload operations.
pub type PayloadResult<T> = Result<T, PayloadError>;
