use bincode::Options;
use tracing::trace;

use upsert_types::{FieldType, FieldValue, Record, Schema};

use crate::error::{CodecError, CodecResult};

/// Codec for schema-positional record bytes.
///
/// Layout: bincode (fixed-width integers) of the sequence
/// `[Option<FieldValue>; schema.len()]` in field declaration order.
/// Trailing bytes are rejected.
pub struct RecordCodec;

impl RecordCodec {
    /// Encode `record` against `schema`.
    ///
    /// Fields absent from the record encode as null. Every value is checked
    /// against its declared type before anything is written.
    pub fn encode(record: &Record, schema: &Schema) -> CodecResult<Vec<u8>> {
        let values = record.values_in(schema);
        for (field, value) in schema.fields().iter().zip(&values) {
            check_slot(&field.name, &field.ty, field.nullable, *value)?;
        }
        options()
            .serialize(&values)
            .map_err(|e| CodecError::Serialization(e.to_string()))
    }

    /// Decode bytes produced by [`RecordCodec::encode`] with the same schema.
    ///
    /// The returned record carries every schema field, null ones included.
    pub fn decode(bytes: &[u8], schema: &Schema) -> CodecResult<Record> {
        let values: Vec<Option<FieldValue>> = options()
            .deserialize(bytes)
            .map_err(|e| CodecError::Malformed(e.to_string()))?;
        if values.len() != schema.len() {
            return Err(CodecError::FieldCount {
                expected: schema.len(),
                actual: values.len(),
            });
        }

        let mut record = Record::new();
        for (field, value) in schema.fields().iter().zip(values) {
            check_slot(&field.name, &field.ty, field.nullable, value.as_ref())?;
            record.put(field.name.clone(), value);
        }
        trace!(schema = schema.name(), bytes = bytes.len(), "decoded record");
        Ok(record)
    }
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

fn check_slot(
    name: &str,
    ty: &FieldType,
    nullable: bool,
    value: Option<&FieldValue>,
) -> CodecResult<()> {
    match value {
        None if !nullable => Err(CodecError::NullInRequiredField(name.to_string())),
        None => Ok(()),
        Some(v) if !ty.accepts(v) => Err(CodecError::TypeMismatch {
            field: name.to_string(),
            expected: ty.to_string(),
            actual: v.kind().to_string(),
        }),
        Some(_) => Ok(()),
    }
}
