use upsert_types::Record;

/// Field checked by [`DeleteFlag::default`].
pub const DEFAULT_DELETE_FIELD: &str = "_is_deleted";

/// Predicate recognizing a decoded record as a delete marker.
pub trait DeleteMarker: Send + Sync {
    /// Returns `true` if `record` represents deletion of its key.
    fn is_delete(&self, record: &Record) -> bool;
}

impl<F> DeleteMarker for F
where
    F: Fn(&Record) -> bool + Send + Sync,
{
    fn is_delete(&self, record: &Record) -> bool {
        self(record)
    }
}

/// Treats a record as deleted when a boolean field is `true`.
///
/// A missing, null, or non-boolean flag means "not deleted".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteFlag {
    field: String,
}

impl DeleteFlag {
    /// Check the given field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Name of the flag field.
    pub fn field(&self) -> &str {
        &self.field
    }
}

impl Default for DeleteFlag {
    fn default() -> Self {
        Self::new(DEFAULT_DELETE_FIELD)
    }
}

impl DeleteMarker for DeleteFlag {
    fn is_delete(&self, record: &Record) -> bool {
        record
            .get(&self.field)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}
