use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::Schema;
use crate::value::FieldValue;

/// A decoded record: field name to optional value.
///
/// A field mapped to `None` is present but null, which is not the same as a
/// field that is absent from the record. Decoded records always carry every
/// field their schema declares.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    values: BTreeMap<String, Option<FieldValue>>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// A record with every field of `schema` present and null.
    pub fn nulls(schema: &Schema) -> Self {
        Self {
            values: schema.field_names().map(|n| (n.to_string(), None)).collect(),
        }
    }

    /// Builder-style [`Record::put`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.put(name, Some(value.into()));
        self
    }

    /// Builder-style [`Record::put_null`].
    pub fn with_null(mut self, name: impl Into<String>) -> Self {
        self.put_null(name);
        self
    }

    /// The value of `name`, or `None` if the field is null or absent.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name).and_then(Option::as_ref)
    }

    /// Set a field, replacing any previous value. Returns the previous slot.
    pub fn put(
        &mut self,
        name: impl Into<String>,
        value: Option<FieldValue>,
    ) -> Option<Option<FieldValue>> {
        self.values.insert(name.into(), value)
    }

    /// Set a field to null.
    pub fn put_null(&mut self, name: impl Into<String>) {
        self.values.insert(name.into(), None);
    }

    /// Returns `true` if the field is present, null or not.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns `true` if the field is present and null.
    pub fn is_null(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(None))
    }

    /// Remove a field entirely.
    pub fn remove(&mut self, name: &str) -> Option<Option<FieldValue>> {
        self.values.remove(name)
    }

    /// Number of present fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no fields are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate present fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&FieldValue>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Values of `schema`'s fields in declaration order.
    pub fn values_in(&self, schema: &Schema) -> Vec<Option<&FieldValue>> {
        schema.field_names().map(|n| self.get(n)).collect()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<FieldValue>)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Option<FieldValue>)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
