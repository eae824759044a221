use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// Totally ordered key used to decide which of two versions is newer.
///
/// Typically a timestamp or a version counter. Values of different kinds
/// still compare (all `Int` sort before all `Text`), so the order is total
/// even when writers disagree on the ordering column's type.
///
/// Ordering: variant → value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OrderingValue {
    Int(i64),
    Text(String),
}

impl OrderingValue {
    /// Ordering assigned to payloads built without an explicit ordering.
    pub const fn natural() -> Self {
        Self::Int(0)
    }

    /// Derive an ordering value from a record field.
    ///
    /// Integral and string values are orderable; everything else yields `None`.
    pub fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::String(s) => Some(Self::Text(s.clone())),
            other => other.as_i64().map(Self::Int),
        }
    }

    /// Returns `true` if this value is strictly greater than `other`.
    pub fn is_after(&self, other: &Self) -> bool {
        self > other
    }
}

impl Default for OrderingValue {
    fn default() -> Self {
        Self::natural()
    }
}

impl From<i64> for OrderingValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for OrderingValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<&str> for OrderingValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for OrderingValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl fmt::Display for OrderingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
        }
    }
}
