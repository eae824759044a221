use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A non-null value held in a record slot.
///
/// Nullness is not a variant: a record stores `Option<FieldValue>` per field,
/// so "present but null" and "present with a value" stay distinguishable at
/// the slot level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Array(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Short type name, matching the primitive names used in schemas.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
        }
    }

    /// Returns the boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Widen an integral value to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(i64::from(*v)),
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::Bytes(v) => write!(f, "0x{}", hex::encode(v)),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names() {
        assert_eq!(FieldValue::from(1).kind(), "int");
        assert_eq!(FieldValue::from(1i64).kind(), "long");
        assert_eq!(FieldValue::from("x").kind(), "string");
        assert_eq!(FieldValue::Array(vec![]).kind(), "array");
    }

    #[test]
    fn integral_widening() {
        assert_eq!(FieldValue::Int(7).as_i64(), Some(7));
        assert_eq!(FieldValue::Long(-3).as_i64(), Some(-3));
        assert_eq!(FieldValue::Double(1.0).as_i64(), None);
    }

    #[test]
    fn display_format() {
        assert_eq!(format!("{}", FieldValue::Bytes(vec![0xab, 0x01])), "0xab01");
        assert_eq!(format!("{}", FieldValue::from("hi")), "\"hi\"");

        let mut map = BTreeMap::new();
        map.insert("a".to_string(), FieldValue::Int(1));
        let value = FieldValue::Array(vec![FieldValue::Int(2), FieldValue::Map(map)]);
        assert_eq!(format!("{value}"), "[2, {\"a\": 1}]");
    }

    #[test]
    fn serde_roundtrip() {
        let value = FieldValue::Array(vec![FieldValue::Long(9), FieldValue::from("s")]);
        let json = serde_json::to_string(&value).unwrap();
        let parsed: FieldValue = serde_json::from_str(&json).unwrap();
        assert_eq!(value, parsed);
    }
}
