//! Schema descriptors: the ordered, typed field list a record conforms to.
//!
//! Schemas are written as Avro-style JSON:
//!
//! ```text
//! {"type":"record","name":"row","fields":[
//!   {"name":"id","type":"long"},
//!   {"name":"note","type":["null","string"]},
//!   {"name":"tags","type":{"type":"array","items":"string"}}
//! ]}
//! ```
//!
//! A two-branch union with `"null"` marks the field nullable. Arrays and maps
//! nest; their elements are never null.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{SchemaError, SchemaResult};
use crate::value::FieldValue;

/// Declared type of a field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Boolean,
    Int,
    Long,
    Float,
    Double,
    String,
    Bytes,
    Array(Box<FieldType>),
    Map(Box<FieldType>),
}

impl FieldType {
    /// Type name as written in schema JSON.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
        }
    }

    /// Returns `true` if `value` conforms to this type, recursing into
    /// array items and map values.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Self::Boolean, FieldValue::Boolean(_))
            | (Self::Int, FieldValue::Int(_))
            | (Self::Long, FieldValue::Long(_))
            | (Self::Float, FieldValue::Float(_))
            | (Self::Double, FieldValue::Double(_))
            | (Self::String, FieldValue::String(_))
            | (Self::Bytes, FieldValue::Bytes(_)) => true,
            (Self::Array(items), FieldValue::Array(values)) => {
                values.iter().all(|v| items.accepts(v))
            }
            (Self::Map(inner), FieldValue::Map(entries)) => {
                entries.values().all(|v| inner.accepts(v))
            }
            _ => false,
        }
    }

    fn primitive(name: &str) -> Option<Self> {
        Some(match name {
            "boolean" => Self::Boolean,
            "int" => Self::Int,
            "long" => Self::Long,
            "float" => Self::Float,
            "double" => Self::Double,
            "string" => Self::String,
            "bytes" => Self::Bytes,
            _ => return None,
        })
    }

    fn parse(field: &str, json: &Value) -> SchemaResult<Self> {
        let unsupported = || SchemaError::UnsupportedType {
            field: field.to_string(),
            found: json.to_string(),
        };
        match json {
            Value::String(name) => Self::primitive(name).ok_or_else(unsupported),
            Value::Object(obj) => match obj.get("type").and_then(Value::as_str) {
                Some("array") => {
                    let items = obj.get("items").ok_or_else(unsupported)?;
                    Ok(Self::Array(Box::new(Self::parse(field, items)?)))
                }
                Some("map") => {
                    let values = obj.get("values").ok_or_else(unsupported)?;
                    Ok(Self::Map(Box::new(Self::parse(field, values)?)))
                }
                Some(name) => Self::primitive(name).ok_or_else(unsupported),
                None => Err(unsupported()),
            },
            _ => Err(unsupported()),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Array(items) => json!({ "type": "array", "items": items.to_json() }),
            Self::Map(values) => json!({ "type": "map", "values": values.to_json() }),
            other => Value::String(other.name().to_string()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array(items) => write!(f, "array<{items}>"),
            Self::Map(values) => write!(f, "map<{values}>"),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// A named, typed field of a schema.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub ty: FieldType,
    /// Whether the slot may hold null.
    pub nullable: bool,
}

impl Field {
    /// A field that must always carry a value.
    pub fn required(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
        }
    }

    /// A field whose slot may be null.
    pub fn nullable(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: true,
        }
    }

    fn parse(json: &Value) -> SchemaResult<Self> {
        let name = json
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| SchemaError::MissingName(json.to_string()))?;
        let ty_json = json.get("type").ok_or_else(|| SchemaError::UnsupportedType {
            field: name.to_string(),
            found: "<missing>".to_string(),
        })?;

        if let Value::Array(branches) = ty_json {
            let non_null: Vec<&Value> = branches
                .iter()
                .filter(|b| b.as_str() != Some("null"))
                .collect();
            if branches.len() != 2 || non_null.len() != 1 {
                return Err(SchemaError::UnsupportedType {
                    field: name.to_string(),
                    found: ty_json.to_string(),
                });
            }
            return Ok(Self::nullable(name, FieldType::parse(name, non_null[0])?));
        }
        Ok(Self::required(name, FieldType::parse(name, ty_json)?))
    }

    fn to_json(&self) -> Value {
        let ty = if self.nullable {
            json!(["null", self.ty.to_json()])
        } else {
            self.ty.to_json()
        };
        json!({ "name": self.name, "type": ty })
    }
}

/// Ordered field list describing a record.
///
/// Field order drives iteration and the binary layout; names are unique.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Schema {
    name: String,
    fields: Vec<Field>,
}

impl Schema {
    /// Build a schema from parts, rejecting empty or duplicate names.
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> SchemaResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::MissingName("record".to_string()));
        }
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if field.name.is_empty() {
                return Err(SchemaError::MissingName(format!("field of {name}")));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }
        Ok(Self { name, fields })
    }

    /// Parse a schema from its JSON form.
    pub fn parse(source: &str) -> SchemaResult<Self> {
        let json: Value =
            serde_json::from_str(source).map_err(|e| SchemaError::InvalidJson(e.to_string()))?;
        let kind = json.get("type").and_then(Value::as_str).unwrap_or("<missing>");
        if kind != "record" {
            return Err(SchemaError::NotARecord(kind.to_string()));
        }
        let name = json
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let fields = json
            .get("fields")
            .and_then(Value::as_array)
            .ok_or_else(|| SchemaError::NotARecord("record without a fields array".to_string()))?
            .iter()
            .map(Field::parse)
            .collect::<SchemaResult<Vec<_>>>()?;
        Self::new(name, fields)
    }

    /// Render the canonical JSON form accepted by [`Schema::parse`].
    pub fn to_json(&self) -> String {
        let fields: Vec<Value> = self.fields.iter().map(Field::to_json).collect();
        json!({ "type": "record", "name": self.name, "fields": fields }).to_string()
    }

    /// Record name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromStr for Schema {
    type Err = SchemaError;

    fn from_str(s: &str) -> SchemaResult<Self> {
        Self::parse(s)
    }
}

/// Memoizes schema-string parsing.
///
/// A parsed schema is a pure function of its source string, so entries never
/// go stale. Parse failures are not cached.
pub struct SchemaCache {
    schemas: RwLock<HashMap<String, Arc<Schema>>>,
}

impl SchemaCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            schemas: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached schema for `source`, parsing and inserting it on a miss.
    pub fn get_or_parse(&self, source: &str) -> SchemaResult<Arc<Schema>> {
        if let Some(schema) = self.schemas.read().expect("lock poisoned").get(source) {
            return Ok(Arc::clone(schema));
        }
        let parsed = Arc::new(Schema::parse(source)?);
        let mut map = self.schemas.write().expect("lock poisoned");
        let entry = map.entry(source.to_string()).or_insert(parsed);
        Ok(Arc::clone(entry))
    }

    /// Number of cached schemas.
    pub fn len(&self) -> usize {
        self.schemas.read().expect("lock poisoned").len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached schema.
    pub fn clear(&self) {
        self.schemas.write().expect("lock poisoned").clear();
    }
}

impl Default for SchemaCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaCache")
            .field("schema_count", &self.len())
            .finish()
    }
}
