//! Foundation types for record-level upsert merging.
//!
//! Every other upsert crate depends on `upsert-types`. The types here are
//! deliberately plain: they carry no merge policy of their own.
//!
//! # Key Types
//!
//! - [`FieldValue`] — Scalar or structured value stored in a record slot
//! - [`OrderingValue`] — Totally ordered key deciding which version is latest
//! - [`Schema`] / [`Field`] / [`FieldType`] — Ordered, typed field list parsed from JSON
//! - [`Record`] — Decoded record: field name to optional value
//! - [`SchemaCache`] — Memoized schema-string parsing

pub mod error;
pub mod ordering;
pub mod record;
pub mod schema;
pub mod value;

pub use error::{SchemaError, SchemaResult};
pub use ordering::OrderingValue;
pub use record::Record;
pub use schema::{Field, FieldType, Schema, SchemaCache};
pub use value::FieldValue;
