//! Binary record codec for upsert payloads.
//!
//! Records are encoded positionally against a [`Schema`](upsert_types::Schema):
//! the bytes carry one optional value per declared field, in declaration
//! order, and nothing else. Decoding therefore needs the same schema the
//! writer used, and validates every value against its declared type.
//!
//! An empty byte string is never produced by [`RecordCodec::encode`]; callers
//! use it as a tombstone sentinel.

pub mod codec;
pub mod error;

pub use codec::RecordCodec;
pub use error::{CodecError, CodecResult};
