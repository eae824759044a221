//! Partial-overwrite merge payload for upsert storage engines.
//!
//! A [`MergePayload`] is one pending write for a record key. The storage
//! engine merges payloads at two points:
//!
//! - before a write batch is persisted, duplicate writes for the same key are
//!   collapsed with [`MergePayload::pre_combine`];
//! - when a stored record is overlaid with a newer write,
//!   [`MergePayload::combine_and_get_update_value`] patches it.
//!
//! Both follow the same rule: a null incoming field never overwrites a
//! present value, and the ordering value only decides between two present
//! values (see [`merge_value`]).
//!
//! # Key Types
//!
//! - [`MergePayload`] -- Encoded record + ordering value + optional schema
//! - [`Reconciliation`] -- Explicit outcome of reconciling two payloads
//! - [`DeleteMarker`] / [`DeleteFlag`] -- Delete detection over decoded records
//! - [`PayloadConfig`] / [`PayloadFactory`] -- Configured payload construction

pub mod config;
pub mod delete;
pub mod error;
pub mod factory;
pub mod payload;
pub mod strategy;

pub use config::{PayloadConfig, PayloadContext};
pub use delete::{DeleteFlag, DeleteMarker, DEFAULT_DELETE_FIELD};
pub use error::{PayloadError, PayloadResult};
pub use factory::PayloadFactory;
pub use payload::{FallbackReason, KeepReason, MergePayload, Reconciliation};
pub use strategy::{is_strictly_newer, latest_wins, merge_value, newest_first, Side};
