use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use upsert_codec::RecordCodec;
use upsert_types::{OrderingValue, Record, Schema, SchemaError};

use crate::config::PayloadContext;
use crate::error::PayloadResult;
use crate::strategy::{is_strictly_newer, latest_wins, merge_value, newest_first, Side};

/// Why [`MergePayload::reconcile`] degraded to an ordering-only choice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    /// The given side carries no schema string.
    MissingSchema(Side),
    /// The given side's schema string does not parse.
    UnparseableSchema { side: Side, error: SchemaError },
}

/// Why a reconciliation kept one payload whole instead of merging fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeepReason {
    /// The other side's insert view is a delete marker.
    OtherDeleted,
    /// The current side's insert view is a delete marker.
    CurrentDeleted,
    /// Only the kept side has an insert view.
    OnlyPresent,
    /// Neither side has an insert view.
    BothAbsent,
}

/// Outcome of reconciling two payloads for the same key.
#[derive(Clone, Debug, PartialEq)]
pub enum Reconciliation {
    /// Fields of both sides were merged into a new payload.
    Merged(MergePayload),
    /// One side is kept unchanged.
    Keep(Side, KeepReason),
    /// Field-aware merging is impossible; resolve by ordering alone.
    Fallback(FallbackReason),
}

/// A pending write for one record key.
///
/// Holds the encoded record (empty bytes are the tombstone sentinel), the
/// ordering value that decides recency, and optionally the schema JSON the
/// bytes were written with. Without a schema only ordering-based merging is
/// possible.
///
/// Payloads are logically immutable; both merge operations consume their
/// inputs and return fresh values.
#[derive(Clone)]
pub struct MergePayload {
    record_bytes: Vec<u8>,
    ordering: OrderingValue,
    schema: Option<Arc<str>>,
    deleted: bool,
    context: Arc<PayloadContext>,
}

impl MergePayload {
    /// Wrap already-encoded bytes. Empty bytes make a tombstone.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>, ordering: impl Into<OrderingValue>) -> Self {
        let record_bytes = bytes.into();
        Self {
            deleted: record_bytes.is_empty(),
            record_bytes,
            ordering: ordering.into(),
            schema: None,
            context: Arc::default(),
        }
    }

    /// Encode `record` with `schema` and remember the schema JSON.
    pub fn from_record(
        record: &Record,
        schema: &Schema,
        ordering: impl Into<OrderingValue>,
    ) -> PayloadResult<Self> {
        Self::encode_in(Arc::default(), record, schema, ordering.into())
    }

    /// A delete payload with no record bytes.
    pub fn tombstone(ordering: impl Into<OrderingValue>) -> Self {
        Self::from_bytes(Vec::new(), ordering)
    }

    /// A payload with the natural ordering; `None` builds a tombstone.
    pub fn natural(record: Option<&Record>, schema: &Schema) -> PayloadResult<Self> {
        match record {
            Some(record) => Self::from_record(record, schema, OrderingValue::natural()),
            None => Ok(Self::tombstone(OrderingValue::natural())),
        }
    }

    pub(crate) fn encode_in(
        context: Arc<PayloadContext>,
        record: &Record,
        schema: &Schema,
        ordering: OrderingValue,
    ) -> PayloadResult<Self> {
        let record_bytes = RecordCodec::encode(record, schema)?;
        Ok(Self {
            deleted: context.is_delete(record),
            record_bytes,
            ordering,
            schema: Some(Arc::from(schema.to_json())),
            context,
        })
    }

    /// Attach a schema JSON string.
    pub fn with_schema(mut self, schema: impl Into<Arc<str>>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Share a context (delete predicate, schema cache) with other payloads.
    pub fn with_context(mut self, context: Arc<PayloadContext>) -> Self {
        self.context = context;
        self
    }

    pub fn ordering(&self) -> &OrderingValue {
        &self.ordering
    }

    pub fn record_bytes(&self) -> &[u8] {
        &self.record_bytes
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn context(&self) -> &Arc<PayloadContext> {
        &self.context
    }

    /// Returns `true` for the empty-bytes sentinel.
    pub fn is_tombstone(&self) -> bool {
        self.record_bytes.is_empty()
    }

    /// Whether the payload was a delete when it was built: a tombstone, or a
    /// record the delete predicate matched.
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// The record as a fresh insert, decoded with `schema`.
    ///
    /// `Ok(None)` for tombstones; malformed bytes are an error.
    pub fn insert_view(&self, schema: &Schema) -> PayloadResult<Option<Record>> {
        if self.record_bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(RecordCodec::decode(&self.record_bytes, schema)?))
    }

    /// Apply this payload on top of a stored record.
    ///
    /// Every non-null incoming field overwrites the stored value; null
    /// incoming fields leave it untouched. Returns `Ok(None)` when this
    /// payload is a tombstone or decodes to a delete marker, meaning no
    /// updated record should be written.
    pub fn combine_and_get_update_value(
        &self,
        mut current: Record,
        schema: &Schema,
    ) -> PayloadResult<Option<Record>> {
        if self.record_bytes.is_empty() {
            debug!(ordering = %self.ordering, "tombstone payload, no update value");
            return Ok(None);
        }

        let mut incoming = RecordCodec::decode(&self.record_bytes, schema)?;
        if self.context.is_delete(&incoming) {
            debug!(ordering = %self.ordering, "incoming record is a delete marker");
            return Ok(None);
        }

        for name in schema.field_names() {
            if let Some(Some(value)) = incoming.remove(name) {
                current.put(name, Some(value));
            }
        }
        Ok(Some(current))
    }

    /// Whole-record replacement: the insert view, unless it is a delete.
    ///
    /// This is the latest-wins counterpart of
    /// [`combine_and_get_update_value`](Self::combine_and_get_update_value);
    /// the stored record is ignored entirely.
    pub fn replace_update_value(&self, schema: &Schema) -> PayloadResult<Option<Record>> {
        Ok(self
            .insert_view(schema)?
            .filter(|record| !self.context.is_delete(record)))
    }

    /// Decide how `self` and `other`, two writes for the same key, combine.
    ///
    /// Field-level merging needs both schemas to be present and parseable;
    /// otherwise the result is [`Reconciliation::Fallback`]. Decode errors in
    /// either insert view are returned as errors.
    pub fn reconcile(&self, other: &MergePayload) -> PayloadResult<Reconciliation> {
        let (Some(current_src), Some(other_src)) = (self.schema(), other.schema()) else {
            let side = if self.schema.is_none() {
                Side::Current
            } else {
                Side::Other
            };
            debug!(%side, "no schema, falling back to latest-wins");
            return Ok(Reconciliation::Fallback(FallbackReason::MissingSchema(side)));
        };

        let current_schema = match self.context.parse_schema(current_src) {
            Ok(schema) => schema,
            Err(error) => return Ok(unparseable(Side::Current, error)),
        };
        let other_schema = match other.context.parse_schema(other_src) {
            Ok(schema) => schema,
            Err(error) => return Ok(unparseable(Side::Other, error)),
        };

        let current_view = self.insert_view(&current_schema)?;
        let other_view = other.insert_view(&other_schema)?;

        let (mut merged, other_record) = match (current_view, other_view) {
            (Some(current), Some(other_record)) => (current, other_record),
            (None, Some(_)) => {
                debug!("current side has no insert view, keeping other");
                return Ok(Reconciliation::Keep(Side::Other, KeepReason::OnlyPresent));
            }
            (Some(_), None) => {
                debug!("other side has no insert view, keeping current");
                return Ok(Reconciliation::Keep(Side::Current, KeepReason::OnlyPresent));
            }
            (None, None) => {
                return Ok(Reconciliation::Keep(Side::Current, KeepReason::BothAbsent));
            }
        };

        if other.context.is_delete(&other_record) {
            debug!("other side is a delete marker, keeping current");
            return Ok(Reconciliation::Keep(Side::Current, KeepReason::OtherDeleted));
        }
        if self.context.is_delete(&merged) {
            debug!("current side is a delete marker, keeping other");
            return Ok(Reconciliation::Keep(Side::Other, KeepReason::CurrentDeleted));
        }

        let choose_current = is_strictly_newer(&self.ordering, &other.ordering);
        for name in current_schema.field_names() {
            let mine = merged.remove(name).flatten();
            let theirs = other_record.get(name).cloned();
            merged.put(name, merge_value(mine, theirs, choose_current));
        }
        trace!(fields = current_schema.len(), choose_current, "merged fields");

        let ordering = if choose_current {
            self.ordering.clone()
        } else {
            other.ordering.clone()
        };
        let record_bytes = RecordCodec::encode(&merged, &current_schema)?;
        Ok(Reconciliation::Merged(MergePayload {
            record_bytes,
            ordering,
            schema: self.schema.clone(),
            deleted: false,
            context: Arc::clone(&self.context),
        }))
    }

    /// Collapse two writes for the same key into one.
    ///
    /// Non-null fields of both sides survive; where both carry a value the
    /// strictly higher ordering wins, and ties favor `other`. Delete markers
    /// are never field-merged: the non-deleted side is returned whole. When
    /// either schema is absent or unparseable, the payload with the strictly
    /// higher ordering is returned (ties keep `self`).
    pub fn pre_combine(self, other: MergePayload) -> PayloadResult<MergePayload> {
        let side = match self.reconcile(&other)? {
            Reconciliation::Merged(merged) => return Ok(merged),
            Reconciliation::Keep(side, _) => side,
            Reconciliation::Fallback(_) => latest_wins(&self.ordering, &other.ordering),
        };
        Ok(match side {
            Side::Current => self,
            Side::Other => other,
        })
    }

    /// Compare by ordering value, newest first: `Less` when `self` is newer.
    ///
    /// Sorting a batch with this comparator puts the latest write at the front.
    pub fn compare_to(&self, other: &MergePayload) -> Ordering {
        newest_first(&self.ordering, &other.ordering)
    }

    /// Ordering-only combination, ignoring record contents.
    pub fn latest_wins(self, other: MergePayload) -> MergePayload {
        match latest_wins(&self.ordering, &other.ordering) {
            Side::Current => self,
            Side::Other => other,
        }
    }
}

fn unparseable(side: Side, error: SchemaError) -> Reconciliation {
    warn!(%side, %error, "schema does not parse, falling back to latest-wins");
    Reconciliation::Fallback(FallbackReason::UnparseableSchema { side, error })
}

impl PartialEq for MergePayload {
    fn eq(&self, other: &Self) -> bool {
        self.record_bytes == other.record_bytes
            && self.ordering == other.ordering
            && self.schema == other.schema
            && self.deleted == other.deleted
    }
}

impl fmt::Debug for MergePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergePayload")
            .field("record_len", &self.record_bytes.len())
            .field("ordering", &self.ordering)
            .field("has_schema", &self.schema.is_some())
            .field("deleted", &self.deleted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use upsert_types::{Field, FieldType, FieldValue};

    use crate::delete::DEFAULT_DELETE_FIELD;

    fn int_schema(names: &[&str]) -> Schema {
        let fields = names
            .iter()
            .map(|n| Field::nullable(*n, FieldType::Int))
            .collect();
        Schema::new("row", fields).unwrap()
    }

    fn row(schema: &Schema, values: &[Option<i32>]) -> Record {
        schema
            .field_names()
            .zip(values)
            .map(|(name, v)| (name, v.map(FieldValue::Int)))
            .collect()
    }

    fn deletable_schema() -> Schema {
        Schema::new(
            "row",
            vec![
                Field::required("id", FieldType::Long),
                Field::nullable("v", FieldType::Int),
                Field::nullable(DEFAULT_DELETE_FIELD, FieldType::Boolean),
            ],
        )
        .unwrap()
    }

    fn view(payload: &MergePayload, schema: &Schema) -> Record {
        payload.insert_view(schema).unwrap().expect("insert view")
    }

    // -----------------------------------------------------------------------
    // combine_and_get_update_value
    // -----------------------------------------------------------------------

    #[test]
    fn null_incoming_fields_do_not_overwrite() {
        let schema = int_schema(&["f0", "f1", "f2"]);
        let stored = row(&schema, &[Some(1), Some(2), Some(3)]);
        let incoming =
            MergePayload::from_record(&row(&schema, &[Some(4), Some(5), None]), &schema, 2)
                .unwrap();

        let merged = incoming
            .combine_and_get_update_value(stored, &schema)
            .unwrap()
            .unwrap();
        assert_eq!(merged, row(&schema, &[Some(4), Some(5), Some(3)]));
    }

    #[test]
    fn tombstone_yields_no_update() {
        let schema = int_schema(&["f0"]);
        let stored = row(&schema, &[Some(1)]);
        let result = MergePayload::tombstone(9)
            .combine_and_get_update_value(stored, &schema)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn delete_marker_yields_no_update() {
        let schema = deletable_schema();
        let stored = Record::new().with("id", 1i64).with("v", 1);
        let delete = Record::new().with("id", 1i64).with(DEFAULT_DELETE_FIELD, true);
        let payload = MergePayload::from_record(&delete, &schema, 5).unwrap();
        assert!(payload.is_deleted());
        assert!(payload
            .combine_and_get_update_value(stored, &schema)
            .unwrap()
            .is_none());
    }

    #[test]
    fn malformed_bytes_are_fatal_on_update() {
        let schema = int_schema(&["f0"]);
        let payload = MergePayload::from_bytes(vec![0xff, 0x01], 1);
        let err = payload
            .combine_and_get_update_value(row(&schema, &[Some(1)]), &schema)
            .unwrap_err();
        assert!(matches!(err, crate::PayloadError::Codec(_)));
    }

    #[test]
    fn update_adds_fields_missing_from_stored_record() {
        let schema = int_schema(&["f0", "f1"]);
        let stored = Record::new().with("f0", 1);
        let payload =
            MergePayload::from_record(&row(&schema, &[None, Some(7)]), &schema, 1).unwrap();
        let merged = payload
            .combine_and_get_update_value(stored, &schema)
            .unwrap()
            .unwrap();
        assert_eq!(merged.get("f0"), Some(&FieldValue::Int(1)));
        assert_eq!(merged.get("f1"), Some(&FieldValue::Int(7)));
    }

    #[test]
    fn replace_update_returns_whole_record() {
        let schema = int_schema(&["f0", "f1"]);
        let payload =
            MergePayload::from_record(&row(&schema, &[Some(4), None]), &schema, 1).unwrap();
        let replaced = payload.replace_update_value(&schema).unwrap().unwrap();
        assert_eq!(replaced, row(&schema, &[Some(4), None]));

        assert!(MergePayload::tombstone(1)
            .replace_update_value(&schema)
            .unwrap()
            .is_none());
    }

    #[test]
    fn replace_update_drops_delete_markers() {
        let schema = deletable_schema();
        let delete = Record::new().with("id", 1i64).with(DEFAULT_DELETE_FIELD, true);
        let payload = MergePayload::from_record(&delete, &schema, 1).unwrap();
        assert!(payload.replace_update_value(&schema).unwrap().is_none());
    }

    // -----------------------------------------------------------------------
    // pre_combine
    // -----------------------------------------------------------------------

    #[test]
    fn pre_combine_merges_non_null_fields() {
        let schema = int_schema(&["f0", "f1", "f2", "o1"]);
        let p1 = MergePayload::from_record(
            &row(&schema, &[Some(1), None, Some(1), Some(1)]),
            &schema,
            1,
        )
        .unwrap();
        let p2 = MergePayload::from_record(
            &row(&schema, &[Some(2), Some(2), None, Some(2)]),
            &schema,
            2,
        )
        .unwrap();

        let merged = p1.pre_combine(p2).unwrap();
        assert_eq!(merged.ordering(), &OrderingValue::from(2));
        assert_eq!(
            view(&merged, &schema),
            row(&schema, &[Some(2), Some(2), Some(1), Some(2)])
        );
    }

    #[test]
    fn pre_combine_tie_favors_other() {
        let schema = int_schema(&["f0"]);
        let a = MergePayload::from_record(&row(&schema, &[Some(1)]), &schema, 5).unwrap();
        let b = MergePayload::from_record(&row(&schema, &[Some(2)]), &schema, 5).unwrap();
        let merged = a.pre_combine(b).unwrap();
        assert_eq!(view(&merged, &schema), row(&schema, &[Some(2)]));
    }

    #[test]
    fn pre_combine_keeps_current_schema_string() {
        let schema = int_schema(&["f0"]);
        let a = MergePayload::from_record(&row(&schema, &[Some(1)]), &schema, 1).unwrap();
        let b = MergePayload::from_record(&row(&schema, &[Some(2)]), &schema, 2)
            .unwrap()
            .with_schema(format!("  {}", schema.to_json()));
        let expected = a.schema().map(str::to_owned);
        let merged = a.pre_combine(b).unwrap();
        assert_eq!(merged.schema().map(str::to_owned), expected);
        assert!(!merged.is_deleted());
    }

    #[test]
    fn pre_combine_other_delete_keeps_current() {
        let schema = deletable_schema();
        let live = Record::new().with("id", 1i64).with("v", 3);
        let delete = Record::new().with("id", 1i64).with(DEFAULT_DELETE_FIELD, true);
        let current = MergePayload::from_record(&live, &schema, 1).unwrap();
        let other = MergePayload::from_record(&delete, &schema, 9).unwrap();

        assert_eq!(
            current.reconcile(&other).unwrap(),
            Reconciliation::Keep(Side::Current, KeepReason::OtherDeleted)
        );
        let kept = current.clone().pre_combine(other).unwrap();
        assert_eq!(kept, current);
    }

    #[test]
    fn pre_combine_current_delete_keeps_other() {
        let schema = deletable_schema();
        let live = Record::new().with("id", 1i64).with("v", 3);
        let delete = Record::new().with("id", 1i64).with(DEFAULT_DELETE_FIELD, true);
        let current = MergePayload::from_record(&delete, &schema, 9).unwrap();
        let other = MergePayload::from_record(&live, &schema, 1).unwrap();

        let kept = current.pre_combine(other.clone()).unwrap();
        assert_eq!(kept, other);
        assert_eq!(kept.ordering(), &OrderingValue::from(1));
    }

    #[test]
    fn pre_combine_both_deleted_keeps_current() {
        let schema = deletable_schema();
        let delete = Record::new().with("id", 1i64).with(DEFAULT_DELETE_FIELD, true);
        let current = MergePayload::from_record(&delete, &schema, 1).unwrap();
        let other = MergePayload::from_record(&delete, &schema, 2).unwrap();
        let kept = current.clone().pre_combine(other).unwrap();
        assert_eq!(kept, current);
    }

    #[test]
    fn pre_combine_presence_rule() {
        let schema = int_schema(&["f0"]);
        let live = MergePayload::from_record(&row(&schema, &[Some(1)]), &schema, 1).unwrap();
        let gone = MergePayload::tombstone(7).with_schema(schema.to_json());

        assert_eq!(
            gone.reconcile(&live).unwrap(),
            Reconciliation::Keep(Side::Other, KeepReason::OnlyPresent)
        );
        assert_eq!(gone.clone().pre_combine(live.clone()).unwrap(), live);
        assert_eq!(live.clone().pre_combine(gone.clone()).unwrap(), live);

        let also_gone = MergePayload::tombstone(9).with_schema(schema.to_json());
        assert_eq!(
            gone.reconcile(&also_gone).unwrap(),
            Reconciliation::Keep(Side::Current, KeepReason::BothAbsent)
        );
        assert_eq!(gone.clone().pre_combine(also_gone).unwrap(), gone);
    }

    #[test]
    fn pre_combine_without_schema_is_latest_wins() {
        let schema = int_schema(&["f0"]);
        let with_schema =
            MergePayload::from_record(&row(&schema, &[Some(1)]), &schema, 1).unwrap();
        let bare = MergePayload::from_bytes(with_schema.record_bytes().to_vec(), 2);

        assert_eq!(
            with_schema.reconcile(&bare).unwrap(),
            Reconciliation::Fallback(FallbackReason::MissingSchema(Side::Other))
        );
        let winner = with_schema.clone().pre_combine(bare.clone()).unwrap();
        assert_eq!(winner, bare);

        let tie = MergePayload::from_bytes(vec![1], 1);
        let kept = with_schema.clone().pre_combine(tie).unwrap();
        assert_eq!(kept, with_schema);
    }

    #[test]
    fn fallback_prefers_newer_tombstone() {
        let schema = int_schema(&["f0"]);
        let live = MergePayload::from_record(&row(&schema, &[Some(1)]), &schema, 1).unwrap();
        let gone = MergePayload::tombstone(5);

        assert_eq!(
            live.reconcile(&gone).unwrap(),
            Reconciliation::Fallback(FallbackReason::MissingSchema(Side::Other))
        );
        assert_eq!(live.clone().pre_combine(gone.clone()).unwrap(), gone);
        assert_eq!(gone.clone().pre_combine(live.clone()).unwrap(), gone);
    }

    #[test]
    fn compare_to_sorts_newest_first() {
        let mut batch = vec![
            MergePayload::from_bytes(vec![1], 2),
            MergePayload::from_bytes(vec![2], 7),
            MergePayload::from_bytes(vec![3], 4),
        ];
        batch.sort_by(|a, b| a.compare_to(b));
        let orderings: Vec<_> = batch.iter().map(|p| p.ordering().clone()).collect();
        assert_eq!(
            orderings,
            vec![OrderingValue::Int(7), OrderingValue::Int(4), OrderingValue::Int(2)]
        );

        let a = MergePayload::from_bytes(vec![1], 3);
        let b = MergePayload::from_bytes(vec![2], 3);
        assert_eq!(a.compare_to(&b), Ordering::Equal);
    }

    #[test]
    fn pre_combine_unparseable_schema_is_latest_wins() {
        let schema = int_schema(&["f0"]);
        let good = MergePayload::from_record(&row(&schema, &[Some(1)]), &schema, 3).unwrap();
        let bad = MergePayload::from_record(&row(&schema, &[None]), &schema, 2)
            .unwrap()
            .with_schema("{not a schema");

        let outcome = good.reconcile(&bad).unwrap();
        assert!(matches!(
            outcome,
            Reconciliation::Fallback(FallbackReason::UnparseableSchema {
                side: Side::Other,
                ..
            })
        ));
        assert_eq!(good.clone().pre_combine(bad.clone()).unwrap(), good);
        assert_eq!(bad.clone().pre_combine(good.clone()).unwrap(), good);
    }

    #[test]
    fn pre_combine_decode_failure_is_fatal() {
        let schema = int_schema(&["f0"]);
        let good = MergePayload::from_record(&row(&schema, &[Some(1)]), &schema, 1).unwrap();
        let corrupt = MergePayload::from_bytes(vec![0xde, 0xad], 2).with_schema(schema.to_json());
        assert!(good.pre_combine(corrupt).is_err());
    }

    #[test]
    fn pre_combine_with_shared_cache() {
        let schema = int_schema(&["f0", "f1"]);
        let context = Arc::new(PayloadContext::default().with_schema_cache());
        let a = MergePayload::from_record(&row(&schema, &[Some(1), None]), &schema, 1)
            .unwrap()
            .with_context(Arc::clone(&context));
        let b = MergePayload::from_record(&row(&schema, &[None, Some(2)]), &schema, 2)
            .unwrap()
            .with_context(Arc::clone(&context));

        let merged = a.pre_combine(b).unwrap();
        assert_eq!(view(&merged, &schema), row(&schema, &[Some(1), Some(2)]));
        assert_eq!(context.schema_cache().map(|c| c.len()), Some(1));
    }

    #[test]
    fn latest_wins_ignores_contents() {
        let a = MergePayload::from_bytes(vec![1], 1);
        let b = MergePayload::from_bytes(vec![2], 2);
        assert_eq!(a.clone().latest_wins(b.clone()), b);
        assert_eq!(b.clone().latest_wins(a), b);
    }

    #[test]
    fn natural_payloads() {
        let schema = int_schema(&["f0"]);
        let live = MergePayload::natural(Some(&row(&schema, &[Some(1)])), &schema).unwrap();
        assert_eq!(live.ordering(), &OrderingValue::natural());
        assert!(!live.is_deleted());

        let gone = MergePayload::natural(None, &schema).unwrap();
        assert!(gone.is_tombstone());
        assert!(gone.is_deleted());
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    fn values() -> impl Strategy<Value = Vec<Option<i32>>> {
        proptest::collection::vec(proptest::option::of(any::<i32>()), 4)
    }

    proptest! {
        #[test]
        fn all_null_update_is_identity(stored in values()) {
            let schema = int_schema(&["a", "b", "c", "d"]);
            let current = row(&schema, &stored);
            let payload =
                MergePayload::from_record(&Record::nulls(&schema), &schema, 1).unwrap();
            let result = payload
                .combine_and_get_update_value(current.clone(), &schema)
                .unwrap();
            prop_assert_eq!(result, Some(current));
        }

        #[test]
        fn tombstone_update_is_none(stored in values(), ordering in any::<i64>()) {
            let schema = int_schema(&["a", "b", "c", "d"]);
            let result = MergePayload::tombstone(ordering)
                .combine_and_get_update_value(row(&schema, &stored), &schema)
                .unwrap();
            prop_assert!(result.is_none());
        }

        #[test]
        fn pre_combine_is_commutative(
            left in values(),
            right in values(),
            (o1, o2) in (any::<i64>(), any::<i64>()).prop_filter("distinct", |(a, b)| a != b),
        ) {
            let schema = int_schema(&["a", "b", "c", "d"]);
            let p1 = MergePayload::from_record(&row(&schema, &left), &schema, o1).unwrap();
            let p2 = MergePayload::from_record(&row(&schema, &right), &schema, o2).unwrap();

            let ab = p1.clone().pre_combine(p2.clone()).unwrap();
            let ba = p2.pre_combine(p1).unwrap();
            prop_assert_eq!(ab.ordering(), ba.ordering());
            prop_assert_eq!(view(&ab, &schema), view(&ba, &schema));
        }
    }
}
