use std::sync::Arc;

use tracing::debug;
use upsert_types::{OrderingValue, Record, Schema};

use crate::config::{PayloadConfig, PayloadContext};
use crate::error::{PayloadError, PayloadResult};
use crate::payload::MergePayload;

/// Builds payloads that share one configuration and context.
///
/// Payloads from the same factory share the delete predicate and, when
/// enabled, the schema cache.
#[derive(Debug)]
pub struct PayloadFactory {
    config: PayloadConfig,
    context: Arc<PayloadContext>,
}

impl PayloadFactory {
    pub fn new(config: PayloadConfig) -> Self {
        let context = Arc::new(PayloadContext::from_config(&config));
        Self { config, context }
    }

    pub fn config(&self) -> &PayloadConfig {
        &self.config
    }

    pub fn context(&self) -> &Arc<PayloadContext> {
        &self.context
    }

    /// Parse a schema string through the shared context.
    ///
    /// Unlike merging, which degrades to latest-wins on a bad schema, this is
    /// the write path's entry point and reports the parse failure.
    pub fn parse_schema(&self, source: &str) -> PayloadResult<Arc<Schema>> {
        Ok(self.context.parse_schema(source)?)
    }

    /// Build a payload for `record`, taking its ordering value from the
    /// configured ordering field (natural ordering when none is configured).
    pub fn create(&self, record: &Record, schema: &Schema) -> PayloadResult<MergePayload> {
        let ordering = self.ordering_of(record)?;
        self.create_with_ordering(record, schema, ordering)
    }

    /// Build a payload with an explicit ordering value.
    pub fn create_with_ordering(
        &self,
        record: &Record,
        schema: &Schema,
        ordering: impl Into<OrderingValue>,
    ) -> PayloadResult<MergePayload> {
        MergePayload::encode_in(Arc::clone(&self.context), record, schema, ordering.into())
    }

    /// Wrap already-encoded bytes written with `schema`.
    pub fn from_bytes(
        &self,
        bytes: impl Into<Vec<u8>>,
        ordering: impl Into<OrderingValue>,
        schema: Option<&str>,
    ) -> MergePayload {
        let payload =
            MergePayload::from_bytes(bytes, ordering).with_context(Arc::clone(&self.context));
        match schema {
            Some(schema) => payload.with_schema(schema),
            None => payload,
        }
    }

    /// A delete payload sharing this factory's context.
    pub fn tombstone(&self, ordering: impl Into<OrderingValue>) -> MergePayload {
        MergePayload::tombstone(ordering).with_context(Arc::clone(&self.context))
    }

    /// Read the ordering value of `record` per the configuration.
    pub fn ordering_of(&self, record: &Record) -> PayloadResult<OrderingValue> {
        let Some(field) = &self.config.ordering_field else {
            return Ok(OrderingValue::natural());
        };
        let value = record.get(field).ok_or_else(|| PayloadError::OrderingField {
            field: field.clone(),
            reason: "missing or null".to_string(),
        })?;
        let ordering =
            OrderingValue::from_field(value).ok_or_else(|| PayloadError::OrderingField {
                field: field.clone(),
                reason: format!("{} values are not orderable", value.kind()),
            })?;
        debug!(%field, %ordering, "extracted ordering value");
        Ok(ordering)
    }
}

impl Default for PayloadFactory {
    fn default() -> Self {
        Self::new(PayloadConfig::default())
    }
}
