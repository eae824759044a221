use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use upsert_types::{Record, Schema, SchemaCache, SchemaResult};

use crate::delete::{DeleteFlag, DeleteMarker, DEFAULT_DELETE_FIELD};
use crate::error::{PayloadError, PayloadResult};

/// Configuration for payloads built by a [`PayloadFactory`](crate::PayloadFactory).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadConfig {
    /// Boolean field whose `true` value marks a record as a delete.
    pub delete_field: String,
    /// Field providing each record's ordering value. When unset, payloads
    /// use the natural ordering.
    pub ordering_field: Option<String>,
    /// Whether parsed schemas are memoized across merges.
    pub cache_schemas: bool,
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            delete_field: DEFAULT_DELETE_FIELD.to_string(),
            ordering_field: None,
            cache_schemas: true,
        }
    }
}

impl PayloadConfig {
    /// Load from JSON; omitted keys take their defaults.
    pub fn from_json(source: &str) -> PayloadResult<Self> {
        let config: Self =
            serde_json::from_str(source).map_err(|e| PayloadError::Config(e.to_string()))?;
        if config.delete_field.is_empty() {
            return Err(PayloadError::Config("delete_field must not be empty".into()));
        }
        Ok(config)
    }
}

/// State shared by every payload built from the same configuration.
pub struct PayloadContext {
    delete_marker: Box<dyn DeleteMarker>,
    schemas: Option<SchemaCache>,
}

impl PayloadContext {
    /// A context using `delete_marker` and no schema cache.
    pub fn new(delete_marker: impl DeleteMarker + 'static) -> Self {
        Self {
            delete_marker: Box::new(delete_marker),
            schemas: None,
        }
    }

    /// Memoize schema parsing for payloads sharing this context.
    pub fn with_schema_cache(mut self) -> Self {
        self.schemas = Some(SchemaCache::new());
        self
    }

    pub fn from_config(config: &PayloadConfig) -> Self {
        let context = Self::new(DeleteFlag::new(config.delete_field.clone()));
        if config.cache_schemas {
            context.with_schema_cache()
        } else {
            context
        }
    }

    /// Returns `true` if `record` is a delete marker.
    pub fn is_delete(&self, record: &Record) -> bool {
        self.delete_marker.is_delete(record)
    }

    /// Parse a schema string, through the cache when one is configured.
    pub fn parse_schema(&self, source: &str) -> SchemaResult<Arc<Schema>> {
        match &self.schemas {
            Some(cache) => cache.get_or_parse(source),
            None => Schema::parse(source).map(Arc::new),
        }
    }

    /// The schema cache, if enabled.
    pub fn schema_cache(&self) -> Option<&SchemaCache> {
        self.schemas.as_ref()
    }
}

impl Default for PayloadContext {
    fn default() -> Self {
        Self::new(DeleteFlag::default())
    }
}

impl fmt::Debug for PayloadContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadContext")
            .field("schema_cache", &self.schemas)
            .finish_non_exhaustive()
    }
}
