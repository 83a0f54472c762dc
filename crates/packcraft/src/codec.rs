//! Cached encoder/decoder over a shared [Schema].

use std::sync::Arc;

use tracing::trace;

use crate::{
    cache::{CachePolicy, EncodeCache},
    errors::{ReadError, WriteError},
    schema::Schema,
    value::Record,
};

/// Encodes and decodes records of one schema, memoizing packed field values.
///
/// The schema is shared read-only; the cache is owned by this instance and
/// synchronized, so a `Codec` can be used from several threads at once.
#[derive(Debug)]
pub struct Codec {
    schema: Arc<Schema>,
    cache: EncodeCache,
}

impl Codec {
    /// Codec with the default [CachePolicy::Unbounded] cache.
    pub fn new(schema: impl Into<Arc<Schema>>) -> Self {
        Self::with_policy(schema, CachePolicy::default())
    }

    /// Codec whose cache follows `policy`.
    pub fn with_policy(schema: impl Into<Arc<Schema>>, policy: CachePolicy) -> Self {
        Codec {
            schema: schema.into(),
            cache: EncodeCache::new(policy),
        }
    }

    /// The shared schema.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Same output as [Schema::encode], reusing packed values seen before.
    pub fn encode(&self, record: &Record) -> Result<Vec<u8>, WriteError> {
        self.schema.encode_with(record, |i, field, value| {
            self.cache.get_or_try_insert(i, value, || {
                trace!(field = %field.name, "encode cache miss");
                field.pack(value)
            })
        })
    }

    /// Same as [Schema::decode]; never touches the cache.
    pub fn decode(&self, data: &[u8]) -> Result<Record, ReadError> {
        self.schema.decode(data)
    }

    /// Number of cached packed values.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drops every cached value.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
