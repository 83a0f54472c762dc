//! Memoization of packed field values.
//!
//! Entries are keyed by field position and value. Decoding never touches the
//! cache, and a cache hit yields exactly what [crate::field::FieldKind::encode]
//! would return, so the cache only affects throughput.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use parking_lot::RwLock;
use tracing::warn;

use crate::{fragment::Packed, value::Value};

/// How many packed values a cache may hold.
///
/// Fields with few possible values (booleans, choices, small integers) are well
/// served by [CachePolicy::Unbounded]. Schemas with high-cardinality integer or
/// hex fields should use [CachePolicy::Capped] or [CachePolicy::Disabled].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Keep every packed value for the life of the codec.
    #[default]
    Unbounded,
    /// Stop inserting once this many entries are held. Misses past the cap are
    /// computed but not stored.
    Capped(usize),
    /// Never store anything.
    Disabled,
}

type Key = (usize, Value);

/// Thread-safe map from `(field index, value)` to packed bit patterns.
#[derive(Debug, Default)]
pub struct EncodeCache {
    policy: CachePolicy,
    entries: RwLock<HashMap<Key, Arc<[Packed]>>>,
    full_reported: AtomicBool,
}

impl EncodeCache {
    /// Empty cache governed by `policy`.
    pub fn new(policy: CachePolicy) -> Self {
        EncodeCache {
            policy,
            entries: RwLock::new(HashMap::new()),
            full_reported: AtomicBool::new(false),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Removes every entry and re-arms the capacity warning.
    pub fn clear(&self) {
        self.entries.write().clear();
        self.full_reported.store(false, Ordering::Relaxed);
    }

    /// Returns the cached patterns for `(field, value)`, or computes them with
    /// `compute` and stores them if the policy allows.
    pub fn get_or_try_insert<E, F>(&self, field: usize, value: &Value, compute: F) -> Result<Arc<[Packed]>, E>
    where
        F: FnOnce() -> Result<Vec<Packed>, E>,
    {
        if self.policy == CachePolicy::Disabled {
            return compute().map(Arc::from);
        }

        let key = (field, value.clone());

        if let Some(hit) = self.entries.read().get(&key) {
            return Ok(Arc::clone(hit));
        }

        let packed: Arc<[Packed]> = Arc::from(compute()?);

        let mut entries = self.entries.write();
        if let CachePolicy::Capped(cap) = self.policy {
            if entries.len() >= cap {
                if !self.full_reported.swap(true, Ordering::Relaxed) {
                    warn!(capacity = cap, "encode cache is full, new values will not be cached");
                }
                return Ok(packed);
            }
        }

        Ok(Arc::clone(entries.entry(key).or_insert(packed)))
    }
}
