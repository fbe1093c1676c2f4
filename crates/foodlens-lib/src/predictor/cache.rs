//! Fitted-model cache keyed by training-data content hash
//!
//! A model is only reused while the training file's bytes are unchanged:
//! editing the file changes its SHA-256 and the next lookup misses.

use super::inference::AttendanceModel;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Default number of distinct training-file versions kept
pub const DEFAULT_CACHE_CAPACITY: usize = 8;

struct CacheEntry {
    model: Arc<AttendanceModel>,
    inserted_seq: u64,
}

/// Bounded, thread-safe cache of fitted models
pub struct ModelCache {
    entries: DashMap<String, CacheEntry>,
    capacity: usize,
    next_seq: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: capacity.max(1),
            next_seq: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a model by content hash, counting the hit or miss
    pub fn get(&self, content_hash: &str) -> Option<Arc<AttendanceModel>> {
        match self.entries.get(content_hash) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.model.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a model, evicting the oldest insertion when full
    pub fn insert(&self, content_hash: &str, model: Arc<AttendanceModel>) {
        if !self.entries.contains_key(content_hash) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        let inserted_seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(
            content_hash.to_string(),
            CacheEntry {
                model,
                inserted_seq,
            },
        );
    }

    /// Return the cached model or fit and insert a new one
    pub fn get_or_try_insert_with<E>(
        &self,
        content_hash: &str,
        fit: impl FnOnce() -> Result<AttendanceModel, E>,
    ) -> Result<(Arc<AttendanceModel>, bool), E> {
        if let Some(model) = self.get(content_hash) {
            return Ok((model, true));
        }
        let model = Arc::new(fit()?);
        self.insert(content_hash, model.clone());
        Ok((model, false))
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().inserted_seq)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
            debug!(content_hash = %key, "Evicted cached attendance model");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}
