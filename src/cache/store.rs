//! Cache Store Module
//!
//! Bounded response cache with lazy TTL expiry and oldest-first eviction on
//! overflow.

use std::collections::HashMap;

use chrono::Duration;
use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, InsertionOrder};

// == Cache Store ==
/// In-memory mapping from cache key to JSON payload.
///
/// Expiry is lazy: a stale entry stays in place (and counts towards `len`)
/// until a `get` on its key notices it. Overflow eviction drops the key that
/// was inserted first, regardless of how often it has been read.
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    order: InsertionOrder,
    stats: CacheStats,
    capacity: usize,
    ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of distinct keys kept
    /// * `ttl_ms` - Maximum entry age in milliseconds
    pub fn new(capacity: usize, ttl_ms: u64) -> Self {
        let ttl_ms = i64::try_from(ttl_ms).unwrap_or(i64::MAX);
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: CacheStats::new(),
            capacity,
            ttl: Duration::milliseconds(ttl_ms),
        }
    }

    // == Get ==
    /// Returns the payload stored under `key` if it is still fresh.
    ///
    /// A stale entry is removed as a side effect and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let stale = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_stale(self.ttl),
        };

        if stale {
            self.entries.remove(key);
            self.order.remove(key);
            self.stats.record_expiration();
            self.stats.record_miss();
            self.stats.set_total_entries(self.entries.len());
            debug!(key, "cache entry expired");
            return None;
        }

        self.stats.record_hit();
        self.entries.get(key).map(|entry| entry.payload.clone())
    }

    /// Returns the payload under `key` if it is still fresh, leaving the
    /// store and its statistics untouched.
    pub fn peek(&self, key: &str) -> Option<Value> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_stale(self.ttl))
            .map(|entry| entry.payload.clone())
    }

    // == Set ==
    /// Inserts or overwrites `key` with a freshly stamped payload.
    ///
    /// When the insertion pushes the store past its capacity, exactly one
    /// entry is evicted: the earliest inserted key still present. Stale
    /// entries are not swept here.
    pub fn set(&mut self, key: String, payload: Value) {
        let is_new = !self.entries.contains_key(&key);
        if is_new {
            self.order.record(&key);
        }
        self.entries.insert(key, CacheEntry::new(payload));

        if self.entries.len() > self.capacity {
            if let Some(oldest) = self.order.pop_oldest() {
                self.entries.remove(&oldest);
                self.stats.record_eviction();
                debug!(key = %oldest, "cache entry evicted");
            }
        }

        self.stats.set_total_entries(self.entries.len());
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Number of keys held, including stale ones not yet reconciled.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
