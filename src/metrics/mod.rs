//! Operation counters for [`Cache`](crate::cache::Cache).
//!
//! Compiled only with the `metrics` feature. Counters are plain integers
//! updated inside the cache's critical section, so a snapshot is always
//! consistent with the cache state it was taken from.

pub mod snapshot;

pub use snapshot::CacheMetricsSnapshot;

#[derive(Debug, Default, Clone)]
pub(crate) struct CacheMetrics {
    get_calls: u64,
    get_hits: u64,
    get_misses: u64,
    insert_calls: u64,
    insert_new: u64,
    insert_updates: u64,
    evict_calls: u64,
    evicted_entries: u64,
    evict_misses: u64,
}

impl CacheMetrics {
    #[inline]
    pub(crate) fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    #[inline]
    pub(crate) fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    #[inline]
    pub(crate) fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    #[inline]
    pub(crate) fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    #[inline]
    pub(crate) fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    #[inline]
    pub(crate) fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }

    #[inline]
    pub(crate) fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    /// The policy produced no victim, or one that was not stored.
    #[inline]
    pub(crate) fn record_evict_miss(&mut self) {
        self.evict_misses += 1;
    }

    pub(crate) fn snapshot(&self, cache_len: usize, capacity: usize) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            get_calls: self.get_calls,
            get_hits: self.get_hits,
            get_misses: self.get_misses,
            insert_calls: self.insert_calls,
            insert_new: self.insert_new,
            insert_updates: self.insert_updates,
            evict_calls: self.evict_calls,
            evicted_entries: self.evicted_entries,
            evict_misses: self.evict_misses,
            cache_len,
            capacity,
        }
    }
}
