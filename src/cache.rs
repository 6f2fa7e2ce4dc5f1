//! Bounded, thread-safe key-value cache with a pluggable eviction policy.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │ Cache<K, V>                                                          │
//! │                                                                      │
//! │   parking_lot::Mutex ─────────────────────────────────────────────┐  │
//! │   │ CacheCore<K, V>                                               │  │
//! │   │                                                               │  │
//! │   │   storage: FxHashMap<K, V>       policy: Policy<K>            │  │
//! │   │   ┌──────┬──────┐                ┌────────────────────────┐   │  │
//! │   │   │ "a"  │  v1  │ ◄── same ───►  │ FIFO queue / LIFO stack│   │  │
//! │   │   │ "b"  │  v2  │     key set    │ / LRU list / custom    │   │  │
//! │   │   └──────┴──────┘                └────────────────────────┘   │  │
//! │   │   capacity: usize                                             │  │
//! │   └───────────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Put Flow
//! ────────
//!
//! ```text
//!   put(key, value):
//!     capacity == 0          → no-op
//!     key stored             → overwrite, policy.track_get(key)
//!     len >= capacity        → victim = policy.evict(); storage.remove(victim)
//!     new key                → policy.track_addition(key); insert (key, value)
//! ```
//!
//! Every `get`/`put` runs entirely under one lock, so the value table and the
//! policy's tracking structure change together or not at all. No operation
//! blocks on I/O or spawns work.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::cache::Cache;
//!
//! let cache = Cache::new(2, "lru").unwrap();
//! cache.put("a", 1);
//! cache.put("b", 2);
//! assert_eq!(cache.get(&"a"), Some(1)); // "a" is now most recent
//!
//! cache.put("c", 3); // evicts "b"
//! assert_eq!(cache.get(&"b"), None);
//! assert_eq!(cache.len(), 2);
//! ```

use std::fmt;
use std::hash::Hash;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::error::{InvariantError, PolicyError};
#[cfg(feature = "metrics")]
use crate::metrics::{CacheMetrics, CacheMetricsSnapshot};
use crate::policy::{self, EvictionPolicy, Policy};
use crate::registry::PolicyRegistry;

/// Unsynchronized state guarded by the cache lock.
struct CacheCore<K, V> {
    storage: FxHashMap<K, V>,
    policy: Policy<K>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V> CacheCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn new(capacity: usize, policy: Policy<K>) -> Self {
        Self {
            storage: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            policy,
            capacity,
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::default(),
        }
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        match self.storage.get(key) {
            Some(value) => {
                self.policy.track_get(key);
                #[cfg(feature = "metrics")]
                self.metrics.record_get_hit();
                Some(value)
            },
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                None
            },
        }
    }

    fn put(&mut self, key: K, value: V) {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if self.capacity == 0 {
            return;
        }

        if let Some(slot) = self.storage.get_mut(&key) {
            *slot = value;
            self.policy.track_get(&key);
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            return;
        }

        if self.storage.len() >= self.capacity {
            self.evict_one();
        }

        // Policy first: if it panics, storage has not changed.
        self.policy.track_addition(key.clone());
        self.storage.insert(key, value);
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();
    }

    /// Asks the policy for a victim and drops its entry, if stored.
    fn evict_one(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        let Some(victim) = self.policy.evict() else {
            #[cfg(feature = "metrics")]
            self.metrics.record_evict_miss();
            warn!(
                policy = self.policy.name(),
                len = self.storage.len(),
                capacity = self.capacity,
                "eviction policy had no victim for a full cache"
            );
            return;
        };

        if self.storage.remove(&victim).is_some() {
            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();
            debug!(policy = self.policy.name(), len = self.storage.len(), "evicted entry");
        } else {
            #[cfg(feature = "metrics")]
            self.metrics.record_evict_miss();
            warn!(
                policy = self.policy.name(),
                "eviction policy named a victim that is not stored"
            );
        }
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.storage.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "cache holds {} entries, capacity is {}",
                self.storage.len(),
                self.capacity
            )));
        }
        if self.policy.len() != self.storage.len() {
            return Err(InvariantError::new(format!(
                "policy '{}' tracks {} keys, storage holds {}",
                self.policy.name(),
                self.policy.len(),
                self.storage.len()
            )));
        }
        if self.storage.keys().any(|key| !self.policy.contains(key)) {
            return Err(InvariantError::new(format!(
                "stored key untracked by policy '{}'",
                self.policy.name()
            )));
        }
        Ok(())
    }
}

/// Thread-safe bounded cache.
///
/// All operations take `&self`; share a cache between threads with
/// `Arc<Cache<K, V>>`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use evictkit::cache::Cache;
///
/// let cache = Arc::new(Cache::<u64, u64>::new(64, "fifo").unwrap());
/// let handles: Vec<_> = (0..4)
///     .map(|t| {
///         let cache = Arc::clone(&cache);
///         thread::spawn(move || {
///             for i in 0..100 {
///                 cache.put(t * 1000 + i, i);
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(cache.len(), 64);
/// ```
pub struct Cache<K, V> {
    inner: Mutex<CacheCore<K, V>>,
}

impl<K, V> Cache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates an empty cache using one of the built-in policies
    /// (`"fifo"`, `"lifo"`, `"lru"`).
    ///
    /// A `capacity` of 0 yields a cache that never stores anything.
    ///
    /// # Errors
    ///
    /// [`PolicyError::UnknownPolicy`] if `policy_name` is not a built-in.
    pub fn new(capacity: usize, policy_name: &str) -> Result<Self, PolicyError> {
        let policy = policy::create_policy(policy_name)?;
        Ok(Self::with_policy(capacity, policy))
    }

    /// Creates an empty cache driven by an already-built policy.
    ///
    /// The policy must not track any keys yet.
    pub fn with_policy(capacity: usize, policy: Policy<K>) -> Self {
        debug_assert!(policy.is_empty(), "policy must start empty");
        debug!(capacity, policy = policy.name(), "created cache");
        Self {
            inner: Mutex::new(CacheCore::new(capacity, policy)),
        }
    }

    /// Looks up `key` and hands the value to `f`, marking the key as accessed.
    ///
    /// Useful for values that are expensive or impossible to clone.
    ///
    /// # Deadlocks
    ///
    /// `f` runs while the cache lock is held. It must not call any method on
    /// the same cache, and every other caller waits until it returns, so keep
    /// it to reading `&V`.
    ///
    /// ```
    /// use evictkit::cache::Cache;
    ///
    /// let cache: Cache<u8, String> = Cache::new(4, "lru").unwrap();
    /// cache.put(1, "hello".to_string());
    ///
    /// // Read what is needed under the lock, then use the cache again.
    /// let len = cache.get_with(&1, String::len);
    /// assert_eq!(len, Some(5));
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn get_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
        let mut core = self.inner.lock();
        core.get(key).map(f)
    }

    /// Stores `value` under `key`.
    ///
    /// Overwriting an existing key counts as an access and never evicts.
    /// Inserting a new key into a full cache first evicts the policy's victim.
    pub fn put(&self, key: K, value: V) {
        self.inner.lock().put(key, value);
    }

    /// Returns `true` if `key` is stored. Does not count as an access.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().storage.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().storage.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity
    }

    /// Name the eviction policy was resolved from.
    pub fn policy_name(&self) -> String {
        self.inner.lock().policy.name().to_string()
    }

    /// Verifies that the entry count respects capacity and that stored keys
    /// and policy-tracked keys are the same set.
    ///
    /// Runs under the cache lock and asks the policy about every stored key.
    /// LRU answers `contains` in O(1), but FIFO and LIFO scan their queue, so
    /// the whole check is O(n²) for them. Meant for tests and debug
    /// assertions, not hot paths.
    ///
    /// ```
    /// use evictkit::cache::Cache;
    ///
    /// let cache: Cache<u32, u32> = Cache::new(64, "fifo").unwrap();
    /// for i in 0..100 {
    ///     cache.put(i, i);
    /// }
    /// assert!(cache.check_invariants().is_ok());
    /// ```
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.lock().check_invariants()
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        let core = self.inner.lock();
        core.metrics.snapshot(core.storage.len(), core.capacity)
    }
}

impl<K, V> Cache<K, V>
where
    K: Clone + Eq + Hash + 'static,
{
    /// Creates an empty cache, resolving `policy_name` through `registry`
    /// before falling back to the built-ins.
    ///
    /// # Errors
    ///
    /// [`PolicyError::UnknownPolicy`] if the name is neither registered for
    /// `K` nor a built-in.
    pub fn with_registry(
        capacity: usize,
        policy_name: &str,
        registry: &PolicyRegistry,
    ) -> Result<Self, PolicyError> {
        let policy = registry.create_policy(policy_name)?;
        Ok(Self::with_policy(capacity, policy))
    }
}

impl<K, V> Cache<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    /// Returns a copy of the value for `key`, marking the key as accessed.
    ///
    /// A miss has no side effect on eviction order.
    pub fn get(&self, key: &K) -> Option<V> {
        self.get_with(key, V::clone)
    }
}

impl<K, V> fmt::Debug for Cache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("Cache")
            .field("capacity", &core.capacity)
            .field("len", &core.storage.len())
            .field("policy", &core.policy.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{FifoPolicy, PolicyKind};

    fn keys_present(cache: &Cache<&'static str, i32>, keys: &[&'static str]) -> Vec<bool> {
        keys.iter().map(|k| cache.contains(k)).collect()
    }

    // ==============================================
    // Basic Operations
    // ==============================================

    mod basic_operations {
        use super::*;

        #[test]
        fn new_cache_is_empty() {
            let cache: Cache<&str, i32> = Cache::new(10, "lru").unwrap();
            assert!(cache.is_empty());
            assert_eq!(cache.len(), 0);
            assert_eq!(cache.capacity(), 10);
            assert_eq!(cache.policy_name(), "lru");
        }

        #[test]
        fn hit_after_insert_for_every_policy() {
            for kind in PolicyKind::ALL {
                let cache = Cache::new(4, kind.as_str()).unwrap();
                cache.put("k", 7);
                assert_eq!(cache.get(&"k"), Some(7), "policy {kind}");
            }
        }

        #[test]
        fn miss_returns_none() {
            let cache: Cache<&str, i32> = Cache::new(4, "fifo").unwrap();
            assert_eq!(cache.get(&"missing"), None);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn zero_value_is_distinguishable_from_miss() {
            let cache: Cache<u32, u32> = Cache::new(4, "lru").unwrap();
            cache.put(0, 0);
            assert_eq!(cache.get(&0), Some(0));
            assert_eq!(cache.get(&1), None);
        }

        #[test]
        fn update_overwrites_without_growth() {
            for kind in PolicyKind::ALL {
                let cache = Cache::new(2, kind.as_str()).unwrap();
                cache.put("a", 1);
                cache.put("b", 2);
                cache.put("a", 10);
                assert_eq!(cache.len(), 2);
                assert_eq!(cache.get(&"a"), Some(10));
                assert_eq!(cache.get(&"b"), Some(2));
                cache.check_invariants().unwrap();
            }
        }

        #[test]
        fn get_with_avoids_clone() {
            let cache: Cache<u8, Vec<u8>> = Cache::new(2, "lru").unwrap();
            cache.put(1, vec![1, 2, 3]);
            assert_eq!(cache.get_with(&1, Vec::len), Some(3));
            assert_eq!(cache.get_with(&2, Vec::len), None);
        }

        #[test]
        fn get_with_releases_lock_before_returning() {
            use std::sync::Arc;
            use std::thread;

            let cache: Arc<Cache<u8, Vec<u8>>> = Arc::new(Cache::new(4, "lru").unwrap());
            cache.put(1, vec![7, 8]);

            // The closure only reads the value; the cache is free again once
            // `get_with` returns, so another thread can write to it.
            let first = cache.get_with(&1, |v| v[0]);
            assert_eq!(first, Some(7));

            let writer = {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.put(2, vec![9]))
            };
            writer.join().unwrap();

            assert_eq!(cache.len(), 2);
            assert_eq!(cache.get_with(&2, |v| v.len()), Some(1));
        }

        #[test]
        fn unknown_policy_fails() {
            let err = Cache::<&str, i32>::new(4, "bogus").unwrap_err();
            assert_eq!(err, PolicyError::UnknownPolicy("bogus".into()));
        }

        #[test]
        fn debug_reports_shape() {
            let cache: Cache<u8, u8> = Cache::new(3, "lifo").unwrap();
            cache.put(1, 1);
            let dbg = format!("{:?}", cache);
            assert!(dbg.contains("capacity: 3"));
            assert!(dbg.contains("len: 1"));
            assert!(dbg.contains("lifo"));
        }
    }

    // ==============================================
    // Eviction Order
    // ==============================================

    mod eviction_order {
        use super::*;

        const KEYS: [&str; 4] = ["a", "b", "c", "d"];

        fn filled(policy: &str) -> Cache<&'static str, i32> {
            let cache = Cache::new(3, policy).unwrap();
            cache.put("a", 1);
            cache.put("b", 2);
            cache.put("c", 3);
            cache
        }

        #[test]
        fn fifo_evicts_oldest_despite_access() {
            let cache = filled("fifo");
            assert_eq!(cache.get(&"a"), Some(1));
            cache.put("d", 4);
            assert_eq!(keys_present(&cache, &KEYS), vec![false, true, true, true]);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn lifo_evicts_newest() {
            let cache = filled("lifo");
            assert_eq!(cache.get(&"a"), Some(1));
            cache.put("d", 4);
            assert_eq!(keys_present(&cache, &KEYS), vec![true, true, false, true]);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn lru_evicts_least_recently_used() {
            let cache = filled("lru");
            assert_eq!(cache.get(&"a"), Some(1));
            cache.put("d", 4);
            assert_eq!(keys_present(&cache, &KEYS), vec![true, false, true, true]);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn lru_update_counts_as_access() {
            let cache = filled("lru");
            cache.put("a", 100);
            cache.put("d", 4);
            assert!(cache.contains(&"a"));
            assert!(!cache.contains(&"b"));
        }

        #[test]
        fn lru_miss_does_not_reorder() {
            let cache = filled("lru");
            assert_eq!(cache.get(&"zzz"), None);
            cache.put("d", 4);
            assert!(!cache.contains(&"a"));
        }

        #[test]
        fn contains_is_not_an_access() {
            let cache = filled("lru");
            assert!(cache.contains(&"a"));
            cache.put("d", 4);
            assert!(!cache.contains(&"a"));
        }

        #[test]
        fn lifo_keeps_replacing_top() {
            let cache = filled("lifo");
            cache.put("d", 4);
            cache.put("e", 5);
            assert!(cache.contains(&"a"));
            assert!(cache.contains(&"b"));
            assert!(!cache.contains(&"d"));
            assert!(cache.contains(&"e"));
        }
    }

    // ==============================================
    // Capacity Edge Cases
    // ==============================================

    mod capacity {
        use super::*;

        #[test]
        fn zero_capacity_stores_nothing() {
            for kind in PolicyKind::ALL {
                let cache = Cache::new(0, kind.as_str()).unwrap();
                cache.put("a", 1);
                cache.put("a", 2);
                assert_eq!(cache.len(), 0);
                assert_eq!(cache.get(&"a"), None);
                cache.check_invariants().unwrap();
            }
        }

        #[test]
        fn capacity_one_replaces_entry() {
            for kind in PolicyKind::ALL {
                let cache = Cache::new(1, kind.as_str()).unwrap();
                cache.put("a", 1);
                cache.put("b", 2);
                assert_eq!(cache.len(), 1);
                assert_eq!(cache.get(&"b"), Some(2));
                assert!(!cache.contains(&"a"));
            }
        }
    }

    // ==============================================
    // Misbehaving Custom Policies
    // ==============================================

    mod custom_policy {
        use super::*;

        /// Tracks keys but never yields a victim.
        #[derive(Default)]
        struct NeverEvict(Vec<u32>);

        impl EvictionPolicy<u32> for NeverEvict {
            fn track_addition(&mut self, key: u32) {
                self.0.push(key);
            }
            fn track_get(&mut self, _key: &u32) {}
            fn evict(&mut self) -> Option<u32> {
                None
            }
            fn len(&self) -> usize {
                self.0.len()
            }
            fn contains(&self, key: &u32) -> bool {
                self.0.contains(key)
            }
        }

        /// Always names a key the cache never stored.
        struct Phantom(FifoPolicy<u32>);

        impl EvictionPolicy<u32> for Phantom {
            fn track_addition(&mut self, key: u32) {
                self.0.track_addition(key);
            }
            fn track_get(&mut self, key: &u32) {
                self.0.track_get(key);
            }
            fn evict(&mut self) -> Option<u32> {
                Some(u32::MAX)
            }
            fn len(&self) -> usize {
                self.0.len()
            }
            fn contains(&self, key: &u32) -> bool {
                self.0.contains(key)
            }
        }

        #[test]
        fn no_victim_deletes_nothing() {
            let cache: Cache<u32, u32> =
                Cache::with_policy(1, Policy::custom("never", NeverEvict::default()));
            cache.put(1, 1);
            cache.put(2, 2);
            assert_eq!(cache.get(&1), Some(1));
            assert_eq!(cache.get(&2), Some(2));
            assert_eq!(cache.policy_name(), "never");
            assert!(cache.check_invariants().is_err());
        }

        #[test]
        fn unknown_victim_deletes_nothing() {
            let cache: Cache<u32, u32> =
                Cache::with_policy(1, Policy::custom("phantom", Phantom(FifoPolicy::new())));
            cache.put(1, 1);
            cache.put(2, 2);
            assert!(cache.contains(&1));
            assert!(cache.contains(&2));
        }

        /// Panics when asked to track one particular key.
        #[derive(Default)]
        struct PanicsOn13(FifoPolicy<u32>);

        impl EvictionPolicy<u32> for PanicsOn13 {
            fn track_addition(&mut self, key: u32) {
                assert_ne!(key, 13, "refusing to track 13");
                self.0.track_addition(key);
            }
            fn track_get(&mut self, key: &u32) {
                self.0.track_get(key);
            }
            fn evict(&mut self) -> Option<u32> {
                self.0.evict()
            }
            fn len(&self) -> usize {
                self.0.len()
            }
            fn contains(&self, key: &u32) -> bool {
                self.0.contains(key)
            }
        }

        #[test]
        fn panicking_policy_leaves_storage_untouched() {
            use std::panic::{catch_unwind, AssertUnwindSafe};

            let cache: Cache<u32, u32> =
                Cache::with_policy(4, Policy::custom("panicky", PanicsOn13::default()));
            cache.put(1, 1);

            let result = catch_unwind(AssertUnwindSafe(|| cache.put(13, 13)));
            assert!(result.is_err());

            assert!(!cache.contains(&13));
            assert_eq!(cache.len(), 1);
            cache.check_invariants().unwrap();

            cache.put(2, 2);
            assert_eq!(cache.get(&2), Some(2));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn with_registry_uses_registered_constructor() {
            let registry = PolicyRegistry::new();
            registry.register::<u32, _, _>("never", NeverEvict::default);
            let cache: Cache<u32, u32> = Cache::with_registry(2, "never", &registry).unwrap();
            assert_eq!(cache.policy_name(), "never");
        }
    }

    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn counters_follow_operations() {
            let cache: Cache<u32, u32> = Cache::new(2, "lru").unwrap();
            cache.put(1, 1);
            cache.put(2, 2);
            cache.put(1, 10);
            cache.put(3, 3);
            cache.get(&1);
            cache.get(&2);

            let snap = cache.metrics_snapshot();
            assert_eq!(snap.insert_calls, 4);
            assert_eq!(snap.insert_new, 3);
            assert_eq!(snap.insert_updates, 1);
            assert_eq!(snap.evict_calls, 1);
            assert_eq!(snap.evicted_entries, 1);
            assert_eq!(snap.evict_misses, 0);
            assert_eq!(snap.get_hits, 1);
            assert_eq!(snap.get_misses, 1);
            assert_eq!(snap.cache_len, 2);
            assert_eq!(snap.capacity, 2);
        }
    }
}
