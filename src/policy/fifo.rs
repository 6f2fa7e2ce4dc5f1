//! FIFO (First In, First Out) eviction policy.
//!
//! Keys are queued in insertion order; the oldest still-present key is the
//! victim. Reads and overwrites never reorder the queue.
//!
//! ```text
//!   track_addition(d)            evict()
//!   ─────────────────            ───────
//!   front           back         front           back
//!   [a] [b] [c] ◄── d            a ◄── [b] [c] [d]
//!   oldest       newest          victim
//! ```
//!
//! | Operation        | Time |
//! |------------------|------|
//! | `track_addition` | O(1) amortized |
//! | `track_get`      | O(1) (no-op)   |
//! | `evict`          | O(1)           |
//! | `contains`       | O(n)           |

use std::collections::VecDeque;

use crate::policy::EvictionPolicy;

/// Insertion-ordered queue of keys.
#[derive(Debug, Clone)]
pub struct FifoPolicy<K> {
    queue: VecDeque<K>,
}

impl<K> FifoPolicy<K> {
    /// Creates an empty queue.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::{EvictionPolicy, FifoPolicy};
    ///
    /// let policy: FifoPolicy<u64> = FifoPolicy::new();
    /// assert!(policy.is_empty());
    /// assert_eq!(policy.peek_oldest(), None);
    /// ```
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Oldest tracked key; the next victim.
    ///
    /// Reads do not move a key, so the answer only changes on insert or
    /// evict.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::{EvictionPolicy, FifoPolicy};
    ///
    /// let mut policy = FifoPolicy::new();
    /// policy.track_addition("a");
    /// policy.track_addition("b");
    /// policy.track_get(&"a");
    ///
    /// assert_eq!(policy.peek_oldest(), Some(&"a"));
    /// assert_eq!(policy.evict(), Some("a"));
    /// assert_eq!(policy.peek_oldest(), Some(&"b"));
    /// ```
    pub fn peek_oldest(&self) -> Option<&K> {
        self.queue.front()
    }

    /// Keys from oldest to newest.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::{EvictionPolicy, FifoPolicy};
    ///
    /// let mut policy = FifoPolicy::new();
    /// for key in [3, 1, 2] {
    ///     policy.track_addition(key);
    /// }
    /// assert_eq!(policy.iter().copied().collect::<Vec<_>>(), vec![3, 1, 2]);
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.queue.iter()
    }
}

impl<K> Default for FifoPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq> EvictionPolicy<K> for FifoPolicy<K> {
    #[inline]
    fn track_addition(&mut self, key: K) {
        self.queue.push_back(key);
    }

    #[inline]
    fn track_get(&mut self, _key: &K) {}

    #[inline]
    fn evict(&mut self) -> Option<K> {
        self.queue.pop_front()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn contains(&self, key: &K) -> bool {
        self.queue.contains(key)
    }
}
