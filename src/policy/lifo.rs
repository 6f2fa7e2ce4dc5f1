//! LIFO (Last In, First Out) eviction policy.
//!
//! Implements a stack-based eviction algorithm where the most recently
//! inserted key is the victim. This is the opposite of FIFO and only pays off
//! for workloads where the newest insertions are the least likely to be
//! reused (scratch space, undo buffers, some batch scans).
//!
//! ```text
//!   Insert A, B, C, D
//!     Stack: [A, B, C, D]
//!            bottom  ^top
//!
//!   evict() → D (newest)
//!     Stack: [A, B, C]
//! ```
//!
//! Access never changes stack order.

use crate::policy::EvictionPolicy;

/// Stack of keys in insertion order (top = most recent).
#[derive(Debug, Clone)]
pub struct LifoPolicy<K> {
    stack: Vec<K>,
}

impl<K> LifoPolicy<K> {
    /// Creates an empty stack.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::{EvictionPolicy, LifoPolicy};
    ///
    /// let policy: LifoPolicy<String> = LifoPolicy::new();
    /// assert_eq!(policy.len(), 0);
    /// assert_eq!(policy.peek_newest(), None);
    /// ```
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Most recently inserted key; the next victim.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::{EvictionPolicy, LifoPolicy};
    ///
    /// let mut policy = LifoPolicy::new();
    /// policy.track_addition(1);
    /// policy.track_addition(2);
    ///
    /// // Access doesn't change the top of the stack
    /// policy.track_get(&1);
    /// assert_eq!(policy.peek_newest(), Some(&2));
    ///
    /// assert_eq!(policy.evict(), Some(2));
    /// assert_eq!(policy.peek_newest(), Some(&1));
    /// ```
    pub fn peek_newest(&self) -> Option<&K> {
        self.stack.last()
    }
}

impl<K> Default for LifoPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq> EvictionPolicy<K> for LifoPolicy<K> {
    #[inline]
    fn track_addition(&mut self, key: K) {
        self.stack.push(key);
    }

    #[inline]
    fn track_get(&mut self, _key: &K) {}

    #[inline]
    fn evict(&mut self) -> Option<K> {
        self.stack.pop()
    }

    fn len(&self) -> usize {
        self.stack.len()
    }

    fn contains(&self, key: &K) -> bool {
        self.stack.contains(key)
    }
}
