//! LRU (Least Recently Used) eviction policy.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        LruPolicy<K> Layout                          │
//! │                                                                     │
//! │   index: FxHashMap<K, SlotId>        list: IntrusiveList<K>         │
//! │                                                                     │
//! │   ┌──────┬────────┐     HEAD ◄─► [c] ◄─► [a] ◄─► [b] ◄─► TAIL       │
//! │   │ "a"  │ id_a   │           MRU                  LRU              │
//! │   │ "b"  │ id_b   │                                ▲                │
//! │   │ "c"  │ id_c   │                                │                │
//! │   └──────┴────────┘                           next victim           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The index gives O(1) node lookup; the list gives O(1) unlink and
//! move-to-front. Nodes live in a slot arena and link by index, and the two
//! sentinels are never removed.
//!
//! | Operation        | Time |
//! |------------------|------|
//! | `track_addition` | O(1) |
//! | `track_get`      | O(1) |
//! | `evict`          | O(1) |
//! | `contains`       | O(1) |

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::{IntrusiveList, SlotId};
use crate::policy::EvictionPolicy;

/// Recency list plus key index.
pub struct LruPolicy<K> {
    index: FxHashMap<K, SlotId>,
    list: IntrusiveList<K>,
}

impl<K> LruPolicy<K>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            index: FxHashMap::default(),
            list: IntrusiveList::new(),
        }
    }

    /// Most recently used key.
    pub fn peek_mru(&self) -> Option<&K> {
        self.list.front()
    }

    /// Least recently used key; the next victim.
    pub fn peek_lru(&self) -> Option<&K> {
        self.list.back()
    }

    /// Keys from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.list.iter()
    }

    /// Position from the MRU end (0 = most recent), or `None` if untracked.
    ///
    /// O(n): walks the list.
    pub fn recency_rank(&self, key: &K) -> Option<usize> {
        if !self.index.contains_key(key) {
            return None;
        }
        self.list.iter().position(|k| k == key)
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.list.debug_validate_invariants();
        assert_eq!(self.index.len(), self.list.len(), "index/list size mismatch");
        for (key, id) in &self.index {
            assert!(
                self.list.get(*id) == Some(key),
                "index entry points at a foreign node"
            );
        }
    }
}

impl<K> Default for LruPolicy<K>
where
    K: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> EvictionPolicy<K> for LruPolicy<K>
where
    K: Clone + Eq + Hash,
{
    /// Tracks `key` as most recently used. Re-adding a tracked key behaves
    /// like [`track_get`](Self::track_get).
    #[inline]
    fn track_addition(&mut self, key: K) {
        if let Some(&id) = self.index.get(&key) {
            self.list.move_to_front(id);
            return;
        }
        let id = self.list.push_front(key.clone());
        self.index.insert(key, id);
    }

    /// Moves `key` to the MRU position; untracked keys are ignored.
    #[inline]
    fn track_get(&mut self, key: &K) {
        if let Some(&id) = self.index.get(key) {
            self.list.move_to_front(id);
        }
    }

    #[inline]
    fn evict(&mut self) -> Option<K> {
        let key = self.list.pop_back()?;
        self.index.remove(&key);
        Some(key)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }
}

impl<K> fmt::Debug for LruPolicy<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruPolicy")
            .field("len", &self.index.len())
            .field("order", &self.list.iter().collect::<Vec<_>>())
            .finish()
    }
}
