//! Doubly linked list with fixed head/tail sentinels, backed by `SlotArena`.
//!
//! Nodes are addressed by `SlotId` and linked by index, so moving a node to
//! the front or unlinking it from the middle is O(1) without pointer
//! bookkeeping. The two sentinel slots are allocated on construction, never
//! removed, and never carry a value; every real node therefore always has a
//! predecessor and a successor.
//!
//! ## Architecture
//!
//! ```text
//!   arena (SlotArena<Node<T>>)
//!   ┌────────┬──────────────────────────────────────────────┐
//!   │ SlotId │ Node { value, prev, next }                   │
//!   ├────────┼──────────────────────────────────────────────┤
//!   │ 0      │ { value: None,    prev: 0,  next: id_a }     │  head sentinel
//!   │ 1      │ { value: None,    prev: id_b, next: 1 }      │  tail sentinel
//!   │ id_a   │ { value: Some(A), prev: 0,  next: id_b }     │
//!   │ id_b   │ { value: Some(B), prev: id_a, next: 1 }      │
//!   └────────┴──────────────────────────────────────────────┘
//!
//!   HEAD ◄──► [A] ◄──► [B] ◄──► TAIL
//!          front            back
//! ```
//!
//! ## Operations
//! - `push_front(value)`: allocate + splice after head, O(1)
//! - `move_to_front(id)`: detach + splice after head, O(1)
//! - `pop_back()`: detach the node before tail + free its slot, O(1)
//! - `remove(id)`: detach + free slot, O(1)
//! - `iter()`: front to back, O(n)

use crate::ds::slot_arena::{SlotArena, SlotId};

const HEAD: SlotId = SlotId(0);
const TAIL: SlotId = SlotId(1);

#[derive(Debug)]
struct Node<T> {
    value: Option<T>,
    prev: SlotId,
    next: SlotId,
}

/// Sentinel-bounded list storing its nodes in a [`SlotArena`].
#[derive(Debug)]
pub struct IntrusiveList<T> {
    arena: SlotArena<Node<T>>,
}

impl<T> IntrusiveList<T> {
    /// Creates an empty list holding only the head and tail sentinels.
    pub fn new() -> Self {
        let mut arena = SlotArena::new();
        let head = arena.insert(Node {
            value: None,
            prev: HEAD,
            next: TAIL,
        });
        let tail = arena.insert(Node {
            value: None,
            prev: HEAD,
            next: TAIL,
        });
        debug_assert_eq!(head, HEAD);
        debug_assert_eq!(tail, TAIL);
        Self { arena }
    }

    /// Number of real (non-sentinel) nodes.
    pub fn len(&self) -> usize {
        self.arena.len() - 2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `id` names a live, non-sentinel node.
    pub fn contains(&self, id: SlotId) -> bool {
        !is_sentinel(id) && self.arena.contains(id)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).and_then(|node| node.value.as_ref())
    }

    /// Value adjacent to the head sentinel.
    pub fn front(&self) -> Option<&T> {
        self.get(self.next_of(HEAD))
    }

    /// Value adjacent to the tail sentinel.
    pub fn back(&self) -> Option<&T> {
        self.get(self.prev_of(TAIL))
    }

    /// Inserts `value` right after the head sentinel.
    pub fn push_front(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value: Some(value),
            prev: HEAD,
            next: HEAD,
        });
        self.attach_front(id);
        id
    }

    /// Splices an existing node in front of all others; `false` if `id` is
    /// not a live node.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.next_of(HEAD) != id {
            self.detach(id);
            self.attach_front(id);
        }
        true
    }

    /// Removes and returns the value adjacent to the tail sentinel.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.prev_of(TAIL);
        self.remove(id)
    }

    /// Unlinks `id` and frees its slot. Sentinels are never removed.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        if !self.contains(id) {
            return None;
        }
        self.detach(id);
        self.arena.remove(id).and_then(|node| node.value)
    }

    /// Iterates values from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.next_of(HEAD),
        }
    }

    #[cfg(any(test, debug_assertions))]
    /// Walks the list in both directions and checks link symmetry.
    pub fn debug_validate_invariants(&self) {
        let mut forward = 0usize;
        let mut id = HEAD;
        loop {
            let next = self.next_of(id);
            assert_eq!(self.prev_of(next), id, "broken prev link at {:?}", next);
            if next == TAIL {
                break;
            }
            assert!(self.get(next).is_some(), "real node without value");
            forward += 1;
            assert!(forward <= self.len(), "cycle in forward walk");
            id = next;
        }
        assert_eq!(forward, self.len(), "forward walk length mismatch");

        let mut backward = 0usize;
        let mut id = TAIL;
        while self.prev_of(id) != HEAD {
            backward += 1;
            assert!(backward <= self.len(), "cycle in backward walk");
            id = self.prev_of(id);
        }
        assert_eq!(backward, self.len(), "backward walk length mismatch");
    }

    fn next_of(&self, id: SlotId) -> SlotId {
        self.arena.get(id).map_or(TAIL, |node| node.next)
    }

    fn prev_of(&self, id: SlotId) -> SlotId {
        self.arena.get(id).map_or(HEAD, |node| node.prev)
    }

    fn set_next(&mut self, id: SlotId, next: SlotId) {
        if let Some(node) = self.arena.get_mut(id) {
            node.next = next;
        }
    }

    fn set_prev(&mut self, id: SlotId, prev: SlotId) {
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = prev;
        }
    }

    fn detach(&mut self, id: SlotId) {
        let prev = self.prev_of(id);
        let next = self.next_of(id);
        self.set_next(prev, next);
        self.set_prev(next, prev);
    }

    fn attach_front(&mut self, id: SlotId) {
        let first = self.next_of(HEAD);
        self.set_prev(id, HEAD);
        self.set_next(id, first);
        self.set_prev(first, id);
        self.set_next(HEAD, id);
    }
}

impl<T> Default for IntrusiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn is_sentinel(id: SlotId) -> bool {
    id == HEAD || id == TAIL
}

/// Front-to-back iterator over list values.
pub struct Iter<'a, T> {
    list: &'a IntrusiveList<T>,
    current: SlotId,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == TAIL {
            return None;
        }
        let id = self.current;
        self.current = self.list.next_of(id);
        self.list.get(id)
    }
}
