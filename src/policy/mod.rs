//! Eviction policies.
//!
//! A policy tracks key order only; it never sees values. The owning
//! [`Cache`](crate::cache::Cache) pairs every storage mutation with exactly one
//! policy notification, so the set of keys a policy tracks always equals the
//! cache's key set.
//!
//! ## Built-ins
//!
//! | Name     | `track_addition`     | `track_get`    | `evict`                  |
//! |----------|----------------------|----------------|--------------------------|
//! | `"fifo"` | enqueue at tail      | no-op          | dequeue oldest           |
//! | `"lifo"` | push onto stack      | no-op          | pop newest               |
//! | `"lru"`  | insert as MRU        | move to MRU    | remove LRU               |
//!
//! The built-ins form the closed [`Policy`] sum type; anything else enters
//! through [`Policy::Custom`], normally produced by a
//! [`PolicyRegistry`](crate::registry::PolicyRegistry).

pub mod fifo;
pub mod lifo;
pub mod lru;

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::error::PolicyError;

pub use fifo::FifoPolicy;
pub use lifo::LifoPolicy;
pub use lru::LruPolicy;

/// Strategy that tracks key insertion/access order and names eviction victims.
///
/// None of the operations can fail. `evict` on an empty structure returns
/// `None` instead of a placeholder key.
pub trait EvictionPolicy<K> {
    /// Called after a new key was stored.
    fn track_addition(&mut self, key: K);

    /// Called after an existing key was read or overwritten.
    fn track_get(&mut self, key: &K);

    /// Removes the next victim from the policy's structure and returns it.
    fn evict(&mut self) -> Option<K>;

    /// Number of keys currently tracked.
    fn len(&self) -> usize;

    /// Returns `true` if `key` is currently tracked.
    fn contains(&self, key: &K) -> bool;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Names of the built-in policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    /// First in, first out.
    Fifo,
    /// Last in, first out.
    Lifo,
    /// Least recently used.
    Lru,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 3] = [PolicyKind::Fifo, PolicyKind::Lifo, PolicyKind::Lru];

    /// The literal, case-sensitive name this kind resolves from.
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Fifo => "fifo",
            PolicyKind::Lifo => "lifo",
            PolicyKind::Lru => "lru",
        }
    }

    /// Builds a fresh, empty policy of this kind.
    pub fn build<K>(self) -> Policy<K>
    where
        K: Clone + Eq + Hash,
    {
        match self {
            PolicyKind::Fifo => Policy::Fifo(FifoPolicy::new()),
            PolicyKind::Lifo => Policy::Lifo(LifoPolicy::new()),
            PolicyKind::Lru => Policy::Lru(LruPolicy::new()),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = PolicyError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "fifo" => Ok(PolicyKind::Fifo),
            "lifo" => Ok(PolicyKind::Lifo),
            "lru" => Ok(PolicyKind::Lru),
            other => Err(PolicyError::UnknownPolicy(other.to_string())),
        }
    }
}

/// A resolved eviction policy: one of the built-ins, or a custom strategy.
pub enum Policy<K> {
    Fifo(FifoPolicy<K>),
    Lifo(LifoPolicy<K>),
    Lru(LruPolicy<K>),
    Custom {
        name: String,
        inner: Box<dyn EvictionPolicy<K> + Send>,
    },
}

impl<K> Policy<K> {
    /// Wraps a user-supplied strategy under `name`.
    pub fn custom<P>(name: impl Into<String>, policy: P) -> Self
    where
        P: EvictionPolicy<K> + Send + 'static,
    {
        Policy::Custom {
            name: name.into(),
            inner: Box::new(policy),
        }
    }

    /// Name the policy was resolved from.
    pub fn name(&self) -> &str {
        match self {
            Policy::Fifo(_) => PolicyKind::Fifo.as_str(),
            Policy::Lifo(_) => PolicyKind::Lifo.as_str(),
            Policy::Lru(_) => PolicyKind::Lru.as_str(),
            Policy::Custom { name, .. } => name,
        }
    }

    /// The built-in kind, or `None` for custom policies.
    pub fn kind(&self) -> Option<PolicyKind> {
        match self {
            Policy::Fifo(_) => Some(PolicyKind::Fifo),
            Policy::Lifo(_) => Some(PolicyKind::Lifo),
            Policy::Lru(_) => Some(PolicyKind::Lru),
            Policy::Custom { .. } => None,
        }
    }
}

impl<K> EvictionPolicy<K> for Policy<K>
where
    K: Clone + Eq + Hash,
{
    #[inline]
    fn track_addition(&mut self, key: K) {
        match self {
            Policy::Fifo(p) => p.track_addition(key),
            Policy::Lifo(p) => p.track_addition(key),
            Policy::Lru(p) => p.track_addition(key),
            Policy::Custom { inner, .. } => inner.track_addition(key),
        }
    }

    #[inline]
    fn track_get(&mut self, key: &K) {
        match self {
            Policy::Fifo(p) => p.track_get(key),
            Policy::Lifo(p) => p.track_get(key),
            Policy::Lru(p) => p.track_get(key),
            Policy::Custom { inner, .. } => inner.track_get(key),
        }
    }

    #[inline]
    fn evict(&mut self) -> Option<K> {
        match self {
            Policy::Fifo(p) => p.evict(),
            Policy::Lifo(p) => p.evict(),
            Policy::Lru(p) => p.evict(),
            Policy::Custom { inner, .. } => inner.evict(),
        }
    }

    fn len(&self) -> usize {
        match self {
            Policy::Fifo(p) => p.len(),
            Policy::Lifo(p) => p.len(),
            Policy::Lru(p) => p.len(),
            Policy::Custom { inner, .. } => inner.len(),
        }
    }

    fn contains(&self, key: &K) -> bool {
        match self {
            Policy::Fifo(p) => p.contains(key),
            Policy::Lifo(p) => p.contains(key),
            Policy::Lru(p) => p.contains(key),
            Policy::Custom { inner, .. } => inner.contains(key),
        }
    }
}

impl<K> fmt::Debug for Policy<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

/// Resolves a built-in policy by its literal name.
///
/// Callers that register custom strategies go through
/// [`PolicyRegistry::create_policy`](crate::registry::PolicyRegistry::create_policy)
/// instead, which consults the registry before falling back here.
///
/// ```
/// use evictkit::policy::{create_policy, PolicyKind};
///
/// let policy = create_policy::<u32>("lifo").unwrap();
/// assert_eq!(policy.kind(), Some(PolicyKind::Lifo));
/// assert!(create_policy::<u32>("LRU").is_err());
/// ```
pub fn create_policy<K>(name: &str) -> Result<Policy<K>, PolicyError>
where
    K: Clone + Eq + Hash,
{
    name.parse::<PolicyKind>().map(PolicyKind::build)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Evicts nothing and tracks nothing.
    struct Inert;

    impl EvictionPolicy<u32> for Inert {
        fn track_addition(&mut self, _key: u32) {}
        fn track_get(&mut self, _key: &u32) {}
        fn evict(&mut self) -> Option<u32> {
            None
        }
        fn len(&self) -> usize {
            0
        }
        fn contains(&self, _key: &u32) -> bool {
            false
        }
    }

    mod kind {
        use super::*;

        #[test]
        fn parses_literal_names() {
            for kind in PolicyKind::ALL {
                assert_eq!(kind.as_str().parse::<PolicyKind>(), Ok(kind));
                assert_eq!(kind.to_string(), kind.as_str());
            }
        }

        #[test]
        fn names_are_case_sensitive() {
            for name in ["FIFO", "Lifo", "LRU", " lru", "lru "] {
                assert_eq!(
                    name.parse::<PolicyKind>(),
                    Err(PolicyError::UnknownPolicy(name.to_string()))
                );
            }
        }
    }

    mod dispatch {
        use super::*;

        #[test]
        fn create_policy_resolves_builtins() {
            for kind in PolicyKind::ALL {
                let policy = create_policy::<u32>(kind.as_str()).unwrap();
                assert_eq!(policy.kind(), Some(kind));
                assert_eq!(policy.name(), kind.as_str());
                assert!(policy.is_empty());
            }
        }

        #[test]
        fn create_policy_rejects_unknown() {
            let err = create_policy::<u32>("bogus").unwrap_err();
            assert_eq!(err, PolicyError::UnknownPolicy("bogus".into()));
        }

        #[test]
        fn builtins_differ_in_victim_choice() {
            let mut victims = Vec::new();
            for kind in PolicyKind::ALL {
                let mut policy = kind.build::<u32>();
                policy.track_addition(1);
                policy.track_addition(2);
                policy.track_addition(3);
                policy.track_get(&1);
                victims.push(policy.evict());
            }
            assert_eq!(victims, vec![Some(1), Some(3), Some(2)]);
        }

        #[test]
        fn custom_dispatches_to_inner() {
            let mut policy = Policy::custom("inert", Inert);
            assert_eq!(policy.name(), "inert");
            assert_eq!(policy.kind(), None);
            policy.track_addition(5);
            assert_eq!(policy.evict(), None);
            assert!(!policy.contains(&5));
            assert!(format!("{:?}", policy).contains("inert"));
        }
    }
}
