//! Name-based registry of custom eviction policy constructors.
//!
//! A [`PolicyRegistry`] maps `(name, key type)` to a constructor. Entries for
//! different key types never collide, so `"clock"` may be registered once for
//! `u64` keys and once for `String` keys. Resolution is registry-first: a
//! custom constructor registered as `"lru"` shadows the built-in LRU for that
//! key type.
//!
//! The registry is an explicit value rather than process-wide state. Clones
//! share the same table, so an application registers its policies once at
//! startup and hands clones to whatever builds caches. The table is guarded
//! by its own lock, independent of any cache's lock.
//!
//! ```
//! use evictkit::policy::{FifoPolicy, PolicyKind};
//! use evictkit::registry::PolicyRegistry;
//!
//! let registry = PolicyRegistry::new();
//! registry.register::<u64, _, _>("queue", FifoPolicy::<u64>::new);
//!
//! let custom = registry.create_policy::<u64>("queue").unwrap();
//! assert_eq!(custom.name(), "queue");
//! assert_eq!(custom.kind(), None);
//!
//! let builtin = registry.create_policy::<u64>("lru").unwrap();
//! assert_eq!(builtin.kind(), Some(PolicyKind::Lru));
//!
//! assert!(registry.create_policy::<u64>("bogus").is_err());
//! ```

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::info;

use crate::error::PolicyError;
use crate::policy::{self, EvictionPolicy, Policy};

/// Boxed constructor for a policy over keys of type `K`.
pub type PolicyConstructor<K> = Arc<dyn Fn() -> Box<dyn EvictionPolicy<K> + Send> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RegistryKey {
    name: String,
    key_type: TypeId,
}

impl RegistryKey {
    fn of<K: 'static>(name: &str) -> Self {
        Self {
            name: name.to_string(),
            key_type: TypeId::of::<K>(),
        }
    }
}

type Entries = FxHashMap<RegistryKey, Box<dyn Any + Send + Sync>>;

/// Shared table of named policy constructors.
#[derive(Clone, Default)]
pub struct PolicyRegistry {
    entries: Arc<RwLock<Entries>>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `constructor` under `name` for keys of type `K`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered for `K`. Registration is a
    /// startup-time configuration step; a duplicate is a programming error.
    pub fn register<K, P, F>(&self, name: &str, constructor: F)
    where
        K: 'static,
        P: EvictionPolicy<K> + Send + 'static,
        F: Fn() -> P + Send + Sync + 'static,
    {
        if let Err(err) = self.try_register::<K, P, F>(name, constructor) {
            panic!("{err}");
        }
    }

    /// Like [`register`](Self::register), but reports a duplicate as
    /// [`PolicyError::AlreadyRegistered`] instead of panicking.
    pub fn try_register<K, P, F>(&self, name: &str, constructor: F) -> Result<(), PolicyError>
    where
        K: 'static,
        P: EvictionPolicy<K> + Send + 'static,
        F: Fn() -> P + Send + Sync + 'static,
    {
        let key = RegistryKey::of::<K>(name);
        let mut entries = self.entries.write();
        if entries.contains_key(&key) {
            return Err(PolicyError::AlreadyRegistered(name.to_string()));
        }

        let boxed: PolicyConstructor<K> =
            Arc::new(move || Box::new(constructor()) as Box<dyn EvictionPolicy<K> + Send>);
        entries.insert(key, Box::new(boxed));
        drop(entries);

        info!(policy = name, key_type = type_name::<K>(), "registered eviction policy");
        Ok(())
    }

    /// Returns `true` if a constructor is registered under `name` for `K`.
    pub fn is_registered<K: 'static>(&self, name: &str) -> bool {
        self.entries.read().contains_key(&RegistryKey::of::<K>(name))
    }

    /// Names registered for `K`, sorted.
    pub fn registered_names<K: 'static>(&self) -> Vec<String> {
        let key_type = TypeId::of::<K>();
        let mut names: Vec<String> = self
            .entries
            .read()
            .keys()
            .filter(|key| key.key_type == key_type)
            .map(|key| key.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Total registrations across all key types.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns the constructor registered under `name` for `K`, if any.
    pub fn lookup<K: 'static>(&self, name: &str) -> Option<PolicyConstructor<K>> {
        self.entries
            .read()
            .get(&RegistryKey::of::<K>(name))
            .and_then(|ctor| ctor.downcast_ref::<PolicyConstructor<K>>())
            .cloned()
    }

    /// Resolves `name` to a fresh policy instance.
    ///
    /// Registered constructors win; otherwise the literal built-in names
    /// `"fifo"`, `"lifo"`, `"lru"` apply. Anything else is
    /// [`PolicyError::UnknownPolicy`].
    pub fn create_policy<K>(&self, name: &str) -> Result<Policy<K>, PolicyError>
    where
        K: Clone + Eq + Hash + 'static,
    {
        // The constructor runs outside the registry lock.
        match self.lookup::<K>(name) {
            Some(constructor) => Ok(Policy::Custom {
                name: name.to_string(),
                inner: constructor(),
            }),
            None => policy::create_policy(name),
        }
    }
}

impl fmt::Debug for PolicyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyRegistry")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
