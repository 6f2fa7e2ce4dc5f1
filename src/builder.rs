//! Cache configuration and builder.
//!
//! [`CacheConfig`] is the plain data an application loads or hard-codes;
//! [`CacheBuilder`] turns it into a [`Cache`], optionally resolving the policy
//! name through a [`PolicyRegistry`].
//!
//! ## Example
//!
//! ```rust
//! use evictkit::builder::CacheBuilder;
//! use evictkit::policy::PolicyKind;
//!
//! let cache = CacheBuilder::new(100)
//!     .policy(PolicyKind::Fifo)
//!     .build::<u64, String>()
//!     .unwrap();
//! cache.put(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some("hello".to_string()));
//! assert_eq!(cache.policy_name(), "fifo");
//! ```

use std::hash::Hash;

use crate::cache::Cache;
use crate::error::PolicyError;
use crate::policy::PolicyKind;
use crate::registry::PolicyRegistry;

/// Capacity used by [`CacheConfig::default`].
pub const DEFAULT_CAPACITY: usize = 128;

/// Declarative cache settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries; 0 disables storage.
    pub capacity: usize,
    /// Policy name, resolved at build time.
    pub policy: String,
}

impl Default for CacheConfig {
    /// Defaults to [`DEFAULT_CAPACITY`] entries with LRU eviction.
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            policy: PolicyKind::Lru.as_str().to_string(),
        }
    }
}

/// Builder for [`Cache`] instances.
#[derive(Debug, Clone)]
pub struct CacheBuilder {
    config: CacheConfig,
    registry: Option<PolicyRegistry>,
}

impl CacheBuilder {
    /// Starts from the default config with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self::from_config(CacheConfig {
            capacity,
            ..CacheConfig::default()
        })
    }

    pub fn from_config(config: CacheConfig) -> Self {
        Self {
            config,
            registry: None,
        }
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Sets the policy by name. Accepts `&str`, `String` or [`PolicyKind`].
    pub fn policy(mut self, name: impl Into<PolicyName>) -> Self {
        self.config.policy = name.into().0;
        self
    }

    /// Resolves the policy name through `registry` first.
    pub fn registry(mut self, registry: PolicyRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Builds the cache.
    ///
    /// # Errors
    ///
    /// [`PolicyError::UnknownPolicy`] if the configured name resolves to
    /// nothing.
    pub fn build<K, V>(self) -> Result<Cache<K, V>, PolicyError>
    where
        K: Clone + Eq + Hash + 'static,
    {
        let registry = self.registry.unwrap_or_default();
        Cache::with_registry(self.config.capacity, &self.config.policy, &registry)
    }
}

/// Policy name accepted by [`CacheBuilder::policy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyName(String);

impl From<&str> for PolicyName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for PolicyName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<PolicyKind> for PolicyName {
    fn from(kind: PolicyKind) -> Self {
        Self(kind.as_str().to_string())
    }
}
