//! evictkit: a bounded in-process key-value cache with pluggable eviction.
//!
//! A [`Cache`] owns the value table and delegates every ordering decision to
//! one eviction policy, chosen by name at construction. The built-in names
//! are `"fifo"`, `"lifo"` and `"lru"`; further strategies are registered by
//! name in a [`PolicyRegistry`].
//!
//! ```
//! use evictkit::prelude::*;
//!
//! let cache: Cache<&str, u32> = Cache::new(3, "lru")?;
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.put("c", 3);
//! cache.get(&"a");
//! cache.put("d", 4); // evicts "b"
//! assert!(!cache.contains(&"b"));
//! # Ok::<(), PolicyError>(())
//! ```
//!
//! See `DESIGN.md` for internal architecture and invariants.

pub mod builder;
pub mod cache;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod registry;

#[cfg(feature = "metrics")]
pub mod metrics;

pub use crate::builder::{CacheBuilder, CacheConfig};
pub use crate::cache::Cache;
pub use crate::error::{InvariantError, PolicyError};
#[cfg(feature = "metrics")]
pub use crate::metrics::CacheMetricsSnapshot;
pub use crate::policy::{EvictionPolicy, Policy, PolicyKind};
pub use crate::registry::PolicyRegistry;
