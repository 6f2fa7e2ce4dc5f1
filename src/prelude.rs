pub use crate::builder::{CacheBuilder, CacheConfig};
pub use crate::cache::Cache;
pub use crate::error::PolicyError;
pub use crate::policy::{EvictionPolicy, FifoPolicy, LifoPolicy, LruPolicy, Policy, PolicyKind};
pub use crate::registry::PolicyRegistry;
