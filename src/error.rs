//! Error types for evictkit.
//!
//! ## Key Components
//!
//! - [`PolicyError`]: Returned when a policy name cannot be resolved, or when
//!   a fallible registration collides with an existing one.
//! - [`InvariantError`]: Returned by `check_invariants` when the value table
//!   and the policy's tracking structure disagree.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::cache::Cache;
//! use evictkit::error::PolicyError;
//!
//! let err = Cache::<u64, u64>::new(16, "bogus").unwrap_err();
//! assert_eq!(err, PolicyError::UnknownPolicy("bogus".to_string()));
//! assert_eq!(err.to_string(), "unknown eviction policy: bogus");
//! ```

use thiserror::Error;

/// Failure to resolve or register an eviction policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// The name matches neither a registered constructor nor a built-in.
    #[error("unknown eviction policy: {0}")]
    UnknownPolicy(String),

    /// A constructor for this name and key type is already registered.
    #[error("policy with name {0} is already registered")]
    AlreadyRegistered(String),
}

impl PolicyError {
    /// The policy name the error refers to.
    pub fn name(&self) -> &str {
        match self {
            PolicyError::UnknownPolicy(name) | PolicyError::AlreadyRegistered(name) => name,
        }
    }
}

/// Error returned when internal cache invariants are violated.
///
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}
