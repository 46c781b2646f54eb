//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Misses are not errors: `get` and `remove` on an absent key return `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Construction parameters or configuration values are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The policy ran out of candidates while the store was full
    #[error("Eviction exhausted: no live candidate while holding {len} of {capacity} entries")]
    EvictionExhausted { len: usize, capacity: usize },
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
