//! Cache Module
//!
//! Bounded key/value storage with policy-driven eviction.

mod stats;
mod store;


// Re-export public types
pub use stats::CacheStats;
pub use store::BoundedCache;
