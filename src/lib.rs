//! Policy Cache - A bounded in-memory key/value cache
//!
//! The cache stores values and asks a pluggable eviction policy which key to
//! drop when it is full. Built-in policies rank keys by read count, last
//! read, last write or value size, evicting either the least or the most.
//!
//! ```
//! use policy_cache::{BoundedCache, Policy};
//!
//! let mut cache = BoundedCache::new(2, Policy::size().most()).unwrap();
//! cache.put("a", "x").unwrap();
//! cache.put("b", "xxxx").unwrap();
//! cache.put("c", "xx").unwrap();
//!
//! assert_eq!(cache.get("b"), None);
//! assert_eq!(cache.get("a"), Some("x"));
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod policy;

pub use cache::{BoundedCache, CacheStats};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use policy::{EvictionOrder, EvictionPolicy, Policy, PolicyKind};
