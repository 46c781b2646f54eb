//! Cache Store Module
//!
//! Bounded key/value store that delegates eviction choices to a policy.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::cache::CacheStats;
use crate::config::{CacheConfig, DEFAULT_CAPACITY};
use crate::error::{CacheError, Result};
use crate::policy::{EvictionPolicy, Policy};

// == Bounded Cache ==
/// Key/value cache holding at most `capacity` entries.
///
/// Reads and writes are reported to the policy. The policy is not told about
/// `remove`, so its candidates can name keys that are already gone; those
/// are skipped during eviction.
#[derive(Debug)]
pub struct BoundedCache<P = Policy> {
    /// Key-value storage
    entries: HashMap<String, String>,
    /// Eviction policy
    policy: P,
    /// Usage statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl BoundedCache<Policy> {
    /// Creates a cache from a validated configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        info!(
            "Cache configured: capacity={}, policy={}, ordering={}",
            config.capacity, config.policy, config.ordering
        );
        Self::new(config.capacity, config.build_policy())
    }
}

impl Default for BoundedCache<Policy> {
    /// Capacity 10, least-frequency eviction.
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            policy: Policy::default(),
            stats: CacheStats::new(),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl<P: EvictionPolicy> BoundedCache<P> {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, must be positive
    /// * `policy` - Strategy choosing which key to evict
    pub fn new(capacity: usize, policy: P) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be a positive integer".to_string(),
            ));
        }
        Ok(Self {
            entries: HashMap::new(),
            policy,
            stats: CacheStats::new(),
            capacity,
        })
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// The read is reported to the policy whether or not the key is present.
    pub fn get(&mut self, key: &str) -> Option<&str> {
        let value = self.entries.get(key).map(String::as_str);
        self.policy.track_read(key, value);

        if value.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        value
    }

    // == Put ==
    /// Stores a key-value pair, replacing any previous value.
    ///
    /// The write is reported to the policy first. If the key is new and the
    /// cache is full, one entry chosen by the policy is evicted.
    ///
    /// # Errors
    /// `EvictionExhausted` if the policy has no stored key left to offer.
    /// The cache is left unchanged in that case.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        let value = value.into();

        self.policy.track_write(&key, &value);

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_for(&key)?;
        }

        self.entries.insert(key, value);
        self.stats.set_total_entries(self.entries.len());
        Ok(())
    }

    // == Remove ==
    /// Removes an entry by key, returning its value.
    ///
    /// The policy keeps its record for the key until it is next offered.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let removed = self.entries.remove(key);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Clear ==
    /// Removes all entries and all policy state.
    pub fn clear(&mut self) {
        self.policy.clear();
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    // == Accessors ==
    /// Checks whether `key` is stored, without reporting a read.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Eviction ==
    /// Evicts one stored entry to make room for `incoming`.
    ///
    /// Asks for at most as many candidates as the policy tracks, so a policy
    /// that only offers absent keys ends in an error instead of a spin.
    fn evict_for(&mut self, incoming: &str) -> Result<()> {
        let budget = self.policy.tracked_len();

        for _ in 0..budget {
            let Some(candidate) = self.policy.evict_candidate_except(incoming) else {
                break;
            };

            if self.entries.remove(&candidate).is_some() {
                debug!(evicted = %candidate, incoming = %incoming, "Evicted entry");
                self.stats.record_eviction();
                return Ok(());
            }

            debug!(candidate = %candidate, "Skipped stale eviction candidate");
            self.stats.record_stale_candidate();
        }

        warn!(
            "No live eviction candidate for '{}' with {} of {} entries stored",
            incoming,
            self.entries.len(),
            self.capacity
        );
        Err(CacheError::EvictionExhausted {
            len: self.entries.len(),
            capacity: self.capacity,
        })
    }
}
