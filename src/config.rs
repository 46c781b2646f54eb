//! Configuration Module
//!
//! Handles loading cache configuration from environment variables or serde.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};
use crate::policy::{EvictionOrder, Policy, PolicyKind};

/// Capacity used when none is configured.
pub const DEFAULT_CAPACITY: usize = 10;

/// Cache construction parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of live entries
    pub capacity: usize,
    /// Signal that drives eviction priority
    pub policy: PolicyKind,
    /// Whether the smallest or largest priority is evicted first
    pub ordering: EvictionOrder,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum live entries (default: 10)
    /// - `CACHE_POLICY` - `frequency`, `recent-access`, `recent-add` or `size` (default: frequency)
    /// - `CACHE_ORDERING` - `least` or `most` (default: least)
    ///
    /// Unparsable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            capacity: lookup("CACHE_CAPACITY")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.capacity),
            policy: lookup("CACHE_POLICY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.policy),
            ordering: lookup("CACHE_ORDERING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.ordering),
        }
    }

    // == Validate ==
    /// Rejects configurations no cache can be built from.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the policy this configuration describes.
    pub fn build_policy(&self) -> Policy {
        Policy::new(self.policy, self.ordering)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            policy: PolicyKind::Frequency,
            ordering: EvictionOrder::Least,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.capacity, 10);
        assert_eq!(config.policy, PolicyKind::Frequency);
        assert_eq!(config.ordering, EvictionOrder::Least);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_lookup() {
        let config = CacheConfig::from_lookup(lookup_from(&[
            ("CACHE_CAPACITY", "3"),
            ("CACHE_POLICY", "recent-add"),
            ("CACHE_ORDERING", "most"),
        ]));
        assert_eq!(config.capacity, 3);
        assert_eq!(config.policy, PolicyKind::RecentAdd);
        assert_eq!(config.ordering, EvictionOrder::Most);
    }

    #[test]
    fn test_config_from_lookup_defaults() {
        let config = CacheConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, CacheConfig::default());
    }

    #[test]
    fn test_config_from_lookup_ignores_garbage() {
        let config = CacheConfig::from_lookup(lookup_from(&[
            ("CACHE_CAPACITY", "lots"),
            ("CACHE_POLICY", "lru"),
            ("CACHE_ORDERING", "sideways"),
        ]));
        assert_eq!(config, CacheConfig::default());
    }

    #[test]
    fn test_config_validate_zero_capacity() {
        let config = CacheConfig {
            capacity: 0,
            ..CacheConfig::default()
        };
        assert!(matches!(config.validate(), Err(CacheError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: CacheConfig =
            serde_json::from_str(r#"{"capacity": 3, "policy": "size"}"#).unwrap();
        assert_eq!(config.capacity, 3);
        assert_eq!(config.policy, PolicyKind::Size);
        assert_eq!(config.ordering, EvictionOrder::Least);
    }

    #[test]
    fn test_config_deserialize_rejects_unknown_policy() {
        let result: std::result::Result<CacheConfig, _> =
            serde_json::from_str(r#"{"policy": "lru"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_policy() {
        let config = CacheConfig {
            capacity: 5,
            policy: PolicyKind::RecentAccess,
            ordering: EvictionOrder::Most,
        };
        let policy = config.build_policy();
        assert_eq!(policy.kind(), PolicyKind::RecentAccess);
        assert_eq!(policy.order(), EvictionOrder::Most);
    }
}
