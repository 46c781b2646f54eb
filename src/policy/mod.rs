//! Policy Module
//!
//! Eviction policies deciding which key the cache removes next.
//!
//! Every built-in variant shares one [`PriorityIndex`] and differs only in
//! which events it tracks and what it records as priority:
//!
//! | Kind           | Tracks on | Priority                          |
//! |----------------|-----------|-----------------------------------|
//! | `Frequency`    | read      | number of reads                   |
//! | `RecentAccess` | read      | timestamp of the last read        |
//! | `RecentAdd`    | write     | timestamp of the last write       |
//! | `Size`         | write     | character length of the value     |

mod clock;
mod priority;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

pub use clock::MonotonicClock;
pub use priority::PriorityIndex;

// == Eviction Order ==
/// Which end of the priority range is evicted first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionOrder {
    /// Evict the smallest priority first
    #[default]
    Least,
    /// Evict the largest priority first
    Most,
}

impl fmt::Display for EvictionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionOrder::Least => f.write_str("least"),
            EvictionOrder::Most => f.write_str("most"),
        }
    }
}

impl FromStr for EvictionOrder {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "least" => Ok(EvictionOrder::Least),
            "most" => Ok(EvictionOrder::Most),
            other => Err(CacheError::InvalidConfig(format!(
                "unknown eviction order '{}', expected 'least' or 'most'",
                other
            ))),
        }
    }
}

// == Policy Kind ==
/// The signal that drives eviction priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// Read count
    #[default]
    Frequency,
    /// Time of the last read
    RecentAccess,
    /// Time of the last write
    RecentAdd,
    /// Length of the stored value
    Size,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PolicyKind::Frequency => "frequency",
            PolicyKind::RecentAccess => "recent-access",
            PolicyKind::RecentAdd => "recent-add",
            PolicyKind::Size => "size",
        };
        f.write_str(name)
    }
}

impl FromStr for PolicyKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "frequency" => Ok(PolicyKind::Frequency),
            "recent-access" => Ok(PolicyKind::RecentAccess),
            "recent-add" => Ok(PolicyKind::RecentAdd),
            "size" => Ok(PolicyKind::Size),
            _ => Err(CacheError::InvalidConfig(format!(
                "unknown policy '{}', expected one of frequency, recent-access, recent-add, size",
                s.trim()
            ))),
        }
    }
}

// == Eviction Policy Trait ==
/// Capability set the cache drives its policy through.
///
/// A policy sees every read and write but never the cache's store, so the
/// keys it hands back may already be gone. The cache checks each candidate.
pub trait EvictionPolicy {
    /// Called on every `get`, with the current value or `None` on a miss.
    fn track_read(&mut self, key: &str, value: Option<&str>);

    /// Called on every `put`, before any eviction.
    fn track_write(&mut self, key: &str, value: &str);

    /// Takes the next key to evict, or `None` when nothing is tracked.
    fn evict_candidate(&mut self) -> Option<String>;

    /// Takes the next key to evict other than `keep`.
    ///
    /// The cache calls this while inserting `keep`. The default ignores
    /// `keep`; a candidate equal to it is then discarded like any absent key.
    fn evict_candidate_except(&mut self, keep: &str) -> Option<String> {
        let _ = keep;
        self.evict_candidate()
    }

    /// Number of keys the policy could still offer.
    ///
    /// Bounds how many candidates the cache asks for during one eviction.
    fn tracked_len(&self) -> usize;

    /// Drops all tracking state.
    fn clear(&mut self);
}

// == Policy ==
/// The built-in eviction policy, one of four [`PolicyKind`]s.
///
/// Read-tracked kinds (`Frequency`, `RecentAccess`) also register a key on
/// its first write so that every stored key can be chosen for eviction.
/// Frequency registers at 0, RecentAccess at the write time. Writes never
/// change an existing record for these kinds.
#[derive(Debug)]
pub struct Policy {
    kind: PolicyKind,
    index: PriorityIndex,
    clock: MonotonicClock,
}

impl Policy {
    // == Constructors ==
    /// Creates a policy of the given kind and ordering.
    pub fn new(kind: PolicyKind, order: EvictionOrder) -> Self {
        Self {
            kind,
            index: PriorityIndex::new(order),
            clock: MonotonicClock::new(),
        }
    }

    /// Evicts by read count.
    pub fn frequency() -> Self {
        Self::new(PolicyKind::Frequency, EvictionOrder::Least)
    }

    /// Evicts by last read time.
    pub fn recent_access() -> Self {
        Self::new(PolicyKind::RecentAccess, EvictionOrder::Least)
    }

    /// Evicts by last write time.
    pub fn recent_add() -> Self {
        Self::new(PolicyKind::RecentAdd, EvictionOrder::Least)
    }

    /// Evicts by value length.
    pub fn size() -> Self {
        Self::new(PolicyKind::Size, EvictionOrder::Least)
    }

    // == Ordering Builders ==
    /// Evict the smallest priority first.
    pub fn least(mut self) -> Self {
        self.index.set_order(EvictionOrder::Least);
        self
    }

    /// Evict the largest priority first.
    pub fn most(mut self) -> Self {
        self.index.set_order(EvictionOrder::Most);
        self
    }

    // == Accessors ==
    pub fn kind(&self) -> PolicyKind {
        self.kind
    }

    pub fn order(&self) -> EvictionOrder {
        self.index.order()
    }

    /// Returns the recorded priority of `key`, if tracked.
    pub fn priority_of(&self, key: &str) -> Option<i64> {
        self.index.priority_of(key)
    }

    fn register(&mut self, key: &str, priority: i64) {
        if !self.index.contains(key) {
            self.index.set_priority(key, priority);
        }
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::frequency()
    }
}

impl EvictionPolicy for Policy {
    fn track_read(&mut self, key: &str, _value: Option<&str>) {
        match self.kind {
            PolicyKind::Frequency => {
                self.index.increment_priority(key);
            }
            PolicyKind::RecentAccess => {
                let now = self.clock.now();
                self.index.replace_priority(key, now);
            }
            PolicyKind::RecentAdd | PolicyKind::Size => return,
        }
        self.index.maybe_rebuild();
    }

    fn track_write(&mut self, key: &str, value: &str) {
        match self.kind {
            PolicyKind::Frequency => self.register(key, 0),
            PolicyKind::RecentAccess => {
                if !self.index.contains(key) {
                    let now = self.clock.now();
                    self.index.set_priority(key, now);
                }
            }
            PolicyKind::RecentAdd => {
                let now = self.clock.now();
                self.index.replace_priority(key, now);
            }
            PolicyKind::Size => {
                let len = i64::try_from(value.chars().count()).unwrap_or(i64::MAX);
                self.index.set_priority(key, len);
            }
        }
        self.index.maybe_rebuild();
    }

    fn evict_candidate(&mut self) -> Option<String> {
        self.index.pop().map(|(key, _)| key)
    }

    fn evict_candidate_except(&mut self, keep: &str) -> Option<String> {
        self.index.pop_except(keep).map(|(key, _)| key)
    }

    fn tracked_len(&self) -> usize {
        self.index.len()
    }

    fn clear(&mut self) {
        self.index.clear();
    }
}
