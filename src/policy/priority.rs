//! Priority Index Module
//!
//! Keyed priorities over a binary heap with lazy deletion.
//!
//! Every assignment pushes a fresh heap record stamped with a sequence
//! number and makes that number the key's authoritative version. Older
//! records for the same key stay in the heap until they surface in `pop`,
//! where a version mismatch marks them stale and they are dropped.
//!
//! ```text
//!   versions: { "a" -> (3, seq 4), "b" -> (1, seq 1) }
//!   heap:     ("a", 3, seq 4)  live
//!             ("b", 1, seq 1)  live
//!             ("a", 2, seq 2)  stale, versions["a"].seq == 4
//! ```

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use super::EvictionOrder;

/// Heap records allowed per live key before `maybe_rebuild` compacts.
const STALE_FACTOR: usize = 4;

/// Heaps smaller than this are never compacted.
const MIN_REBUILD_LEN: usize = 64;

// == Heap Record ==
#[derive(Debug, Clone)]
struct HeapRecord {
    priority: i64,
    seq: u64,
    key: String,
    order: EvictionOrder,
}

impl PartialEq for HeapRecord {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for HeapRecord {}

impl PartialOrd for HeapRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapRecord {
    // BinaryHeap pops the greatest record, so "greater" means "evict sooner".
    // Equal priorities fall back to the lower sequence number.
    fn cmp(&self, other: &Self) -> Ordering {
        let by_priority = match self.order {
            EvictionOrder::Least => other.priority.cmp(&self.priority),
            EvictionOrder::Most => self.priority.cmp(&other.priority),
        };
        by_priority.then_with(|| other.seq.cmp(&self.seq))
    }
}

// == Version ==
#[derive(Debug, Clone, Copy)]
struct Version {
    priority: i64,
    seq: u64,
}

// == Priority Index ==
/// Maps keys to `i64` priorities and pops the extreme key per [`EvictionOrder`].
///
/// Reprioritization is O(log n): the previous record is retired by bumping
/// the key's version rather than being searched for in the heap.
#[derive(Debug)]
pub struct PriorityIndex {
    order: EvictionOrder,
    /// Authoritative priority and live record sequence per key
    versions: HashMap<String, Version>,
    /// Records ordered for eviction, possibly stale
    heap: BinaryHeap<HeapRecord>,
    /// Next sequence number, also the tie-breaker
    seq: u64,
}

impl PriorityIndex {
    // == Constructor ==
    /// Creates an empty index that pops according to `order`.
    pub fn new(order: EvictionOrder) -> Self {
        Self {
            order,
            versions: HashMap::new(),
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    /// Returns the ordering this index pops by.
    pub fn order(&self) -> EvictionOrder {
        self.order
    }

    /// Switches the ordering, re-sorting any live records.
    pub fn set_order(&mut self, order: EvictionOrder) {
        if self.order != order {
            self.order = order;
            self.rebuild();
        }
    }

    // == Set Priority ==
    /// Records `priority` for `key` unconditionally.
    ///
    /// A previous record for the key, if any, is superseded and skipped later.
    pub fn set_priority(&mut self, key: &str, priority: i64) {
        self.push(key, priority);
    }

    // == Replace Priority ==
    /// Replaces the priority of `key`, returning the previous one.
    ///
    /// After the call the key has exactly one live record.
    pub fn replace_priority(&mut self, key: &str, priority: i64) -> Option<i64> {
        let previous = self.priority_of(key);
        self.push(key, priority);
        previous
    }

    // == Increment Priority ==
    /// Bumps the priority of `key` by one (starting at 1) and returns it.
    pub fn increment_priority(&mut self, key: &str) -> i64 {
        let next = match self.priority_of(key) {
            Some(current) => current.saturating_add(1),
            None => 1,
        };
        self.push(key, next);
        next
    }

    // == Pop ==
    /// Removes and returns the extreme live key with its priority.
    pub fn pop(&mut self) -> Option<(String, i64)> {
        while let Some(record) = self.heap.pop() {
            if self.is_live(&record) {
                self.versions.remove(&record.key);
                return Some((record.key, record.priority));
            }
        }
        None
    }

    // == Pop Except ==
    /// Like [`pop`](Self::pop), but leaves the live record of `keep` in place.
    pub fn pop_except(&mut self, keep: &str) -> Option<(String, i64)> {
        let mut held = None;
        let mut found = None;

        while let Some(record) = self.heap.pop() {
            if !self.is_live(&record) {
                continue;
            }
            if record.key == keep {
                held = Some(record);
                continue;
            }
            self.versions.remove(&record.key);
            found = Some((record.key, record.priority));
            break;
        }

        if let Some(record) = held {
            self.heap.push(record);
        }
        found
    }

    // == Lookup ==
    /// Returns the current priority of `key`, if it has one.
    pub fn priority_of(&self, key: &str) -> Option<i64> {
        self.versions.get(key).map(|version| version.priority)
    }

    /// Checks whether `key` has a live record.
    pub fn contains(&self, key: &str) -> bool {
        self.versions.contains_key(key)
    }

    // == Length ==
    /// Returns the number of keys with a live record.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Returns true if no key has a live record.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Returns the raw heap length, stale records included.
    pub fn heap_len(&self) -> usize {
        self.heap.len()
    }

    // == Clear ==
    /// Drops all bookkeeping. The sequence counter keeps counting.
    pub fn clear(&mut self) {
        self.versions.clear();
        self.heap.clear();
    }

    // == Rebuild ==
    /// Rebuilds the heap from the live versions, discarding stale records.
    pub fn rebuild(&mut self) {
        let order = self.order;
        self.heap = self
            .versions
            .iter()
            .map(|(key, version)| HeapRecord {
                priority: version.priority,
                seq: version.seq,
                key: key.clone(),
                order,
            })
            .collect();
    }

    /// Rebuilds once stale records clearly outnumber live ones.
    ///
    /// Returns true if a rebuild happened.
    pub fn maybe_rebuild(&mut self) -> bool {
        let heap_len = self.heap.len();
        if heap_len >= MIN_REBUILD_LEN && heap_len > self.versions.len() * STALE_FACTOR {
            self.rebuild();
            true
        } else {
            false
        }
    }

    // == Internals ==
    fn push(&mut self, key: &str, priority: i64) {
        let seq = self.seq;
        self.seq += 1;
        self.versions.insert(key.to_string(), Version { priority, seq });
        self.heap.push(HeapRecord {
            priority,
            seq,
            key: key.to_string(),
            order: self.order,
        });
    }

    fn is_live(&self, record: &HeapRecord) -> bool {
        self.versions
            .get(&record.key)
            .is_some_and(|version| version.seq == record.seq)
    }
}

impl Default for PriorityIndex {
    fn default() -> Self {
        Self::new(EvictionOrder::Least)
    }
}
