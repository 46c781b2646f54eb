//! Monotonic Clock Module
//!
//! Nanosecond timestamps for the recency policies.

use std::time::Instant;

// == Monotonic Clock ==
/// Hands out strictly increasing nanosecond timestamps.
///
/// Timestamps count from the clock's creation. Two reads that land on the
/// same `Instant` tick are still ordered by call order.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
    last: i64,
}

impl MonotonicClock {
    // == Constructor ==
    /// Creates a clock starting at zero now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            last: -1,
        }
    }

    // == Now ==
    /// Returns a timestamp greater than every previously returned one.
    pub fn now(&mut self) -> i64 {
        let elapsed = i64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(i64::MAX);
        let next = if elapsed > self.last {
            elapsed
        } else {
            self.last.saturating_add(1)
        };
        self.last = next;
        next
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}
