//! Hit-ratio telemetry.
//!
//! `HitRatioCounter` tracks hits and total lookups since the last reset, guarded by a
//! single lock per the binary-semaphore discipline the source design uses for every
//! piece of shared mutable state outside the KVS itself. `total` starts at 1 (never 0)
//! so `sample` is a safe integer division at every point in its lifecycle.

use parking_lot::Mutex;

struct Counts {
    hits: u64,
    total: u64,
}

pub struct HitRatioCounter {
    inner: Mutex<Counts>,
}

impl HitRatioCounter {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Counts { hits: 0, total: 1 }),
        }
    }

    pub fn count_hit(&self) {
        let mut c = self.inner.lock();
        c.hits += 1;
        c.total += 1;
    }

    pub fn count_miss(&self) {
        let mut c = self.inner.lock();
        c.total += 1;
    }

    /// Hit percentage as an integer in `0..=100`, floored.
    pub fn sample(&self) -> u32 {
        let c = self.inner.lock();
        ((c.hits * 100) / c.total) as u32
    }

    /// Resets the window: hits back to zero, total back to one.
    pub fn reset(&self) {
        let mut c = self.inner.lock();
        c.hits = 0;
        c.total = 1;
    }
}

impl Default for HitRatioCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_starts_at_zero() {
        let c = HitRatioCounter::new();
        assert_eq!(c.sample(), 0);
    }

    #[test]
    fn sample_reflects_hit_ratio() {
        let c = HitRatioCounter::new();
        c.count_hit();
        c.count_hit();
        c.count_miss();
        // 2 hits, 1 miss, total = 2 + 1 + 1 (initial) = 4 -> 50%
        assert_eq!(c.sample(), 50);
    }

    #[test]
    fn reset_returns_to_baseline() {
        let c = HitRatioCounter::new();
        c.count_hit();
        c.count_miss();
        c.reset();
        assert_eq!(c.sample(), 0);
    }

    #[test]
    fn sample_never_exceeds_100() {
        let c = HitRatioCounter::new();
        c.count_hit();
        assert!(c.sample() <= 100);
    }
}
