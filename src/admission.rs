//! Admission policy: decides when a file first gets written into the hot tier.
//!
//! `LoadCount` is the access-count threshold; `BaseTTL` is the lifetime given to a
//! newly-admitted entry's data.

use std::time::Duration;

pub struct AdmissionPolicy {
    pub load_count: i64,
    pub base_ttl: Duration,
}

impl AdmissionPolicy {
    pub fn new(load_count: i64, base_ttl: Duration) -> Self {
        Self {
            load_count,
            base_ttl,
        }
    }

    /// A request is in the admission band once its observed count exceeds `LoadCount`.
    pub fn in_band(&self, observed: i64) -> bool {
        observed > self.load_count
    }

    /// True for exactly one request per key: the one that observes count == LoadCount+1.
    ///
    /// This equality, not `in_band`, is what triggers the disk read + KVS write. Every
    /// other in-band request (count > LoadCount+1) finds data already admitted and just
    /// reads it back. Since `IncrAccess` is atomic and strictly increasing, each integer
    /// value is observed by at most one caller, so this is a lock-free way to guarantee
    /// the admission write happens exactly once — as long as nothing else ever sets the
    /// counter backwards or skips a value.
    pub fn is_admission_edge(&self, observed: i64) -> bool {
        observed == self.load_count + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> AdmissionPolicy {
        AdmissionPolicy::new(5, Duration::from_secs(60))
    }

    #[test]
    fn edge_is_exactly_load_count_plus_one() {
        let p = policy();
        assert!(!p.is_admission_edge(5));
        assert!(p.is_admission_edge(6));
        assert!(!p.is_admission_edge(7));
    }

    #[test]
    fn in_band_once_over_threshold() {
        let p = policy();
        assert!(!p.in_band(5));
        assert!(p.in_band(6));
        assert!(p.in_band(100));
    }
}
