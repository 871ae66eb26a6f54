//! Retention policy: decides whether an already-hot entry gets its TTL extended.
//!
//! Resolves an open question from the source design: on every hot hit the TTL is
//! unconditionally overwritten to `HotTTL`, not extended only if that would be longer.
//! A hot key therefore never expires while it keeps getting accessed past `ExtendCount`.

use std::time::Duration;

pub struct RetentionPolicy {
    pub extend_count: i64,
    pub hot_ttl: Duration,
}

impl RetentionPolicy {
    pub fn new(extend_count: i64, hot_ttl: Duration) -> Self {
        Self {
            extend_count,
            hot_ttl,
        }
    }

    /// True once the observed access count exceeds `ExtendCount`.
    pub fn is_hot(&self, observed: i64) -> bool {
        observed > self.extend_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hot_only_strictly_above_threshold() {
        let p = RetentionPolicy::new(10, Duration::from_secs(3600));
        assert!(!p.is_hot(10));
        assert!(p.is_hot(11));
    }
}
