//! Counter store: the access-counter half of the cache, layered over the KVS client.
//!
//! `observe` is what the coordinator calls on every request that finds an existing
//! entry; `peek` is a read-only check used by tests and diagnostics. Entry birth
//! (first-ever access) is handled here too, since it's really "increment a counter
//! that doesn't exist yet" rather than a separate code path.

use std::sync::Arc;
use std::time::Duration;

use crate::error::KvsError;
use crate::kvs::KvsClient;

pub struct CounterStore {
    kvs: Arc<dyn KvsClient>,
    base_ttl: Duration,
}

impl CounterStore {
    pub fn new(kvs: Arc<dyn KvsClient>, base_ttl: Duration) -> Self {
        Self { kvs, base_ttl }
    }

    /// Increments the counter for an existing entry.
    ///
    /// This assumes the caller has already confirmed the key exists; it does not
    /// create new entries (that's `observe_new`). A non-existent key still resolves
    /// to access=1 via `HINCRBY`'s auto-create-at-zero semantics, matching the
    /// concurrent-creation race the original design tolerates.
    pub async fn observe(&self, key: &str) -> Result<i64, KvsError> {
        self.kvs.incr_access(key).await
    }

    /// Creates a brand-new entry with access=1 and the base TTL. Called once per key
    /// on the first-ever cache miss.
    pub async fn observe_new(&self, key: &str) -> Result<(), KvsError> {
        self.kvs.set_access(key, 1).await?;
        self.kvs.expire(key, self.base_ttl.as_secs()).await
    }

    pub async fn peek(&self, key: &str) -> i64 {
        self.kvs.get_access(key).await
    }
}
