//! Cache coordinator: the decision tree behind every `/download` request.
//!
//! `fetch` is the single entry point. It observes the access counter for a key, then
//! picks one of four outcomes: serve from the hot tier and extend its TTL, admit the
//! file into the KVS (exactly once, at the admission edge), serve an already-admitted
//! file straight from the KVS, or fall back to disk. Every disk-sourced response is a
//! MISS and every KVS-sourced response is a HIT, regardless of which branch produced it.
//!
//! Errors that aren't "the file doesn't exist anywhere" are absorbed here per the
//! availability-biased propagation policy: a transient KVS failure, a failed admission
//! write, or a failed TTL extension are all logged and degrade to a disk read rather
//! than failing the request.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use crate::admission::AdmissionPolicy;
use crate::counter::CounterStore;
use crate::error::FetchError;
use crate::kvs::KvsClient;
use crate::logger::Logger;
use crate::origin::OriginReader;
use crate::retention::RetentionPolicy;
use crate::telemetry::HitRatioCounter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Kvs,
    Disk,
}

pub struct Coordinator {
    kvs: Arc<dyn KvsClient>,
    counters: CounterStore,
    admission: AdmissionPolicy,
    retention: RetentionPolicy,
    origin: OriginReader,
    telemetry: Arc<HitRatioCounter>,
    logger: Arc<Logger>,
}

impl Coordinator {
    pub fn new(
        kvs: Arc<dyn KvsClient>,
        base_ttl: Duration,
        admission: AdmissionPolicy,
        retention: RetentionPolicy,
        telemetry: Arc<HitRatioCounter>,
        logger: Arc<Logger>,
    ) -> Self {
        let counters = CounterStore::new(kvs.clone(), base_ttl);
        Self {
            kvs,
            counters,
            admission,
            retention,
            origin: OriginReader::new(),
            telemetry,
            logger,
        }
    }

    pub async fn fetch(&self, key: &str, disk_path: &Path) -> Result<(Bytes, Source), FetchError> {
        let exists = match self.kvs.exists(key).await {
            Ok(v) => v,
            Err(err) => {
                self.logger
                    .error_line(&format!("kvs EXISTS failed for {key}: {err}"))
                    .await;
                false
            }
        };

        if !exists {
            return self.birth_entry(key, disk_path).await;
        }

        let observed = match self.counters.observe(key).await {
            Ok(n) => n,
            Err(err) => {
                self.logger
                    .error_line(&format!("kvs IncrAccess failed for {key}: {err}"))
                    .await;
                // Can't trust the counter; fall back to disk without touching admission state.
                return self.read_from_disk(disk_path).await;
            }
        };

        if self.retention.is_hot(observed) {
            if let Ok(bytes) = self.kvs.get_data(key).await {
                if let Err(err) = self.kvs.expire(key, self.retention.hot_ttl.as_secs()).await {
                    self.logger
                        .error_line(&format!("kvs Expire (hot) failed for {key}: {err}"))
                        .await;
                }
                self.telemetry.count_hit();
                return Ok((Bytes::from(bytes), Source::Kvs));
            }
            // Data missing despite a hot counter (admission raced or was never written) — disk.
            return self.read_from_disk(disk_path).await;
        }

        if self.admission.in_band(observed) {
            if self.admission.is_admission_edge(observed) {
                return self.admit(key, disk_path).await;
            }
            if let Ok(bytes) = self.kvs.get_data(key).await {
                self.telemetry.count_hit();
                return Ok((Bytes::from(bytes), Source::Kvs));
            }
            return self.read_from_disk(disk_path).await;
        }

        self.read_from_disk(disk_path).await
    }

    /// Reads disk and uniformly records a miss. Used by every disk-fallback branch that
    /// does not also need to write admission state.
    async fn read_from_disk(&self, disk_path: &Path) -> Result<(Bytes, Source), FetchError> {
        let bytes = self.read_origin(disk_path).await?;
        Ok((bytes, Source::Disk))
    }

    async fn read_origin(&self, disk_path: &Path) -> Result<Bytes, FetchError> {
        match self.origin.read_all(disk_path).await {
            Ok(bytes) => {
                self.telemetry.count_miss();
                Ok(Bytes::from(bytes))
            }
            Err(err) => {
                let fetch_err: FetchError = err.into();
                if matches!(fetch_err, FetchError::Io(_)) {
                    self.logger
                        .error_line(&format!("origin read failed for {}: {fetch_err}", disk_path.display()))
                        .await;
                }
                Err(fetch_err)
            }
        }
    }

    /// The admission-edge branch: read disk, then write the bytes into the KVS with the
    /// base TTL. A failed write or TTL-set here is logged but the disk bytes are still
    /// returned — we never fail a request just because caching it didn't work.
    async fn admit(&self, key: &str, disk_path: &Path) -> Result<(Bytes, Source), FetchError> {
        let bytes = self.read_origin(disk_path).await?;

        match self.kvs.set_data(key, &bytes).await {
            Ok(()) => {
                if let Err(err) = self
                    .kvs
                    .expire(key, self.counters_base_ttl_secs())
                    .await
                {
                    self.logger
                        .error_line(&format!("kvs Expire (admit) failed for {key}: {err}"))
                        .await;
                }
            }
            Err(err) => {
                self.logger
                    .error_line(&format!("kvs SetData (admit) failed for {key}: {err}"))
                    .await;
            }
        }

        Ok((bytes, Source::Disk))
    }

    /// First-ever access to a key: read disk, then create the access-counter entry.
    /// On a disk NotFound, no entry is created — propagate the error untouched.
    async fn birth_entry(&self, key: &str, disk_path: &Path) -> Result<(Bytes, Source), FetchError> {
        let bytes = self.read_origin(disk_path).await?;

        if let Err(err) = self.counters.observe_new(key).await {
            self.logger
                .error_line(&format!("kvs entry birth failed for {key}: {err}"))
                .await;
        }

        Ok((bytes, Source::Disk))
    }

    fn counters_base_ttl_secs(&self) -> u64 {
        self.admission.base_ttl.as_secs()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::*;
    use crate::error::KvsError;

    /// In-memory stand-in for [`KvsClient`], with optional one-shot failure injection
    /// so the coordinator's error-handling branches can be exercised without a real
    /// Redis connection.
    #[derive(Default)]
    struct FakeKvs {
        entries: Mutex<HashMap<String, FakeEntry>>,
        exists_fails_once: AtomicBool,
        set_data_fails: AtomicBool,
    }

    #[derive(Default, Clone)]
    struct FakeEntry {
        data: Option<Vec<u8>>,
        access: i64,
        ttl_secs: Option<u64>,
    }

    impl FakeKvs {
        fn new() -> Self {
            Self::default()
        }

        fn fail_next_exists(&self) {
            self.exists_fails_once.store(true, Ordering::SeqCst);
        }

        fn fail_set_data(&self) {
            self.set_data_fails.store(true, Ordering::SeqCst);
        }

        fn entry(&self, key: &str) -> Option<FakeEntry> {
            self.entries.lock().get(key).cloned()
        }
    }

    #[async_trait]
    impl KvsClient for FakeKvs {
        async fn exists(&self, key: &str) -> Result<bool, KvsError> {
            if self.exists_fails_once.swap(false, Ordering::SeqCst) {
                return Err(KvsError::Transient("connection reset".into()));
            }
            Ok(self.entries.lock().contains_key(key))
        }

        async fn get_access(&self, key: &str) -> i64 {
            self.entries.lock().get(key).map_or(-1, |e| e.access)
        }

        async fn get_data(&self, key: &str) -> Result<Vec<u8>, KvsError> {
            self.entries
                .lock()
                .get(key)
                .and_then(|e| e.data.clone())
                .ok_or(KvsError::NotFound)
        }

        async fn set_data(&self, key: &str, data: &[u8]) -> Result<(), KvsError> {
            if self.set_data_fails.swap(false, Ordering::SeqCst) {
                return Err(KvsError::Transient("write failed".into()));
            }
            self.entries.lock().entry(key.to_string()).or_default().data = Some(data.to_vec());
            Ok(())
        }

        async fn set_access(&self, key: &str, value: i64) -> Result<(), KvsError> {
            self.entries.lock().entry(key.to_string()).or_default().access = value;
            Ok(())
        }

        async fn incr_access(&self, key: &str) -> Result<i64, KvsError> {
            let mut entries = self.entries.lock();
            let entry = entries.entry(key.to_string()).or_default();
            entry.access += 1;
            Ok(entry.access)
        }

        async fn expire(&self, key: &str, seconds: u64) -> Result<(), KvsError> {
            self.entries.lock().entry(key.to_string()).or_default().ttl_secs = Some(seconds);
            Ok(())
        }
    }

    /// Builds a coordinator with `LoadCount=5`, `ExtendCount=10`, a 60s base TTL, and a
    /// 3600s hot TTL — small enough to walk through admission and promotion by hand.
    async fn test_coordinator() -> (Coordinator, Arc<FakeKvs>, tempfile::TempDir) {
        let kvs = Arc::new(FakeKvs::new());
        let log_dir = tempfile::tempdir().expect("tempdir");
        let logger = Arc::new(Logger::open(log_dir.path()).await.expect("logger open"));
        let admission = AdmissionPolicy::new(5, Duration::from_secs(60));
        let retention = RetentionPolicy::new(10, Duration::from_secs(3600));
        let telemetry = Arc::new(HitRatioCounter::new());

        let kvs_handle: Arc<dyn KvsClient> = kvs.clone();
        let coordinator = Coordinator::new(
            kvs_handle,
            Duration::from_secs(60),
            admission,
            retention,
            telemetry,
            logger,
        );

        (coordinator, kvs, log_dir)
    }

    async fn write_origin_file(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        tokio::fs::write(&path, contents).await.expect("write origin file");
        path
    }

    #[tokio::test]
    async fn cold_miss_then_admission_at_load_count_edge() {
        let (coordinator, kvs, _log) = test_coordinator().await;
        let origin_dir = tempfile::tempdir().expect("tempdir");
        let path = write_origin_file(&origin_dir, "report.bin", b"origin bytes").await;
        let key = "report.bin";

        // LoadCount=5: requests 1..=5 are plain disk reads (counter rises but stays
        // out of band), request 6 is the admission edge, request 7 reads from the KVS.
        for n in 1..=6 {
            let (bytes, source) = coordinator.fetch(key, &path).await.expect("fetch");
            assert_eq!(bytes.as_ref(), b"origin bytes");
            assert_eq!(source, Source::Disk, "request {n} should not be a kvs hit yet");
        }

        let entry = kvs.entry(key).expect("entry created by birth or admission");
        assert_eq!(entry.access, 6);
        assert_eq!(entry.data.as_deref(), Some(b"origin bytes".as_slice()));

        let (bytes, source) = coordinator.fetch(key, &path).await.expect("fetch");
        assert_eq!(bytes.as_ref(), b"origin bytes");
        assert_eq!(source, Source::Kvs, "request 7 should read the admitted copy back");

        let entry = kvs.entry(key).expect("entry still present");
        assert_eq!(entry.access, 7);
    }

    #[tokio::test]
    async fn hot_promotion_extends_ttl_past_extend_count() {
        let (coordinator, kvs, _log) = test_coordinator().await;
        let origin_dir = tempfile::tempdir().expect("tempdir");
        let path = write_origin_file(&origin_dir, "hot.bin", b"hot bytes").await;
        let key = "hot.bin";

        // Drive the counter from 1 up through admission (edge at 6) and into the hot
        // band (ExtendCount=10, so hot starts at access=11).
        for _ in 1..=10 {
            coordinator.fetch(key, &path).await.expect("fetch");
        }

        let (bytes, source) = coordinator.fetch(key, &path).await.expect("fetch");
        assert_eq!(bytes.as_ref(), b"hot bytes");
        assert_eq!(source, Source::Kvs);

        let entry = kvs.entry(key).expect("entry present");
        assert_eq!(entry.access, 11);
        assert_eq!(entry.ttl_secs, Some(3600), "hot hit should set the hot ttl, not the base ttl");
    }

    #[tokio::test]
    async fn origin_missing_propagates_not_found_without_creating_an_entry() {
        let (coordinator, kvs, _log) = test_coordinator().await;
        let missing_path = std::path::PathBuf::from("/nonexistent/path/does-not-exist.bin");
        let key = "does-not-exist.bin";

        let result = coordinator.fetch(key, &missing_path).await;
        assert!(matches!(result, Err(FetchError::NotFoundOrigin)));
        assert!(kvs.entry(key).is_none(), "a missing origin must not birth a counter entry");
    }

    #[tokio::test]
    async fn transient_kvs_failure_on_exists_falls_back_to_disk() {
        let (coordinator, kvs, _log) = test_coordinator().await;
        let origin_dir = tempfile::tempdir().expect("tempdir");
        let path = write_origin_file(&origin_dir, "flaky.bin", b"flaky bytes").await;
        let key = "flaky.bin";

        kvs.fail_next_exists();
        let (bytes, source) = coordinator.fetch(key, &path).await.expect("fetch");

        assert_eq!(bytes.as_ref(), b"flaky bytes");
        assert_eq!(source, Source::Disk);
        // A failed EXISTS is treated as "doesn't exist", which runs birth_entry and
        // still creates the counter entry — it only skips the KVS-backed read path.
        assert!(kvs.entry(key).is_some());
    }

    #[tokio::test]
    async fn admission_write_failure_still_returns_bytes_and_does_not_retry_admission() {
        let (coordinator, kvs, _log) = test_coordinator().await;
        let origin_dir = tempfile::tempdir().expect("tempdir");
        let path = write_origin_file(&origin_dir, "edge.bin", b"edge bytes").await;
        let key = "edge.bin";

        for _ in 1..=5 {
            coordinator.fetch(key, &path).await.expect("fetch");
        }

        kvs.fail_set_data();
        let (bytes, source) = coordinator.fetch(key, &path).await.expect("fetch");
        assert_eq!(bytes.as_ref(), b"edge bytes");
        assert_eq!(source, Source::Disk, "caller still gets the bytes even if admission failed");

        // The failed write means no data was actually admitted, so the key that would
        // normally hit the kvs path instead keeps falling back to disk.
        let (bytes, source) = coordinator.fetch(key, &path).await.expect("fetch");
        assert_eq!(bytes.as_ref(), b"edge bytes");
        assert_eq!(source, Source::Disk, "admission never wrote data, so there's nothing to read back");
    }
}
