//! KVS client adapter: the typed boundary between the cache coordinator and Redis.
//!
//! The coordinator never talks to `redis` directly. It goes through this trait so the
//! admission/retention/coordinator logic can be exercised against an in-memory fake in
//! tests, and so the "atomic increment, sentinel-on-error read" contract is enforced in
//! one place instead of scattered across call sites.
//!
//! Hash layout per key: field `data` holds the file bytes, field `access` holds the
//! decimal access counter. Both share the key's TTL, set by `expire`.

use async_trait::async_trait;
use deadpool_redis::redis::AsyncCommands;
use deadpool_redis::{Config as PoolConfig, Pool, Runtime};

use crate::config::KvsConfig;
use crate::error::KvsError;

const FIELD_DATA: &str = "data";
const FIELD_ACCESS: &str = "access";

#[async_trait]
pub trait KvsClient: Send + Sync {
    /// Whole-key existence check.
    async fn exists(&self, key: &str) -> Result<bool, KvsError>;

    /// Reads the access counter. Returns `-1` on any error or a missing field —
    /// callers rely on this sentinel rather than propagating an error, since an
    /// unreadable counter is itself meaningful ("treat as never seen").
    async fn get_access(&self, key: &str) -> i64;

    async fn get_data(&self, key: &str) -> Result<Vec<u8>, KvsError>;

    async fn set_data(&self, key: &str, data: &[u8]) -> Result<(), KvsError>;

    async fn set_access(&self, key: &str, value: i64) -> Result<(), KvsError>;

    /// Atomically increments the access counter by one and returns the new value.
    /// This is the one operation the rest of the system assumes is race-free.
    async fn incr_access(&self, key: &str) -> Result<i64, KvsError>;

    async fn expire(&self, key: &str, seconds: u64) -> Result<(), KvsError>;
}

/// `deadpool-redis`-backed implementation.
pub struct RedisKvs {
    pool: Pool,
}

impl RedisKvs {
    pub fn connect(cfg: &KvsConfig) -> anyhow::Result<Self> {
        let url = if cfg.password.is_empty() {
            format!("redis://{}:{}/{}", cfg.rdb_ip, cfg.rdb_port, cfg.db)
        } else {
            format!(
                "redis://:{}@{}:{}/{}",
                cfg.password, cfg.rdb_ip, cfg.rdb_port, cfg.db
            )
        };

        let mut pool_cfg = PoolConfig::from_url(url);
        let mut pool_opts = deadpool_redis::PoolConfig::new(cfg.pool_size.max(1));
        pool_opts.timeouts.wait = Some(std::time::Duration::from_secs(cfg.pool_timeout_secs));
        pool_cfg.pool = Some(pool_opts);
        // cfg.min_idle_conns/max_idle_conns have no counterpart here: deadpool creates
        // connections lazily on demand and has no idle-pool-maintenance setting to pass
        // them to.

        let pool = pool_cfg.create_pool(Some(Runtime::Tokio1))?;
        Ok(Self { pool })
    }

    fn classify(err: deadpool_redis::redis::RedisError) -> KvsError {
        use deadpool_redis::redis::ErrorKind;
        match err.kind() {
            ErrorKind::AuthenticationFailed | ErrorKind::InvalidClientConfig => {
                KvsError::Fatal(err.to_string())
            }
            _ => KvsError::Transient(err.to_string()),
        }
    }

    async fn conn(&self) -> Result<deadpool_redis::Connection, KvsError> {
        self.pool
            .get()
            .await
            .map_err(|err| KvsError::Transient(err.to_string()))
    }
}

#[async_trait]
impl KvsClient for RedisKvs {
    async fn exists(&self, key: &str) -> Result<bool, KvsError> {
        let mut conn = self.conn().await?;
        conn.exists(key).await.map_err(Self::classify)
    }

    async fn get_access(&self, key: &str) -> i64 {
        let Ok(mut conn) = self.conn().await else {
            return -1;
        };
        let value: Option<String> = conn.hget(key, FIELD_ACCESS).await.ok().flatten();
        match value.and_then(|v| v.parse::<i64>().ok()) {
            Some(n) => n,
            None => -1,
        }
    }

    async fn get_data(&self, key: &str) -> Result<Vec<u8>, KvsError> {
        let mut conn = self.conn().await?;
        let value: Option<Vec<u8>> = conn.hget(key, FIELD_DATA).await.map_err(Self::classify)?;
        value.ok_or(KvsError::NotFound)
    }

    async fn set_data(&self, key: &str, data: &[u8]) -> Result<(), KvsError> {
        let mut conn = self.conn().await?;
        conn.hset::<_, _, _, ()>(key, FIELD_DATA, data)
            .await
            .map_err(Self::classify)
    }

    async fn set_access(&self, key: &str, value: i64) -> Result<(), KvsError> {
        let mut conn = self.conn().await?;
        conn.hset::<_, _, _, ()>(key, FIELD_ACCESS, value)
            .await
            .map_err(Self::classify)
    }

    async fn incr_access(&self, key: &str) -> Result<i64, KvsError> {
        let mut conn = self.conn().await?;
        conn.hincr(key, FIELD_ACCESS, 1i64)
            .await
            .map_err(Self::classify)
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<(), KvsError> {
        let mut conn = self.conn().await?;
        conn.expire::<_, ()>(key, seconds as i64)
            .await
            .map_err(Self::classify)
    }
}
