//! The application: one explicit value bundling everything a handler or the lifecycle
//! loop needs, instead of several unrelated process-wide globals.
//!
//! `App` itself is still reached through a global (see [`crate::state`]) so handlers
//! can pull it in via the `State` extractor rather than threading it through every
//! function signature by hand — but the store holds exactly this one value, not an
//! open-ended bag of singletons.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::admission::AdmissionPolicy;
use crate::config::{KvsConfig, ServerConfig};
use crate::coordinator::Coordinator;
use crate::kvs::{KvsClient, RedisKvs};
use crate::logger::Logger;
use crate::mime::{MimeTable, suffix_of};
use crate::retention::RetentionPolicy;
use crate::telemetry::HitRatioCounter;

pub struct App {
    pub server_config: ServerConfig,
    pub kvs_config: KvsConfig,
    pub mime: MimeTable,
    pub coordinator: Coordinator,
    pub telemetry: Arc<HitRatioCounter>,
    pub logger: Arc<Logger>,
}

impl App {
    pub async fn new(
        server_config: ServerConfig,
        kvs_config: KvsConfig,
        mime_map: std::collections::HashMap<String, String>,
    ) -> anyhow::Result<Self> {
        let logger = Arc::new(Logger::open(server_config.logger_path.clone()).await?);
        let telemetry = Arc::new(HitRatioCounter::new());
        let kvs: Arc<dyn KvsClient> = Arc::new(RedisKvs::connect(&kvs_config)?);

        let base_ttl = Duration::from_secs(kvs_config.base_ttl_minutes * 60);
        let hot_ttl = Duration::from_secs(kvs_config.hot_ttl_minutes * 60);

        let admission = AdmissionPolicy::new(kvs_config.load_count, base_ttl);
        let retention = RetentionPolicy::new(kvs_config.extend_count, hot_ttl);

        let coordinator = Coordinator::new(
            kvs,
            base_ttl,
            admission,
            retention,
            telemetry.clone(),
            logger.clone(),
        );

        Ok(Self {
            server_config,
            kvs_config,
            mime: MimeTable::new(mime_map),
            coordinator,
            telemetry,
            logger,
        })
    }

    /// The KVS hash key for a requested file name: `name + Suffix`.
    pub fn file_key(&self, name: &str) -> String {
        format!("{name}{}", self.server_config.suffix)
    }

    /// The on-disk path for a requested file name: `Prefix + name + Suffix`.
    pub fn disk_path(&self, name: &str) -> PathBuf {
        PathBuf::from(format!(
            "{}{name}{}",
            self.server_config.prefix, self.server_config.suffix
        ))
    }

    /// The MIME type for a requested file name, resolved from its final (suffixed) name.
    pub fn mime_for(&self, name: &str) -> String {
        self.mime.lookup(suffix_of(&self.file_key(name)))
    }
}
