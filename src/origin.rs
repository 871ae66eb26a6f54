//! Origin reader: loads file bytes from disk when the cache can't serve a request.
//!
//! The disk path is always derived deterministically by the coordinator from
//! `Prefix + name + Suffix`, never from client-supplied path segments, so this reader
//! doesn't need a traversal guard the way a general-purpose static file server would.

use std::path::Path;

use crate::error::OriginError;

pub struct OriginReader;

impl OriginReader {
    pub fn new() -> Self {
        Self
    }

    pub async fn read_all(&self, path: &Path) -> Result<Vec<u8>, OriginError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(OriginError::NotFound),
            Err(err) => Err(OriginError::Io(err.to_string())),
        }
    }
}

impl Default for OriginReader {
    fn default() -> Self {
        Self::new()
    }
}
