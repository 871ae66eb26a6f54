//! Error kinds shared across the KVS adapter, origin reader, and cache coordinator.
//!
//! Each boundary gets its own enum rather than one catch-all, so a caller can match
//! on exactly the failures it needs to distinguish (a `NotFound` changes the HTTP
//! response, a `Transient` just gets logged and degraded past).

use thiserror::Error;

/// Failures from the KVS client adapter.
#[derive(Debug, Error)]
pub enum KvsError {
    /// The key, or the field requested on it, isn't present.
    #[error("not found in kvs")]
    NotFound,
    /// Connection or I/O hiccup; the caller should degrade to disk rather than fail the request.
    #[error("transient kvs error: {0}")]
    Transient(String),
    /// Something structurally wrong with the KVS (auth, protocol) that a retry won't fix.
    #[error("fatal kvs error: {0}")]
    Fatal(String),
}

/// Failures from reading a file off disk.
#[derive(Debug, Error)]
pub enum OriginError {
    #[error("origin file not found")]
    NotFound,
    #[error("origin io error: {0}")]
    Io(String),
}

/// Failures surfaced by [`crate::coordinator::Coordinator::fetch`].
///
/// These are the only two cases the coordinator can't paper over internally: the file
/// doesn't exist anywhere, or the origin couldn't be read at all. Everything else
/// (admission-write failures, TTL-set failures, transient KVS errors) is logged and
/// degrades to a disk-sourced response per the availability-biased propagation policy.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("file not found at origin")]
    NotFoundOrigin,
    #[error("origin read failed: {0}")]
    Io(String),
}

impl From<OriginError> for FetchError {
    fn from(err: OriginError) -> Self {
        match err {
            OriginError::NotFound => FetchError::NotFoundOrigin,
            OriginError::Io(msg) => FetchError::Io(msg),
        }
    }
}
