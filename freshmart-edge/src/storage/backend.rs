//! Storage backend abstraction
//!
//! A backend is a flat string key → JSON text map. The [`PersistentStore`]
//! layers several of these in preference order.
//!
//! [`PersistentStore`]: super::PersistentStore

use thiserror::Error;

/// Canary key written and removed once when a backend is probed
pub const PROBE_KEY: &str = "__freshmart_probe__";

/// Backend errors
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Storage quota exceeded")]
    QuotaExceeded,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),
}

impl BackendError {
    /// Map an I/O error, recognising a full disk as quota exhaustion
    pub fn from_io(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::StorageFull {
            BackendError::QuotaExceeded
        } else {
            BackendError::Io(err)
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Key/value storage tier
pub trait StorageBackend: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn read(&self, key: &str) -> BackendResult<Option<String>>;

    fn write(&self, key: &str, value: &str) -> BackendResult<()>;

    fn remove(&self, key: &str) -> BackendResult<()>;

    fn clear(&self) -> BackendResult<()>;
}

/// Write and delete the canary key.
///
/// Returns `false` (and logs) if either step fails.
pub fn probe(backend: &dyn StorageBackend) -> bool {
    let result = backend
        .write(PROBE_KEY, "1")
        .and_then(|()| backend.remove(PROBE_KEY));
    match result {
        Ok(()) => {
            tracing::debug!(backend = backend.name(), "Storage backend available");
            true
        }
        Err(e) => {
            tracing::warn!(backend = backend.name(), error = %e, "Storage backend unavailable");
            false
        }
    }
}
