//! SyncCoordinator - whole-dataset push/pull against the remote mirror
//!
//! Last writer wins: a push overwrites the remote document, a pull overwrites
//! every local key. There is no merge and no version check.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use shared::models::RemoteRecord;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::service::{MirrorError, RemoteMirror};
use crate::core::config::RemoteConfig;
use crate::storage::PersistentStore;

/// Result of one sync request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Key or bin id missing/placeholder; no request was made
    NotConfigured,
    /// Another sync was already running
    Skipped,
    Pushed,
    Pulled,
    /// The bin was missing and a new one was created from local data
    Created { bin_id: String },
    Failed(String),
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            SyncOutcome::Pushed | SyncOutcome::Pulled | SyncOutcome::Created { .. }
        )
    }
}

/// Non-blocking status indicator
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub configured: bool,
    pub in_flight: bool,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    /// Set after auto-creation; the operator should persist it as `JSONBIN_BIN_ID`
    pub created_bin_id: Option<String>,
}

/// Clears the in-flight flag on drop
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SyncCoordinator {
    store: Arc<PersistentStore>,
    mirror: Arc<dyn RemoteMirror>,
    config: RwLock<RemoteConfig>,
    in_flight: AtomicBool,
    /// Bin creation is attempted at most once per process
    create_attempted: AtomicBool,
    status: RwLock<SyncStatus>,
}

impl SyncCoordinator {
    pub fn new(
        store: Arc<PersistentStore>,
        mirror: Arc<dyn RemoteMirror>,
        config: RemoteConfig,
    ) -> Self {
        let status = SyncStatus {
            configured: config.is_configured(),
            ..Default::default()
        };
        Self {
            store,
            mirror,
            config: RwLock::new(config),
            in_flight: AtomicBool::new(false),
            create_attempted: AtomicBool::new(false),
            status: RwLock::new(status),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.read().is_configured()
    }

    pub fn status(&self) -> SyncStatus {
        let mut status = self.status.read().clone();
        status.in_flight = self.in_flight.load(Ordering::Acquire);
        status
    }

    /// Currently targeted bin id
    pub fn bin_id(&self) -> Option<String> {
        let config = self.config.read();
        config.is_configured().then(|| config.bin_id.clone())
    }

    fn begin(&self) -> Option<FlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard(&self.in_flight))
    }

    /// Overwrite the remote document with the local dataset
    pub async fn push(&self) -> SyncOutcome {
        let Some(bin_id) = self.bin_id() else {
            tracing::debug!("Remote sync not configured, skipping push");
            return SyncOutcome::NotConfigured;
        };
        let Some(_flight) = self.begin() else {
            tracing::debug!("Sync already in flight, skipping push");
            return SyncOutcome::Skipped;
        };

        let record = RemoteRecord::for_push(self.store.snapshot(), Utc::now());
        let outcome = match self.mirror.store(&bin_id, &record).await {
            Ok(()) => SyncOutcome::Pushed,
            Err(MirrorError::NotFound) => self.create_once().await,
            Err(e) => SyncOutcome::Failed(e.to_string()),
        };
        self.record(&outcome);
        outcome
    }

    /// Overwrite every local key with the remote document
    pub async fn pull(&self) -> SyncOutcome {
        let Some(bin_id) = self.bin_id() else {
            tracing::debug!("Remote sync not configured, using local data");
            return SyncOutcome::NotConfigured;
        };
        let Some(_flight) = self.begin() else {
            tracing::debug!("Sync already in flight, skipping pull");
            return SyncOutcome::Skipped;
        };

        let outcome = match self.mirror.fetch(&bin_id).await {
            Ok(record) => {
                self.store.replace(&record.data);
                tracing::info!(
                    orders = record.data.orders.len(),
                    products = record.data.products.len(),
                    "Loaded dataset from remote"
                );
                SyncOutcome::Pulled
            }
            Err(MirrorError::NotFound) => self.create_once().await,
            Err(e) => SyncOutcome::Failed(e.to_string()),
        };
        self.record(&outcome);
        outcome
    }

    async fn create_once(&self) -> SyncOutcome {
        if self.create_attempted.swap(true, Ordering::AcqRel) {
            return SyncOutcome::Failed(MirrorError::NotFound.to_string());
        }

        tracing::warn!("Remote bin not found, creating a new one");
        let record = RemoteRecord::for_create(self.store.snapshot(), Utc::now());
        match self.mirror.create(&record).await {
            Ok(bin_id) => {
                self.config.write().bin_id = bin_id.clone();
                tracing::warn!(
                    bin_id = %bin_id,
                    "Created remote bin; set JSONBIN_BIN_ID to this value to keep using it"
                );
                SyncOutcome::Created { bin_id }
            }
            Err(e) => SyncOutcome::Failed(format!("bin creation failed: {e}")),
        }
    }

    fn record(&self, outcome: &SyncOutcome) {
        let mut status = self.status.write();
        match outcome {
            SyncOutcome::Pushed | SyncOutcome::Pulled => {
                status.last_success = Some(Utc::now());
                status.last_error = None;
                tracing::debug!(?outcome, "Remote sync succeeded");
            }
            SyncOutcome::Created { bin_id } => {
                status.last_success = Some(Utc::now());
                status.last_error = None;
                status.created_bin_id = Some(bin_id.clone());
            }
            SyncOutcome::Failed(reason) => {
                status.last_error = Some(reason.clone());
                tracing::warn!(reason = %reason, "Remote sync failed, continuing on local data");
            }
            SyncOutcome::NotConfigured | SyncOutcome::Skipped => {}
        }
    }
}

#[cfg(test)]
mod tests;
