//! SyncWorker - periodic auto-sync
//!
//! 1. Pull once on startup so remote edits from other front ends win
//! 2. Push the local dataset every interval
//! 3. Stop on cancellation; a push already running finishes first

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::coordinator::{SyncCoordinator, SyncOutcome};

pub struct SyncWorker {
    coordinator: Arc<SyncCoordinator>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl SyncWorker {
    pub fn new(
        coordinator: Arc<SyncCoordinator>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            coordinator,
            interval,
            shutdown,
        }
    }

    pub async fn run(self) {
        if !self.coordinator.is_configured() {
            tracing::info!("Remote sync not configured, running local-only");
        }
        tracing::info!(interval_secs = self.interval.as_secs(), "SyncWorker started");

        let outcome = self.coordinator.pull().await;
        tracing::debug!(?outcome, "Initial pull finished");

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        interval.tick().await; // skip immediate tick

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("SyncWorker shutting down");
                    break;
                }
                _ = interval.tick() => {
                    match self.coordinator.push().await {
                        SyncOutcome::Created { bin_id } => {
                            tracing::info!(bin_id = %bin_id, "Auto-sync created remote bin");
                        }
                        outcome => tracing::trace!(?outcome, "Auto-sync tick"),
                    }
                }
            }
        }
    }
}
