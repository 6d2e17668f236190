//! Remote mirror sync
//!
//! ```text
//! PersistentStore ──snapshot──▶ SyncCoordinator ──push──▶ RemoteMirror (JSONBin)
//!        ▲                          │    ▲                      │
//!        └────────replace───────────┘    └────────pull──────────┘
//!                                   ▲
//!                             SyncWorker (interval, CancellationToken)
//! ```

mod coordinator;
mod service;
mod worker;

pub use coordinator::{SyncCoordinator, SyncOutcome, SyncStatus};
pub use service::{JsonBinClient, MirrorError, RemoteMirror};
pub use worker::SyncWorker;
