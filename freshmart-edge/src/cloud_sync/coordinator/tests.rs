use super::*;
use crate::storage::seed;
use async_trait::async_trait;
use parking_lot::Mutex;
use shared::models::Dataset;
use std::collections::HashMap;
use std::sync::atomic::AtomicUsize;
use tokio::sync::Notify;

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Ok,
    Unreachable,
    Unauthorized,
}

/// In-process mirror: bins keyed by id, with call counters
struct FakeMirror {
    bins: Mutex<HashMap<String, RemoteRecord>>,
    mode: Mutex<Mode>,
    calls: AtomicUsize,
    creates: AtomicUsize,
    /// When set, `fetch` parks until notified
    gate: Option<Arc<Notify>>,
}

impl FakeMirror {
    fn new() -> Self {
        Self {
            bins: Mutex::new(HashMap::new()),
            mode: Mutex::new(Mode::Ok),
            calls: AtomicUsize::new(0),
            creates: AtomicUsize::new(0),
            gate: None,
        }
    }

    fn with_bin(bin_id: &str, data: Dataset) -> Self {
        let mirror = Self::new();
        mirror
            .bins
            .lock()
            .insert(bin_id.to_string(), RemoteRecord::for_push(data, Utc::now()));
        mirror
    }

    fn set_mode(&self, mode: Mode) {
        *self.mode.lock() = mode;
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn bin(&self, bin_id: &str) -> Option<RemoteRecord> {
        self.bins.lock().get(bin_id).cloned()
    }

    fn fail(&self) -> Result<(), MirrorError> {
        match *self.mode.lock() {
            Mode::Ok => Ok(()),
            Mode::Unreachable => Err(MirrorError::Network("connection refused".into())),
            Mode::Unauthorized => Err(MirrorError::Unauthorized),
        }
    }
}

#[async_trait]
impl RemoteMirror for FakeMirror {
    async fn fetch(&self, bin_id: &str) -> Result<RemoteRecord, MirrorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.fail()?;
        self.bin(bin_id).ok_or(MirrorError::NotFound)
    }

    async fn store(&self, bin_id: &str, record: &RemoteRecord) -> Result<(), MirrorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.fail()?;
        let mut bins = self.bins.lock();
        match bins.get_mut(bin_id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(())
            }
            None => Err(MirrorError::NotFound),
        }
    }

    async fn create(&self, record: &RemoteRecord) -> Result<String, MirrorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.fail()?;
        let n = self.creates.fetch_add(1, Ordering::SeqCst);
        let bin_id = format!("new-bin-{n}");
        self.bins.lock().insert(bin_id.clone(), record.clone());
        Ok(bin_id)
    }
}

fn configured() -> RemoteConfig {
    RemoteConfig::new("real-key", "bin-1")
}

fn coordinator(mirror: Arc<FakeMirror>, config: RemoteConfig) -> (Arc<PersistentStore>, SyncCoordinator) {
    let store = Arc::new(PersistentStore::in_memory());
    let sync = SyncCoordinator::new(store.clone(), mirror, config);
    (store, sync)
}

#[tokio::test]
async fn test_placeholder_config_makes_no_calls() {
    let mirror = Arc::new(FakeMirror::new());
    let config = RemoteConfig::new("YOUR_JSONBIN_API_KEY_HERE", "YOUR_JSONBIN_BIN_ID_HERE");
    let (store, sync) = coordinator(mirror.clone(), config);

    assert!(!sync.is_configured());
    assert_eq!(sync.push().await, SyncOutcome::NotConfigured);
    assert_eq!(sync.pull().await, SyncOutcome::NotConfigured);
    assert_eq!(mirror.calls(), 0);
    assert_eq!(store.products().len(), seed::default_products().len());
    assert!(!sync.status().configured);
}

#[tokio::test]
async fn test_missing_bin_id_is_not_configured() {
    let mirror = Arc::new(FakeMirror::new());
    let (_store, sync) = coordinator(mirror.clone(), RemoteConfig::new("real-key", ""));

    assert_eq!(sync.push().await, SyncOutcome::NotConfigured);
    assert_eq!(mirror.calls(), 0);
    assert!(sync.bin_id().is_none());
}

#[tokio::test]
async fn test_push_writes_whole_dataset() {
    let mirror = Arc::new(FakeMirror::with_bin("bin-1", Dataset::default()));
    let (store, sync) = coordinator(mirror.clone(), configured());

    assert_eq!(sync.push().await, SyncOutcome::Pushed);

    let remote = mirror.bin("bin-1").unwrap();
    assert_eq!(remote.data, store.snapshot());
    assert!(remote.last_sync.is_some());
    assert!(sync.status().last_success.is_some());
    assert!(sync.status().last_error.is_none());
}

#[tokio::test]
async fn test_pull_overwrites_local_keys() {
    let mut remote = seed::default_dataset();
    remote.products.truncate(3);
    remote.delivery_boys.truncate(1);
    let mirror = Arc::new(FakeMirror::with_bin("bin-1", remote.clone()));
    let (store, sync) = coordinator(mirror, configured());

    assert_eq!(sync.pull().await, SyncOutcome::Pulled);
    assert_eq!(store.products(), remote.products);
    assert_eq!(store.agents().len(), 1);
    assert!(store.orders().is_empty());
}

#[tokio::test]
async fn test_missing_bin_is_created_once() {
    let mirror = Arc::new(FakeMirror::new());
    let (store, sync) = coordinator(mirror.clone(), configured());

    let outcome = sync.pull().await;
    assert_eq!(
        outcome,
        SyncOutcome::Created {
            bin_id: "new-bin-0".into()
        }
    );
    assert_eq!(sync.bin_id().as_deref(), Some("new-bin-0"));
    assert_eq!(sync.status().created_bin_id.as_deref(), Some("new-bin-0"));

    let created = mirror.bin("new-bin-0").unwrap();
    assert_eq!(created.data, store.snapshot());
    assert!(created.created_at.is_some());

    // subsequent pushes go to the new bin
    assert_eq!(sync.push().await, SyncOutcome::Pushed);

    // the new bin vanishes too; no second creation
    mirror.bins.lock().clear();
    assert!(matches!(sync.push().await, SyncOutcome::Failed(_)));
    assert_eq!(mirror.creates.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failure_leaves_local_data_untouched() {
    let mirror = Arc::new(FakeMirror::with_bin("bin-1", Dataset::default()));
    mirror.set_mode(Mode::Unreachable);
    let (store, sync) = coordinator(mirror.clone(), configured());
    let before = store.snapshot();

    assert!(matches!(sync.pull().await, SyncOutcome::Failed(_)));
    assert!(matches!(sync.push().await, SyncOutcome::Failed(_)));
    assert_eq!(store.snapshot(), before);
    assert!(sync.status().last_error.is_some());
    assert!(sync.status().last_success.is_none());

    mirror.set_mode(Mode::Ok);
    assert_eq!(sync.push().await, SyncOutcome::Pushed);
    assert!(sync.status().last_error.is_none());
}

#[tokio::test]
async fn test_unauthorized_does_not_create() {
    let mirror = Arc::new(FakeMirror::new());
    mirror.set_mode(Mode::Unauthorized);
    let (_store, sync) = coordinator(mirror.clone(), configured());

    let outcome = sync.push().await;
    assert!(matches!(outcome, SyncOutcome::Failed(_)));
    assert!(!outcome.is_success());
    assert_eq!(mirror.creates.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_overlapping_sync_is_skipped() {
    let gate = Arc::new(Notify::new());
    let mut mirror = FakeMirror::with_bin("bin-1", seed::default_dataset());
    mirror.gate = Some(gate.clone());
    let mirror = Arc::new(mirror);
    let (_store, sync) = coordinator(mirror.clone(), configured());
    let sync = Arc::new(sync);

    let pulling = tokio::spawn({
        let sync = sync.clone();
        async move { sync.pull().await }
    });
    while mirror.calls() == 0 {
        tokio::task::yield_now().await;
    }

    assert!(sync.status().in_flight);
    assert_eq!(sync.push().await, SyncOutcome::Skipped);

    gate.notify_one();
    assert_eq!(pulling.await.unwrap(), SyncOutcome::Pulled);
    assert!(!sync.status().in_flight);
    assert_eq!(mirror.calls(), 1);
}
