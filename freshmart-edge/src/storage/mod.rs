//! Persistent Store - 多级降级存储
//!
//! One logical key/value store over several physical tiers:
//!
//! ```text
//! get(key)                          set(key, value)
//!   ├─ durable (redb)                 ├─ durable   ─┐
//!   ├─ session (per-process files)    ├─ session   ─┼─ failures logged only
//!   ├─ memory shadow (last write)     └─ memory shadow (always)
//!   └─ T::default()
//! ```
//!
//! Each real tier is probed once at construction; a tier that fails the probe
//! is skipped for the lifetime of the store. Reads never fail: corrupt or
//! unreadable values fall through to the next tier.

mod backend;
mod durable;
mod session;
pub mod seed;

pub use backend::{BackendError, BackendResult, PROBE_KEY, StorageBackend, probe};
pub use durable::RedbBackend;
pub use session::SessionBackend;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard, RwLock};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{Dataset, DeliveryAgent, Order, Product, StoreKey};
use std::collections::HashMap;
use std::path::Path;

/// Durable database file name inside the work dir
pub const DB_FILE: &str = "freshmart.redb";

/// Which real tiers passed their probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStatus {
    pub durable: bool,
    pub session: bool,
}

impl StorageStatus {
    /// Only the memory tier is active
    pub fn memory_only(&self) -> bool {
        !self.durable && !self.session
    }
}

pub struct PersistentStore {
    durable: Option<Box<dyn StorageBackend>>,
    session: Option<Box<dyn StorageBackend>>,
    /// Last-known-good JSON per key
    shadow: RwLock<HashMap<StoreKey, String>>,
    /// Held across read-modify-write sequences
    lock: ReentrantMutex<()>,
}

impl std::fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStore")
            .field("status", &self.status())
            .finish()
    }
}

impl PersistentStore {
    /// Build a store from optional tiers, probing each one once.
    pub fn new(
        durable: Option<Box<dyn StorageBackend>>,
        session: Option<Box<dyn StorageBackend>>,
    ) -> Self {
        let durable = durable.filter(|backend| probe(&**backend));
        let session = session.filter(|backend| probe(&**backend));

        let store = Self {
            durable,
            session,
            shadow: RwLock::new(HashMap::new()),
            lock: ReentrantMutex::new(()),
        };
        store.reset_shadow();

        let status = store.status();
        if status.memory_only() {
            tracing::warn!("No persistent storage available, using memory only");
        } else {
            tracing::info!(durable = status.durable, session = status.session, "Persistent store ready");
        }
        store
    }

    /// Open the standard tiers under `work_dir`.
    ///
    /// A tier that cannot be opened is logged and skipped.
    pub fn open(work_dir: impl AsRef<Path>) -> Self {
        let work_dir = work_dir.as_ref();
        if let Err(e) = std::fs::create_dir_all(work_dir) {
            tracing::warn!(dir = %work_dir.display(), error = %e, "Failed to create work dir");
        }

        let durable = match RedbBackend::open(work_dir.join(DB_FILE)) {
            Ok(backend) => Some(Box::new(backend) as Box<dyn StorageBackend>),
            Err(e) => {
                tracing::warn!(error = %e, "Durable storage unavailable");
                None
            }
        };
        let session = match SessionBackend::create(work_dir) {
            Ok(backend) => Some(Box::new(backend) as Box<dyn StorageBackend>),
            Err(e) => {
                tracing::warn!(error = %e, "Session storage unavailable");
                None
            }
        };

        Self::new(durable, session)
    }

    /// Memory tier only
    pub fn in_memory() -> Self {
        Self::new(None, None)
    }

    pub fn status(&self) -> StorageStatus {
        StorageStatus {
            durable: self.durable.is_some(),
            session: self.session.is_some(),
        }
    }

    /// Acquire the store's re-entrant lock.
    ///
    /// Hold the guard across a read-modify-write sequence. Never hold it across
    /// an `.await`.
    pub fn lock(&self) -> ReentrantMutexGuard<'_, ()> {
        self.lock.lock()
    }

    fn tiers(&self) -> impl Iterator<Item = &dyn StorageBackend> {
        self.durable
            .as_deref()
            .into_iter()
            .chain(self.session.as_deref())
    }

    /// Read a key. Never fails.
    pub fn get<T>(&self, key: StoreKey) -> T
    where
        T: DeserializeOwned + Default,
    {
        for backend in self.tiers() {
            match backend.read(key.as_str()) {
                Ok(Some(raw)) => match serde_json::from_str(&raw) {
                    Ok(value) => return value,
                    Err(e) => {
                        tracing::error!(backend = backend.name(), %key, error = %e, "Corrupt stored value");
                    }
                },
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(backend = backend.name(), %key, error = %e, "Storage read failed");
                }
            }
        }

        if let Some(raw) = self.shadow.read().get(&key) {
            match serde_json::from_str(raw) {
                Ok(value) => {
                    tracing::debug!(%key, "Read served from memory");
                    return value;
                }
                Err(e) => {
                    tracing::error!(%key, error = %e, "Memory value does not match requested type");
                }
            }
        }

        T::default()
    }

    /// Write a key to every available tier.
    ///
    /// Returns `true` if at least one real tier accepted the write, or if no
    /// real tier exists (memory is then the active tier). Returns `false` on
    /// serialization failure without writing anything.
    pub fn set<T>(&self, key: StoreKey, value: &T) -> bool
    where
        T: Serialize + ?Sized,
    {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(%key, error = %e, "Failed to serialize value");
                return false;
            }
        };

        let _guard = self.lock();
        let mut attempted = false;
        let mut accepted = false;
        for backend in self.tiers() {
            attempted = true;
            match backend.write(key.as_str(), &raw) {
                Ok(()) => accepted = true,
                Err(e) => {
                    tracing::warn!(backend = backend.name(), %key, error = %e, "Storage write failed");
                }
            }
        }
        self.shadow.write().insert(key, raw);

        accepted || !attempted
    }

    /// Delete a key from every tier, including memory
    pub fn remove(&self, key: StoreKey) {
        let _guard = self.lock();
        for backend in self.tiers() {
            if let Err(e) = backend.remove(key.as_str()) {
                tracing::warn!(backend = backend.name(), %key, error = %e, "Storage remove failed");
            }
        }
        self.shadow.write().remove(&key);
    }

    /// Clear every real tier and reset memory to the seed dataset
    pub fn clear_all(&self) {
        let _guard = self.lock();
        for backend in self.tiers() {
            if let Err(e) = backend.clear() {
                tracing::warn!(backend = backend.name(), error = %e, "Storage clear failed");
            }
        }
        self.reset_shadow();
        tracing::info!("Storage cleared");
    }

    fn reset_shadow(&self) {
        let seed = seed::default_dataset();
        let mut shadow = self.shadow.write();
        shadow.clear();
        for (key, raw) in [
            (StoreKey::Orders, serde_json::to_string(&seed.orders)),
            (StoreKey::DeliveryBoys, serde_json::to_string(&seed.delivery_boys)),
            (StoreKey::Products, serde_json::to_string(&seed.products)),
            (StoreKey::CurrentDeliveryBoy, serde_json::to_string(&seed.current_delivery_boy)),
        ] {
            match raw {
                Ok(raw) => {
                    shadow.insert(key, raw);
                }
                Err(e) => tracing::error!(%key, error = %e, "Failed to serialize seed value"),
            }
        }
    }

    // ========== Typed accessors ==========

    pub fn orders(&self) -> Vec<Order> {
        self.get(StoreKey::Orders)
    }

    pub fn set_orders(&self, orders: &[Order]) -> bool {
        self.set(StoreKey::Orders, orders)
    }

    pub fn agents(&self) -> Vec<DeliveryAgent> {
        self.get(StoreKey::DeliveryBoys)
    }

    pub fn set_agents(&self, agents: &[DeliveryAgent]) -> bool {
        self.set(StoreKey::DeliveryBoys, agents)
    }

    pub fn products(&self) -> Vec<Product> {
        self.get(StoreKey::Products)
    }

    pub fn set_products(&self, products: &[Product]) -> bool {
        self.set(StoreKey::Products, products)
    }

    pub fn current_agent(&self) -> Option<DeliveryAgent> {
        self.get(StoreKey::CurrentDeliveryBoy)
    }

    pub fn set_current_agent(&self, agent: Option<&DeliveryAgent>) -> bool {
        self.set(StoreKey::CurrentDeliveryBoy, &agent)
    }

    /// Read the whole dataset
    pub fn snapshot(&self) -> Dataset {
        let _guard = self.lock();
        Dataset {
            orders: self.orders(),
            delivery_boys: self.agents(),
            products: self.products(),
            current_delivery_boy: self.current_agent(),
        }
    }

    /// Overwrite every key with the given dataset
    pub fn replace(&self, data: &Dataset) -> bool {
        let _guard = self.lock();
        let orders = self.set_orders(&data.orders);
        let agents = self.set_agents(&data.delivery_boys);
        let products = self.set_products(&data.products);
        let current = self.set_current_agent(data.current_delivery_boy.as_ref());
        orders && agents && products && current
    }
}
