//! redb-backed durable tier
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `kv` | logical key | JSON text | One row per dataset key |
//!
//! redb commits with `Durability::Immediate` by default, so a value is on disk
//! once `write` returns.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;

use super::backend::{BackendError, BackendResult, StorageBackend};

const KV_TABLE: TableDefinition<&str, &str> = TableDefinition::new("kv");

impl From<redb::Error> for BackendError {
    fn from(err: redb::Error) -> Self {
        match err {
            redb::Error::Io(e) => BackendError::from_io(e),
            other => BackendError::Database(other.to_string()),
        }
    }
}

/// Durable backend stored in a single redb file
pub struct RedbBackend {
    db: Database,
}

impl RedbBackend {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> BackendResult<Self> {
        let db = Database::create(path.as_ref()).map_err(redb::Error::from)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> BackendResult<Self> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(redb::Error::from)?;
        Self::init(db)
    }

    fn init(db: Database) -> BackendResult<Self> {
        let write_txn = db.begin_write().map_err(redb::Error::from)?;
        {
            let _ = write_txn.open_table(KV_TABLE).map_err(redb::Error::from)?;
        }
        write_txn.commit().map_err(redb::Error::from)?;
        Ok(Self { db })
    }

    fn read_inner(&self, key: &str) -> Result<Option<String>, redb::Error> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(KV_TABLE)?;
        Ok(table.get(key)?.map(|guard| guard.value().to_string()))
    }

    fn write_inner(&self, key: &str, value: &str) -> Result<(), redb::Error> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(KV_TABLE)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn remove_inner(&self, key: &str) -> Result<(), redb::Error> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(KV_TABLE)?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn clear_inner(&self) -> Result<(), redb::Error> {
        let write_txn = self.db.begin_write()?;
        write_txn.delete_table(KV_TABLE)?;
        {
            let _ = write_txn.open_table(KV_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

impl StorageBackend for RedbBackend {
    fn name(&self) -> &'static str {
        "durable"
    }

    fn read(&self, key: &str) -> BackendResult<Option<String>> {
        Ok(self.read_inner(key)?)
    }

    fn write(&self, key: &str, value: &str) -> BackendResult<()> {
        Ok(self.write_inner(key, value)?)
    }

    fn remove(&self, key: &str) -> BackendResult<()> {
        Ok(self.remove_inner(key)?)
    }

    fn clear(&self) -> BackendResult<()> {
        Ok(self.clear_inner()?)
    }
}
