//! Session-scoped tier
//!
//! JSON files under `{work_dir}/sessions/{uuid}`. The directory belongs to
//! this process only and is removed when the backend is dropped, so values
//! survive backend hiccups within a run but never across restarts.

use std::fs;
use std::path::{Path, PathBuf};

use super::backend::{BackendError, BackendResult, StorageBackend};

pub struct SessionBackend {
    dir: PathBuf,
}

impl SessionBackend {
    /// Create a fresh session directory under `{root}/sessions`
    pub fn create(root: impl AsRef<Path>) -> BackendResult<Self> {
        let dir = root
            .as_ref()
            .join("sessions")
            .join(uuid::Uuid::new_v4().to_string());
        fs::create_dir_all(&dir).map_err(BackendError::from_io)?;
        tracing::debug!(dir = %dir.display(), "Session storage created");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> BackendResult<PathBuf> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(BackendError::Unavailable(format!("invalid key: {key}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl StorageBackend for SessionBackend {
    fn name(&self) -> &'static str {
        "session"
    }

    fn read(&self, key: &str) -> BackendResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BackendError::from_io(e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> BackendResult<()> {
        let path = self.path_for(key)?;
        // 先写临时文件再 rename，避免读到半截 JSON
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(BackendError::from_io)?;
        fs::rename(&tmp, &path).map_err(BackendError::from_io)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> BackendResult<()> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BackendError::from_io(e)),
        }
    }

    fn clear(&self) -> BackendResult<()> {
        for entry in fs::read_dir(&self.dir).map_err(BackendError::from_io)? {
            let entry = entry.map_err(BackendError::from_io)?;
            fs::remove_file(entry.path()).map_err(BackendError::from_io)?;
        }
        Ok(())
    }
}

impl Drop for SessionBackend {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_dir_all(&self.dir) {
            tracing::debug!(dir = %self.dir.display(), error = %e, "Failed to remove session storage");
        }
    }
}
