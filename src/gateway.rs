//! Persistence gateways: opaque key/blob storage the task store relies on.
//!
//! The store only needs `load` and `save`. `FileGateway` keeps one JSON file per key
//! inside a data directory; `MemoryGateway` keeps blobs in a map and can enforce a
//! byte quota, which is how tests exercise failed writes.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::PersistenceError;

/// Key/blob storage consumed by `TaskStore`.
pub trait PersistenceGateway {
    /// Read the blob stored under `key`, or `None` if nothing was ever saved.
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace the blob stored under `key`.
    fn save(&mut self, key: &str, blob: &str) -> Result<(), PersistenceError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileGateway {
    dir: PathBuf,
}

impl FileGateway {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileGateway { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl PersistenceGateway for FileGateway {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(blob) => {
                tracing::debug!(path = %path.display(), bytes = blob.len(), "loaded blob");
                Ok(Some(blob))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistenceError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), PersistenceError> {
        let io_err = |source| PersistenceError::Io {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;

        // Atomic-ish write via temp + rename.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp).map_err(io_err)?;
        f.write_all(blob.as_bytes()).map_err(io_err)?;
        f.sync_all().map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)?;
        tracing::debug!(path = %path.display(), bytes = blob.len(), "saved blob");
        Ok(())
    }
}

/// In-process storage, optionally limited to `quota` bytes per blob.
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    blobs: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        MemoryGateway {
            blobs: HashMap::new(),
            quota: Some(quota),
        }
    }

    pub fn set_quota(&mut self, quota: Option<usize>) {
        self.quota = quota;
    }

    /// Seed a blob directly, bypassing the quota.
    pub fn insert(&mut self, key: &str, blob: impl Into<String>) {
        self.blobs.insert(key.to_string(), blob.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.blobs.get(key).map(String::as_str)
    }
}

impl PersistenceGateway for MemoryGateway {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), PersistenceError> {
        if let Some(limit) = self.quota {
            if blob.len() > limit {
                return Err(PersistenceError::QuotaExceeded {
                    key: key.to_string(),
                    size: blob.len(),
                    limit,
                });
            }
        }
        self.blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_gateway_absent_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let gw = FileGateway::new(dir.path());
        assert!(gw.load("tasks").unwrap().is_none());
    }

    #[test]
    fn test_file_gateway_creates_dir_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let mut gw = FileGateway::new(dir.path().join("nested"));
        gw.save("tasks", "[1]").unwrap();
        gw.save("tasks", "[2]").unwrap();
        assert_eq!(gw.load("tasks").unwrap().as_deref(), Some("[2]"));
        assert!(!gw.path_for("tasks").with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_gateway_save_is_complete_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut gw = FileGateway::new(dir.path());
        let blob = "x".repeat(64 * 1024);
        gw.save("task_history", &blob).unwrap();
        let on_disk = fs::read_to_string(dir.path().join("task_history.json")).unwrap();
        assert_eq!(on_disk.len(), blob.len());
        assert!(!dir.path().join("task_history.json.tmp").exists());
    }

    #[test]
    fn test_memory_gateway_quota() {
        let mut gw = MemoryGateway::with_quota(4);
        gw.save("k", "1234").unwrap();
        let err = gw.save("k", "12345").unwrap_err();
        assert!(matches!(err, PersistenceError::QuotaExceeded { size: 5, limit: 4, .. }));
        assert_eq!(gw.get("k"), Some("1234"));
    }
}
