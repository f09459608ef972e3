use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::RwLock,
};

use tracing::{info, warn};

use crate::domain::storage::{KeyValueStore, StorageError};

use super::check_quota;

/// Durable store backed by one JSON object on disk.
///
/// Reads are served from memory. Every mutation rewrites the whole file through a
/// sibling temp file and a rename, so a crash never leaves a half-written map.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    quota_bytes: Option<usize>,
    entries: RwLock<HashMap<String, String>>,
}

impl FileKeyValueStore {
    pub fn open(path: impl Into<PathBuf>, quota_bytes: Option<usize>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = Self::read_entries(&path)?;

        info!(
            path = %path.display(),
            keys = entries.len(),
            "key-value store opened"
        );

        Ok(Self {
            path,
            quota_bytes,
            entries: RwLock::new(entries),
        })
    }

    fn read_entries(path: &Path) -> Result<HashMap<String, String>, StorageError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }

        // A damaged file loses its contents rather than blocking startup.
        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "store file is corrupt, starting empty");
            HashMap::new()
        }))
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let serialized = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serialized)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        check_quota(&entries, key, value, self.quota_bytes)?;

        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush(&entries) {
            match previous {
                Some(previous) => entries.insert(key.to_string(), previous),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        let Some(previous) = entries.remove(key) else {
            return Ok(());
        };

        if let Err(e) = self.flush(&entries) {
            entries.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }
}
