use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::storage::{KeyValueStore, StorageError};

use super::check_quota;

/// Process-local store, optionally bounded like a browser storage quota.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        check_quota(&entries, key, value, self.quota_bytes)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_quota_rejects_write_and_keeps_previous_value() {
        let store = MemoryKeyValueStore::with_quota(10);
        store.set("k", "12345").unwrap();

        let error = store.set("k", "1234567890").unwrap_err();
        assert_eq!(
            error,
            StorageError::QuotaExceeded {
                required: 11,
                quota: 10
            }
        );
        assert_eq!(store.get("k").unwrap().as_deref(), Some("12345"));

        // overwriting does not count the old value twice
        store.set("k", "123456789").unwrap();
    }
}
