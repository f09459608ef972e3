use std::collections::HashMap;

use crate::domain::storage::StorageError;

pub mod file;
pub mod memory;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;

/// Size the map would have after writing `key`, counted like browser storage: keys plus values.
fn projected_size(entries: &HashMap<String, String>, key: &str, value: &str) -> usize {
    entries
        .iter()
        .filter(|(existing, _)| existing.as_str() != key)
        .map(|(k, v)| k.len() + v.len())
        .sum::<usize>()
        + key.len()
        + value.len()
}

fn check_quota(
    entries: &HashMap<String, String>,
    key: &str,
    value: &str,
    quota: Option<usize>,
) -> Result<(), StorageError> {
    let Some(quota) = quota else {
        return Ok(());
    };

    let required = projected_size(entries, key, value);
    if required > quota {
        return Err(StorageError::QuotaExceeded { required, quota });
    }
    Ok(())
}
