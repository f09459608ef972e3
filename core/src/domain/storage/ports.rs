use super::errors::StorageError;

/// Durable string key/value storage shared by the entitlement and history components.
///
/// Every call is a complete operation: a failed `set` leaves the previous value in place.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
