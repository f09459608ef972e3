use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage quota exceeded: {required} bytes needed, {quota} allowed")]
    QuotaExceeded { required: usize, quota: usize },
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serde error: {0}")]
    Serde(String),
    #[error("Storage lock poisoned")]
    Poisoned,
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        StorageError::Io(error.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        StorageError::Serde(error.to_string())
    }
}
