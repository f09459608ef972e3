use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};

pub mod entities;

#[derive(Clone, Debug)]
pub struct NutriscanConfig {
    pub llm: LLMConfig,
    pub storage: StorageConfig,
}

#[derive(Clone, Debug)]
pub struct LLMConfig {
    /// Root of the Generative Language REST API, without the `/models` segment.
    pub gemini_base_url: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub request_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub path: PathBuf,
    /// Upper bound for the serialized store, mirrors a browser storage quota.
    pub quota_bytes: Option<usize>,
}

/// Current instant truncated to millisecond precision, the resolution history is stored with.
pub fn now_millis() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(Utc::now().timestamp_millis()).unwrap_or_else(Utc::now)
}
