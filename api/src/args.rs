use std::path::PathBuf;
use std::time::Duration;

use clap::{Args as ClapArgs, Parser};
use nutriscan_core::domain::common::{LLMConfig, NutriscanConfig, StorageConfig};

#[derive(Debug, Clone, Parser)]
#[command(name = "nutriscan", version, about = "NutriScan food analysis API")]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct ServerArgs {
    #[arg(long = "server-host", env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long = "server-port", env = "SERVER_PORT", default_value_t = 3333)]
    pub port: u16,

    /// Prefix mounted in front of every route, e.g. `/api`.
    #[arg(long = "server-root-path", env = "SERVER_ROOT_PATH", default_value = "")]
    pub root_path: String,

    #[arg(
        long = "server-allowed-origins",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173"
    )]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct LlmArgs {
    #[arg(long = "gemini-api-key", env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: String,

    #[arg(long = "gemini-model", env = "GEMINI_MODEL", default_value = "gemini-2.5-flash")]
    pub gemini_model: String,

    #[arg(
        long = "gemini-base-url",
        env = "GEMINI_BASE_URL",
        default_value = "https://generativelanguage.googleapis.com/v1beta"
    )]
    pub gemini_base_url: String,

    #[arg(long = "llm-timeout-secs", env = "LLM_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct StorageArgs {
    #[arg(long = "storage-path", env = "STORAGE_PATH", default_value = "nutriscan-store.json")]
    pub path: PathBuf,

    /// Maximum size of the stored keys and values, in bytes. Unbounded when unset.
    #[arg(long = "storage-quota-bytes", env = "STORAGE_QUOTA_BYTES")]
    pub quota_bytes: Option<usize>,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct LogArgs {
    #[arg(long = "log-filter", env = "RUST_LOG", default_value = "info")]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON", default_value_t = false)]
    pub json: bool,
}

impl From<Args> for NutriscanConfig {
    fn from(args: Args) -> Self {
        NutriscanConfig {
            llm: LLMConfig {
                gemini_base_url: args.llm.gemini_base_url,
                gemini_api_key: args.llm.gemini_api_key,
                gemini_model: args.llm.gemini_model,
                request_timeout: Duration::from_secs(args.llm.timeout_secs),
            },
            storage: StorageConfig {
                path: args.storage.path,
                quota_bytes: args.storage.quota_bytes,
            },
        }
    }
}
