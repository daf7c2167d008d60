use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the catalog artifact (JSON)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Path to the similarity matrix artifact (JSON)
    #[serde(default = "default_similarity_path")]
    pub similarity_path: String,

    /// Optional local metadata snapshot keyed by external id
    #[serde(default)]
    pub metadata_path: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of recommendations when the request doesn't say
    #[serde(default = "default_k")]
    pub default_k: usize,

    /// Upper bound accepted for `k`
    #[serde(default = "default_max_k")]
    pub max_k: usize,

    /// Per-title metadata lookup timeout in milliseconds
    #[serde(default = "default_metadata_timeout_ms")]
    pub metadata_timeout_ms: u64,

    /// Pad short result lists from the catalog unless the request overrides it
    #[serde(default)]
    pub pad_results: bool,
}

fn default_catalog_path() -> String {
    "data/catalog.json".to_string()
}

fn default_similarity_path() -> String {
    "data/similarity.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_k() -> usize {
    5
}

fn default_max_k() -> usize {
    50
}

fn default_metadata_timeout_ms() -> u64 {
    4000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            similarity_path: default_similarity_path(),
            metadata_path: None,
            host: default_host(),
            port: default_port(),
            default_k: default_k(),
            max_k: default_max_k(),
            metadata_timeout_ms: default_metadata_timeout_ms(),
            pad_results: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_millis(self.metadata_timeout_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
