use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP API binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Identifying client signature sent with every page fetch
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-fetch timeout in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Page cap used when a crawl request does not specify one
    #[serde(default = "default_max_pages")]
    pub default_max_pages: usize,

    /// Gemini API key for keyword extraction
    #[serde(default)]
    pub gemini_api_key: String,

    /// Google Custom Search API key
    #[serde(default)]
    pub google_search_api_key: String,

    /// Google Custom Search engine id; when empty, the fallback link
    /// generator is used instead of the provider
    #[serde(default)]
    pub google_search_engine_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            user_agent: default_user_agent(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            default_max_pages: default_max_pages(),
            gemini_api_key: String::new(),
            google_search_api_key: String::new(),
            google_search_engine_id: String::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Override collaborator credentials and bind address from the
    /// environment, when the corresponding variables are set and non-empty
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(value) = std::env::var("BIND_ADDR") {
            if !value.is_empty() {
                self.bind_addr = value;
            }
        }
        if let Ok(value) = std::env::var("GEMINI_API_KEY") {
            if !value.is_empty() {
                self.gemini_api_key = value;
            }
        }
        if let Ok(value) = std::env::var("GOOGLE_SEARCH_API_KEY") {
            if !value.is_empty() {
                self.google_search_api_key = value;
            }
        }
        if let Ok(value) = std::env::var("GOOGLE_SEARCH_ENGINE_ID") {
            if !value.is_empty() {
                self.google_search_engine_id = value;
            }
        }
        self
    }
}

/// Default bind address for the HTTP API
fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

/// Default identifying User-Agent
fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; LinkOptimizer/1.0)".to_string()
}

/// Default per-fetch timeout
fn default_fetch_timeout_secs() -> u64 {
    10
}

/// Default page cap per crawl
fn default_max_pages() -> usize {
    500
}
