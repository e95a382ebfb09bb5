use crate::sources::indiacode::pdf_date::DatePolicy;
use crate::sources::indiacode::SITE_ORIGIN;
use crate::types::CollectionEntry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "INDIACODE_CONFIG";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    pub site_origin: String,
    pub website_dir: PathBuf,
    pub request_delay_ms: u64,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub user_agent: String,
    pub date_policy: DatePolicy,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            site_origin: SITE_ORIGIN.to_string(),
            website_dir: PathBuf::from("import/website"),
            request_delay_ms: 2000,
            timeout_secs: 60,
            max_retries: 1,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            date_policy: DatePolicy::default(),
        }
    }
}

impl CrawlConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Loads the file named by `INDIACODE_CONFIG`, or the built-in defaults
    /// when the variable is unset.
    pub fn load_default() -> Result<Self, String> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::load_from_file(path.trim()),
            _ => Ok(Self::default()),
        }
    }
}

pub fn load_collections<P: AsRef<Path>>(path: P) -> Result<Vec<CollectionEntry>, String> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read collections {}: {e}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse collections {}: {e}", path.display()))
}
