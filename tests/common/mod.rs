#![allow(dead_code)]
use async_trait::async_trait;
use indiacode_ingest::runtime::fetcher::Fetcher;
use indiacode_ingest::sources::configs::CrawlConfig;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

pub const ORIGIN: &str = "https://www.indiacode.nic.in";

pub fn fixtures_dir() -> String {
    format!("{}/tests/fixtures", env!("CARGO_MANIFEST_DIR"))
}

pub fn load_fixture(filename: &str) -> String {
    let path = Path::new(&fixtures_dir()).join(filename);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

pub fn load_fixture_bytes(filename: &str) -> Vec<u8> {
    let path = Path::new(&fixtures_dir()).join(filename);
    std::fs::read(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Config pointing at a temporary website dir, without politeness delays.
pub fn test_config(website_dir: &Path) -> CrawlConfig {
    CrawlConfig {
        website_dir: website_dir.to_path_buf(),
        request_delay_ms: 0,
        max_retries: 0,
        ..CrawlConfig::default()
    }
}

pub struct MockFetcher {
    pub texts: HashMap<String, String>,
    pub bytes: HashMap<String, Vec<u8>>,
    pub requested: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            texts: HashMap::new(),
            bytes: HashMap::new(),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn add_fixture(&mut self, url: &str, content: &str) {
        self.texts.insert(url.to_string(), content.to_string());
    }

    pub fn add_bytes(&mut self, url: &str, content: &[u8]) {
        self.bytes.insert(url.to_string(), content.to_vec());
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, String> {
        self.requested.lock().unwrap().push(url.to_string());
        self.texts
            .get(url)
            .cloned()
            .ok_or_else(|| format!("MockFetcher: No fixture for URL: {}", url))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, String> {
        self.requested.lock().unwrap().push(url.to_string());
        self.bytes
            .get(url)
            .cloned()
            .ok_or_else(|| format!("MockFetcher: No fixture for URL: {}", url))
    }
}
