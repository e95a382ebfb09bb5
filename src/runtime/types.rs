use crate::runtime::cache::ArtifactCache;
use crate::runtime::fetcher::Fetcher;
use crate::sources::configs::CrawlConfig;
use serde::Serialize;

/// Everything one crawl run needs, passed down explicitly.
pub struct CrawlContext<'a> {
    pub fetcher: &'a dyn Fetcher,
    pub cache: &'a ArtifactCache,
    pub config: &'a CrawlConfig,
    /// Directory name of the collection under the website dir.
    pub collection: &'a str,
    /// Re-extract act records even when a cached JSON exists.
    pub refresh: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActStatus {
    Extracted,
    Cached,
}

impl ActStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ActStatus::Extracted => "extracted",
            ActStatus::Cached => "cached",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActFailure {
    pub web_number: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlSummary {
    pub started_at: String,
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub failures: Vec<ActFailure>,
}
