//! On-disk artifact tree for a crawl:
//!
//! ```text
//! <website_dir>/<collection>/act_infos.json
//! <website_dir>/<collection>/<web_number>/<web_number>.html
//! <website_dir>/<collection>/<web_number>/<web_number>.json
//! <website_dir>/<collection>/<web_number>/sections/
//! <website_dir>/<collection>/<web_number>/citation_pdf/
//! <website_dir>/<collection>/<web_number>/act_pdfs/
//! ```
//!
//! "The file exists" is the only freshness check.

use crate::runtime::fetcher::Fetcher;
use crate::sources::common::{is_safe_path_segment, url_path};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

pub const ACT_INFOS_FILE: &str = "act_infos.json";
pub const LAST_UPDATED_DATE_FILE: &str = "last_updated_date.json";
const MAX_PDF_FILE_NAME_BYTES: usize = 128;

#[derive(Debug, Clone)]
pub struct ArtifactCache {
    root: PathBuf,
}

impl ArtifactCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn collection_dir(&self, collection: &str) -> PathBuf {
        self.root.join(collection_dir_name(collection))
    }

    pub fn act_infos_path(&self, collection: &str) -> PathBuf {
        self.collection_dir(collection).join(ACT_INFOS_FILE)
    }

    pub fn listing_page_path(&self, collection: &str, page: usize) -> PathBuf {
        self.collection_dir(collection)
            .join(format!("{collection}-{page}.html"))
    }

    pub fn act_dir(&self, collection: &str, web_number: &str) -> PathBuf {
        self.collection_dir(collection).join(web_number)
    }

    pub fn act_html_path(&self, collection: &str, web_number: &str) -> PathBuf {
        self.act_dir(collection, web_number)
            .join(format!("{web_number}.html"))
    }

    pub fn act_json_path(&self, collection: &str, web_number: &str) -> PathBuf {
        self.act_dir(collection, web_number)
            .join(format!("{web_number}.json"))
    }

    pub fn section_path(&self, collection: &str, web_number: &str, section: &str) -> PathBuf {
        self.act_dir(collection, web_number)
            .join("sections")
            .join(format!("{section}.html"))
    }

    pub fn notification_path(&self, collection: &str, web_number: &str, section: &str) -> PathBuf {
        self.act_dir(collection, web_number)
            .join("sections")
            .join(format!("{section}_notification.html"))
    }

    pub fn citation_pdf_path(&self, collection: &str, web_number: &str, url: &str) -> PathBuf {
        self.act_dir(collection, web_number)
            .join("citation_pdf")
            .join(pdf_file_name(url, web_number))
    }

    pub fn last_updated_date_path(&self, collection: &str, web_number: &str) -> PathBuf {
        self.act_dir(collection, web_number)
            .join("citation_pdf")
            .join(LAST_UPDATED_DATE_FILE)
    }

    pub fn act_pdf_path(&self, collection: &str, web_number: &str, url: &str) -> PathBuf {
        self.act_dir(collection, web_number)
            .join("act_pdfs")
            .join(pdf_file_name(url, web_number))
    }

    /// Returns the cached text at `path`, or fetches `url` and stores it there.
    pub async fn read_or_fetch_text(
        &self,
        fetcher: &dyn Fetcher,
        url: &str,
        path: &Path,
    ) -> Result<String, String> {
        if path.exists() {
            tracing::debug!("[Crawl] {}: already exists", path.display());
            return tokio::fs::read_to_string(path)
                .await
                .map_err(|e| format!("Failed to read {}: {e}", path.display()));
        }

        tracing::debug!("[Crawl] {}: fetching...", url);
        let text = fetcher.fetch_text(url).await?;
        write_file(path, text.as_bytes()).await?;
        Ok(text)
    }

    /// Downloads `url` into `path` unless the file already exists. Returns
    /// whether a download happened.
    pub async fn download_if_missing(
        &self,
        fetcher: &dyn Fetcher,
        url: &str,
        path: &Path,
    ) -> Result<bool, String> {
        if path.exists() {
            tracing::info!("[Crawl] \t{}: already exists", url);
            return Ok(false);
        }

        tracing::info!("[Crawl] \t{}: fetching...", url);
        let bytes = fetcher.fetch_bytes(url).await?;
        write_file(path, &bytes).await?;
        Ok(true)
    }

    /// `Ok(None)` when the file does not exist.
    pub fn load_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>, String> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| format!("Failed to parse {}: {e}", path.display()))
    }

    pub fn store_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), String> {
        let content = serde_json::to_string_pretty(value)
            .map_err(|e| format!("Failed to serialize {}: {e}", path.display()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
        std::fs::write(path, content).map_err(|e| format!("Failed to write {}: {e}", path.display()))
    }
}

pub fn collection_dir_name(collection: &str) -> String {
    collection.replace(' ', "_")
}

/// Percent-decoded last path segment of the URL, or `<web_number>.pdf` when
/// that name is unusable as a file name or longer than 128 bytes.
pub fn pdf_file_name(url: &str, web_number: &str) -> String {
    let path = url_path(url);
    let raw = path.rsplit('/').next().unwrap_or_default();
    let name = urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw));
    if !is_safe_path_segment(&name) || name.len() > MAX_PDF_FILE_NAME_BYTES {
        format!("{web_number}.pdf")
    } else {
        name.into_owned()
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| format!("Failed to write {}: {e}", path.display()))
}
