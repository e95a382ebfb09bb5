use crate::sources::configs::CrawlConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, Response};
use std::time::Duration;

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, String>;
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, String>;
}

/// One `reqwest::Client` shared by the whole crawl run. Dropping it releases
/// the connection pool on every exit path.
pub struct HttpFetcher {
    client: Client,
    request_delay: Duration,
    max_retries: u32,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self, String> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            request_delay: Duration::from_millis(config.request_delay_ms),
            max_retries: config.max_retries,
        })
    }

    async fn get(&self, url: &str) -> Result<Response, String> {
        let mut attempt = 0;
        loop {
            if !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            let result = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| format!("Network error fetching {url}: {e}"))
                .and_then(|response| {
                    if response.status().is_success() {
                        Ok(response)
                    } else {
                        Err(format!(
                            "HTTP error {} fetching {url}",
                            response.status().as_u16()
                        ))
                    }
                });

            match result {
                Ok(response) => return Ok(response),
                Err(err) if attempt < self.max_retries => {
                    let backoff = Duration::from_secs(2u64.pow(attempt));
                    tracing::warn!(
                        "[Crawl] Attempt {} failed: {}; retrying in {}s",
                        attempt + 1,
                        err,
                        backoff.as_secs()
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, String> {
        self.get(url)
            .await?
            .text()
            .await
            .map_err(|e| format!("Error reading response body from {url}: {e}"))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, String> {
        let bytes = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|e| format!("Error reading response body from {url}: {e}"))?;
        Ok(bytes.to_vec())
    }
}
