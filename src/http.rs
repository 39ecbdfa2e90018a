//! Trail data fetching.
//!
//! GETs the per-mode GeoJSON document with a bounded timeout and a few
//! retries on transient failures, plus a HEAD probe for the optional GPX
//! download link. Only the fetch is async; indexing and remapping run
//! synchronously once the data arrives and are not cancellable
//! mid-computation.

use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;

use crate::error::{Result, TrailIndexError};
use crate::TrailCollection;

const MAX_RETRIES: u32 = 3;

/// Default overall load timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Configuration for the trail fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-request timeout; the surrounding load sequence reports expiry
    /// to the user
    pub timeout: Duration,
    /// Retries on transient (connection-level) failures
    pub max_retries: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_retries: MAX_RETRIES,
        }
    }
}

/// HTTP client for trail GeoJSON data.
pub struct TrailFetcher {
    client: Client,
    config: FetchConfig,
}

impl TrailFetcher {
    /// Create a fetcher with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TrailIndexError::Http {
                message: format!("failed to create HTTP client: {}", e),
                status_code: None,
            })?;

        Ok(Self { client, config })
    }

    /// Create a fetcher with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(FetchConfig::default())
    }

    /// Fetch and parse a trail GeoJSON document.
    ///
    /// HTTP status errors surface with their status code so the caller can
    /// distinguish a missing deployment file (404) from everything else.
    pub async fn fetch_collection(&self, url: &str) -> Result<TrailCollection> {
        let body = self.fetch_text(url).await?;
        TrailCollection::from_json(&body)
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        let mut retries = 0;

        loop {
            let response = self
                .client
                .get(url)
                .header("Cache-Control", "no-store")
                .send()
                .await;

            match response {
                Ok(resp) => {
                    let status = resp.status();
                    if !status.is_success() {
                        return Err(TrailIndexError::Http {
                            message: format!("GET {}", url),
                            status_code: Some(status.as_u16()),
                        });
                    }

                    debug!("[TrailFetcher] GET {} ok", url);
                    return resp.text().await.map_err(|e| TrailIndexError::Http {
                        message: format!("reading body of {}: {}", url, e),
                        status_code: None,
                    });
                }
                Err(e) => {
                    retries += 1;
                    if retries > self.config.max_retries {
                        return Err(TrailIndexError::Http {
                            message: format!("GET {}: {}", url, e),
                            status_code: None,
                        });
                    }

                    let backoff = Duration::from_millis(500 * (1 << retries));
                    warn!(
                        "[TrailFetcher] Error for {}: {}, retry {} after {:?}",
                        url, e, retries, backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    /// HEAD probe: does the resource exist and answer 2xx?
    ///
    /// Used for the optional GPX download link; any failure just hides the
    /// link, so this never errors.
    pub async fn head_ok(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_fetcher_construction() {
        assert!(TrailFetcher::with_defaults().is_ok());
    }

    #[tokio::test]
    async fn test_head_ok_is_false_for_invalid_url() {
        let fetcher = TrailFetcher::with_defaults().unwrap();
        assert!(!fetcher.head_ok("not a url").await);
    }
}
