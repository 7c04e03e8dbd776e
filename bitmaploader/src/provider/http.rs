//! HTTP image fetching over reqwest.

use super::types::{FetchError, FetchFuture, ImageFetcher};
use bytes::Bytes;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Default User-Agent string for HTTP requests.
pub const DEFAULT_USER_AGENT: &str = concat!("bitmaploader/", env!("CARGO_PKG_VERSION"));

/// Settings for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    /// Whole-request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Idle connections kept per host
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            pool_max_idle_per_host: 16,
        }
    }
}

/// Async HTTP fetcher using reqwest.
///
/// Identities are treated as absolute `http`/`https` URLs.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with default configuration.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(&HttpFetcherConfig::default())
    }

    /// Creates a fetcher with custom configuration.
    pub fn with_config(config: &HttpFetcherConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| FetchError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<Bytes, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        trace!(url, "HTTP GET request starting");

        let response = match self.client.get(parsed).send().await {
            Ok(resp) => {
                debug!(url, status = resp.status().as_u16(), "HTTP response received");
                resp
            }
            Err(e) => {
                warn!(
                    url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(FetchError::Http(format!("Request failed: {}", e)));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "HTTP error status");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Http(format!("Failed to read response: {}", e)))?;

        if body.is_empty() {
            return Err(FetchError::EmptyBody(url.to_string()));
        }

        trace!(url, bytes = body.len(), "HTTP body read");
        Ok(body)
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, identity: &'a str) -> FetchFuture<'a> {
        Box::pin(self.get(identity))
    }

    fn name(&self) -> &str {
        "http"
    }
}
