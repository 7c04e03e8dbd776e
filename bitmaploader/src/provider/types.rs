//! Fetcher types and traits

use bytes::Bytes;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by [`ImageFetcher::fetch`].
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Bytes, FetchError>> + Send + 'a>>;

/// Errors that can occur while fetching image bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(String),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The identity is not a fetchable URL
    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    /// Server answered with an empty body
    #[error("Empty response from {0}")]
    EmptyBody(String),
}

/// Source of encoded image bytes for identities that miss both caches.
///
/// Object safe so a loader can hold `Arc<dyn ImageFetcher>` and tests can
/// swap in scripted fetchers.
pub trait ImageFetcher: Send + Sync {
    /// Fetch the encoded bytes for `identity`.
    fn fetch<'a>(&'a self, identity: &'a str) -> FetchFuture<'a>;

    /// Name used in logs.
    fn name(&self) -> &str;
}
