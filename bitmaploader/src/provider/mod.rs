//! Network sources for images.
//!
//! The loader only needs an [`ImageFetcher`]; [`HttpFetcher`] is the
//! production implementation over reqwest.

mod http;
mod types;

pub use http::{HttpFetcher, HttpFetcherConfig, DEFAULT_USER_AGENT};
pub use types::{FetchError, FetchFuture, ImageFetcher};
