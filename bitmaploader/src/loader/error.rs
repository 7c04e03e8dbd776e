use crate::bitmap::BitmapError;
use crate::cache::CacheError;
use crate::provider::FetchError;
use thiserror::Error;

/// Why a single load task failed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Reading the cached file failed
    #[error("Failed to read cached image: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Decode(#[from] BitmapError),

    /// A blocking helper task panicked or was aborted
    #[error("Worker failed: {0}")]
    Worker(String),

    /// The slot no longer wants the result
    #[error("Load cancelled")]
    Cancelled,
}

/// Errors building a [`BitmapLoader`](super::BitmapLoader).
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Failed to open cache: {0}")]
    Cache(#[from] CacheError),

    #[error("Failed to create fetcher: {0}")]
    Fetch(#[from] FetchError),
}
