//! Core types for the cache tiers.

use std::path::PathBuf;
use thiserror::Error;

/// Cache-related errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error during cache operations
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid cache configuration
    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),
}

/// Memory cache configuration.
#[derive(Debug, Clone)]
pub struct MemoryCacheConfig {
    /// Maximum decoded pixel bytes held in memory (default: 64 MB)
    pub max_size_bytes: usize,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: 64 * 1024 * 1024, // 64 MB
        }
    }
}

/// Disk cache configuration.
#[derive(Debug, Clone)]
pub struct DiskCacheConfig {
    /// Cache directory root
    pub directory: PathBuf,
    /// Maximum disk size in bytes (default: 512 MB)
    pub max_size_bytes: usize,
}

impl Default for DiskCacheConfig {
    fn default() -> Self {
        Self {
            directory: default_cache_dir(),
            max_size_bytes: 512 * 1024 * 1024, // 512 MB
        }
    }
}

/// Platform cache directory for downloaded images.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bitmaploader")
}
