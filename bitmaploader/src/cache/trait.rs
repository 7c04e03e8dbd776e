//! Cache tier traits consumed by the loader and the slot coordinator.

use crate::bitmap::Bitmap;
use crate::cache::types::CacheError;
use crate::cache::CacheStats;
use std::path::PathBuf;

/// In-memory tier holding decoded bitmaps.
///
/// Shared by every slot and every worker task, so implementations must be
/// safe for concurrent access.
///
/// # Example
///
/// ```
/// use bitmaploader::bitmap::Bitmap;
/// use bitmaploader::cache::{BitmapCache, MemoryCache};
///
/// let cache = MemoryCache::new(1024 * 1024);
/// cache.put("https://example.com/a.png", Bitmap::solid(4, 4, [0, 0, 0, 255]));
///
/// assert!(cache.get("https://example.com/a.png").is_some());
/// assert!(cache.get("https://example.com/b.png").is_none());
/// ```
pub trait BitmapCache: Send + Sync {
    /// Look up a decoded bitmap.
    fn get(&self, identity: &str) -> Option<Bitmap>;

    /// Insert or replace a decoded bitmap.
    fn put(&self, identity: &str, bitmap: Bitmap);

    /// Check for presence without touching recency.
    fn contains(&self, identity: &str) -> bool;

    /// Drop every entry.
    fn clear(&self);

    /// Snapshot of the tier's counters.
    fn stats(&self) -> CacheStats;
}

/// Persistent tier holding encoded image bytes, one file per identity.
///
/// The coordinator only asks [`exists`](DiskCache::exists) to pick a tier;
/// reading the file is the disk task's job.
pub trait DiskCache: Send + Sync {
    /// True if a complete file for `identity` is present.
    fn exists(&self, identity: &str) -> bool;

    /// Where the file for `identity` lives (whether or not it exists).
    fn locate(&self, identity: &str) -> PathBuf;

    /// Persist encoded bytes for `identity`, returning the final path.
    fn store(&self, identity: &str, data: &[u8]) -> Result<PathBuf, CacheError>;

    /// Remove every cached file.
    fn clear(&self) -> Result<ClearResult, CacheError>;

    /// Count files and bytes currently on disk.
    fn usage(&self) -> Result<DiskUsage, CacheError>;

    /// Snapshot of the tier's counters.
    fn stats(&self) -> CacheStats;
}

/// Outcome of [`DiskCache::clear`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearResult {
    pub files_deleted: u64,
    pub bytes_freed: u64,
}

/// Outcome of [`DiskCache::usage`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskUsage {
    pub files: u64,
    pub bytes: u64,
}
