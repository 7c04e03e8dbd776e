//! Two-tier cache for images.
//!
//! The memory tier holds decoded bitmaps with LRU eviction; the disk tier
//! holds the encoded bytes as fetched, one file per identity. Both are shared
//! across every slot and worker task.

mod disk;
mod memory;
mod path;
mod stats;
mod r#trait;
mod types;

pub use disk::FileDiskCache;
pub use memory::MemoryCache;
pub use path::{cache_path, identity_digest};
pub use r#trait::{BitmapCache, ClearResult, DiskCache, DiskUsage};
pub use stats::CacheStats;
pub use types::{default_cache_dir, CacheError, DiskCacheConfig, MemoryCacheConfig};
