//! In-memory cache with LRU eviction.

use crate::bitmap::Bitmap;
use crate::cache::r#trait::BitmapCache;
use crate::cache::types::MemoryCacheConfig;
use crate::cache::CacheStats;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Entry in the memory cache.
#[derive(Debug, Clone)]
struct CacheEntry {
    bitmap: Bitmap,
    /// Logical access tick for LRU ordering
    last_accessed: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    size_bytes: usize,
    /// Monotonic counter; bumped on every insert and hit
    tick: u64,
    stats: CacheStats,
}

impl Inner {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

/// In-memory cache for decoded bitmaps.
///
/// Bounded by the decoded pixel size of its entries. When an insert would
/// exceed the limit, least recently used entries are evicted first. A bitmap
/// larger than the whole budget is never cached.
pub struct MemoryCache {
    inner: Mutex<Inner>,
    max_size_bytes: usize,
}

impl MemoryCache {
    /// Create a new memory cache with the given size limit.
    pub fn new(max_size_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            max_size_bytes,
        }
    }

    /// Create a memory cache from its configuration.
    pub fn with_config(config: &MemoryCacheConfig) -> Self {
        Self::new(config.max_size_bytes)
    }

    /// Get the current number of entries in the cache.
    pub fn entry_count(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Get the current size of the cache in bytes.
    pub fn size_bytes(&self) -> usize {
        self.inner.lock().size_bytes
    }

    /// Get the maximum size of the cache in bytes.
    pub fn max_size_bytes(&self) -> usize {
        self.max_size_bytes
    }

    /// Evict least recently used entries until `required` more bytes fit.
    fn evict_lru_until_fits(&self, inner: &mut Inner, required: usize) {
        if inner.size_bytes + required <= self.max_size_bytes {
            return;
        }
        let target_size = self.max_size_bytes.saturating_sub(required);

        let mut candidates: Vec<(String, u64, usize)> = inner
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.last_accessed, v.bitmap.byte_size()))
            .collect();
        candidates.sort_by_key(|(_, accessed, _)| *accessed);

        let mut evicted = 0;
        for (identity, _, size) in candidates {
            if inner.size_bytes <= target_size {
                break;
            }
            inner.entries.remove(&identity);
            inner.size_bytes = inner.size_bytes.saturating_sub(size);
            evicted += 1;
            trace!(identity = %identity, size, "Evicted bitmap from memory cache");
        }

        if evicted > 0 {
            debug!(
                evicted,
                size_bytes = inner.size_bytes,
                "Memory cache eviction"
            );
        }
        inner.stats.record_eviction(evicted);
    }
}

impl BitmapCache for MemoryCache {
    fn get(&self, identity: &str) -> Option<Bitmap> {
        let mut inner = self.inner.lock();
        let tick = inner.next_tick();

        let hit = inner.entries.get_mut(identity).map(|entry| {
            entry.last_accessed = tick;
            entry.bitmap.clone()
        });

        match hit {
            Some(bitmap) => {
                inner.stats.record_hit();
                Some(bitmap)
            }
            None => {
                inner.stats.record_miss();
                None
            }
        }
    }

    fn put(&self, identity: &str, bitmap: Bitmap) {
        let size = bitmap.byte_size();
        if size > self.max_size_bytes {
            trace!(identity, size, "Bitmap exceeds memory cache budget, not caching");
            return;
        }

        let mut inner = self.inner.lock();

        if let Some(previous) = inner.entries.remove(identity) {
            inner.size_bytes = inner.size_bytes.saturating_sub(previous.bitmap.byte_size());
        }

        self.evict_lru_until_fits(&mut inner, size);

        let tick = inner.next_tick();
        inner.entries.insert(
            identity.to_owned(),
            CacheEntry {
                bitmap,
                last_accessed: tick,
            },
        );
        inner.size_bytes += size;

        let (size_bytes, count) = (inner.size_bytes, inner.entries.len());
        inner.stats.record_write();
        inner.stats.update_size(size_bytes, count);
    }

    fn contains(&self, identity: &str) -> bool {
        self.inner.lock().entries.contains_key(identity)
    }

    fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.size_bytes = 0;
        inner.stats.update_size(0, 0);
    }

    fn stats(&self) -> CacheStats {
        self.inner.lock().stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 10x10 RGBA bitmap: 400 bytes.
    fn tile(shade: u8) -> Bitmap {
        Bitmap::solid(10, 10, [shade, shade, shade, 255])
    }

    #[test]
    fn test_memory_cache_new() {
        let cache = MemoryCache::new(1_000_000);
        assert_eq!(cache.max_size_bytes(), 1_000_000);
        assert_eq!(cache.entry_count(), 0);
        assert_eq!(cache.size_bytes(), 0);
    }

    #[test]
    fn test_memory_cache_put_and_get() {
        let cache = MemoryCache::new(1_000_000);
        let bitmap = tile(1);

        cache.put("a", bitmap.clone());

        let retrieved = cache.get("a").unwrap();
        assert!(retrieved.ptr_eq(&bitmap));
        assert_eq!(cache.entry_count(), 1);
    }

    #[test]
    fn test_memory_cache_miss_records_stats() {
        let cache = MemoryCache::new(1_000_000);

        assert!(cache.get("missing").is_none());
        cache.put("present", tile(1));
        assert!(cache.get("present").is_some());

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.writes, 1);
    }

    #[test]
    fn test_memory_cache_replace_keeps_size_accurate() {
        let cache = MemoryCache::new(1_000_000);
        cache.put("a", tile(1));
        cache.put("a", tile(2));

        assert_eq!(cache.entry_count(), 1);
        assert_eq!(cache.size_bytes(), 400);
        assert_eq!(cache.get("a").unwrap(), tile(2));
    }

    #[test]
    fn test_memory_cache_clear() {
        let cache = MemoryCache::new(1_000_000);
        cache.put("a", tile(1));

        cache.clear();

        assert_eq!(cache.entry_count(), 0);
        assert_eq!(cache.size_bytes(), 0);
        assert!(!cache.contains("a"));
    }

    #[test]
    fn test_memory_cache_lru_eviction() {
        // Room for two 400-byte entries
        let cache = MemoryCache::new(1000);

        cache.put("a", tile(1));
        cache.put("b", tile(2));
        cache.put("c", tile(3));

        assert!(!cache.contains("a"), "Oldest entry should be evicted");
        assert!(cache.contains("b"));
        assert!(cache.contains("c"));
        assert!(cache.size_bytes() <= 1000);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_memory_cache_get_refreshes_recency() {
        let cache = MemoryCache::new(1000);

        cache.put("a", tile(1));
        cache.put("b", tile(2));
        cache.get("a");
        cache.put("c", tile(3));

        assert!(cache.contains("a"), "Recently read entry should survive");
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn test_memory_cache_rejects_oversized_bitmap() {
        let cache = MemoryCache::new(100);
        cache.put("big", tile(1));

        assert!(!cache.contains("big"));
        assert_eq!(cache.size_bytes(), 0);
    }

    #[test]
    fn test_memory_cache_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MemoryCache>();
    }
}
