//! Disk cache with atomic writes and size-bounded eviction.

use crate::cache::path::{cache_path, is_cache_file, PARTIAL_FILE_EXTENSION};
use crate::cache::r#trait::{ClearResult, DiskCache, DiskUsage};
use crate::cache::types::{CacheError, DiskCacheConfig};
use crate::cache::CacheStats;
use parking_lot::Mutex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// Disk cache for encoded image bytes.
///
/// Files are written to a temporary name and renamed into place, so
/// [`DiskCache::exists`] never reports a half-written file.
pub struct FileDiskCache {
    /// Cache directory root
    cache_dir: PathBuf,
    /// Maximum size in bytes
    max_size_bytes: usize,
    /// Suffix source for temporary file names
    write_seq: AtomicU64,
    stats: Mutex<CacheStats>,
}

impl FileDiskCache {
    /// Open (and create if needed) a disk cache rooted at `cache_dir`.
    ///
    /// Existing files are counted so the size limit applies across runs, and
    /// the cache is trimmed immediately if it is already over the limit.
    pub fn new(cache_dir: PathBuf, max_size_bytes: usize) -> Result<Self, CacheError> {
        if max_size_bytes == 0 {
            return Err(CacheError::InvalidConfig(
                "disk cache size must be greater than zero".to_string(),
            ));
        }
        fs::create_dir_all(&cache_dir)?;

        let cache = Self {
            cache_dir,
            max_size_bytes,
            write_seq: AtomicU64::new(0),
            stats: Mutex::new(CacheStats::new()),
        };

        let usage = cache.usage()?;
        cache
            .stats
            .lock()
            .update_size(usage.bytes as usize, usage.files as usize);
        cache.evict_if_over_limit()?;

        Ok(cache)
    }

    /// Open a disk cache from its configuration.
    pub fn with_config(config: &DiskCacheConfig) -> Result<Self, CacheError> {
        Self::new(config.directory.clone(), config.max_size_bytes)
    }

    /// Root directory of the cache.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Maximum size of the cache in bytes.
    pub fn max_size_bytes(&self) -> usize {
        self.max_size_bytes
    }

    /// Delete the oldest files until the cache fits its size limit.
    pub fn evict_if_over_limit(&self) -> Result<u64, CacheError> {
        if self.stats.lock().size_bytes <= self.max_size_bytes {
            return Ok(0);
        }

        let mut files = cache_files(&self.cache_dir)?;
        files.sort_by_key(|(_, _, modified)| *modified);

        let mut size: usize = files.iter().map(|(_, len, _)| *len as usize).sum();
        let mut count = files.len();
        let mut evicted = 0;

        for (path, len, _) in files {
            if size <= self.max_size_bytes {
                break;
            }
            match fs::remove_file(&path) {
                Ok(()) => {
                    size = size.saturating_sub(len as usize);
                    count -= 1;
                    evicted += 1;
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to evict cache file"),
            }
        }

        let mut stats = self.stats.lock();
        stats.record_eviction(evicted);
        stats.update_size(size, count);
        drop(stats);

        info!(
            evicted,
            size_bytes = size,
            limit = self.max_size_bytes,
            "Disk cache eviction"
        );
        Ok(evicted)
    }

    fn partial_path(&self, final_path: &Path) -> PathBuf {
        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        final_path.with_extension(format!("{}.{}", seq, PARTIAL_FILE_EXTENSION))
    }

    fn write_atomically(&self, path: &Path, data: &[u8]) -> io::Result<Option<u64>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let replaced = fs::metadata(path).ok().map(|m| m.len());

        let partial = self.partial_path(path);
        if let Err(e) = fs::write(&partial, data).and_then(|_| fs::rename(&partial, path)) {
            let _ = fs::remove_file(&partial);
            return Err(e);
        }
        Ok(replaced)
    }
}

impl DiskCache for FileDiskCache {
    fn exists(&self, identity: &str) -> bool {
        let present = self.locate(identity).is_file();
        let mut stats = self.stats.lock();
        if present {
            stats.record_hit();
        } else {
            stats.record_miss();
        }
        present
    }

    fn locate(&self, identity: &str) -> PathBuf {
        cache_path(&self.cache_dir, identity)
    }

    fn store(&self, identity: &str, data: &[u8]) -> Result<PathBuf, CacheError> {
        let path = self.locate(identity);

        let replaced = match self.write_atomically(&path, data) {
            Ok(replaced) => replaced,
            Err(e) => {
                self.stats.lock().record_write_failure();
                return Err(e.into());
            }
        };

        {
            let mut stats = self.stats.lock();
            let (mut size, mut count) = (stats.size_bytes, stats.entry_count);
            match replaced {
                Some(old_len) => size = size.saturating_sub(old_len as usize),
                None => count += 1,
            }
            size += data.len();
            stats.record_write();
            stats.update_size(size, count);
        }
        debug!(identity, path = %path.display(), bytes = data.len(), "Stored image on disk");

        self.evict_if_over_limit()?;
        Ok(path)
    }

    fn clear(&self) -> Result<ClearResult, CacheError> {
        let mut result = ClearResult::default();
        for (path, len, _) in cache_files(&self.cache_dir)? {
            if fs::remove_file(&path).is_ok() {
                result.files_deleted += 1;
                result.bytes_freed += len;
            }
        }
        self.stats.lock().update_size(0, 0);
        Ok(result)
    }

    fn usage(&self) -> Result<DiskUsage, CacheError> {
        let files = cache_files(&self.cache_dir)?;
        Ok(DiskUsage {
            files: files.len() as u64,
            bytes: files.iter().map(|(_, len, _)| *len).sum(),
        })
    }

    fn stats(&self) -> CacheStats {
        self.stats.lock().clone()
    }
}

/// List completed cache files as `(path, length, modified)`.
fn cache_files(cache_dir: &Path) -> io::Result<Vec<(PathBuf, u64, SystemTime)>> {
    let mut files = Vec::new();
    if !cache_dir.exists() {
        return Ok(files);
    }

    for shard in fs::read_dir(cache_dir)? {
        let shard = shard?.path();
        if !shard.is_dir() {
            continue;
        }
        for entry in fs::read_dir(&shard)? {
            let entry = entry?;
            let path = entry.path();
            if !is_cache_file(&path) {
                continue;
            }
            let metadata = entry.metadata()?;
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            files.push((path, metadata.len(), modified));
        }
    }
    Ok(files)
}
