//! Tier selection and dispatch.
//!
//! A [`BitmapLoader`] bundles the three tiers and the two pools that serve
//! them:
//!
//! ```text
//!                 ┌──────────────┐
//! identity ──────►│ MemoryCache  │── hit ──► slot presents at once
//!                 └──────┬───────┘
//!                        │ miss
//!                 ┌──────▼───────┐
//!                 │ disk exists? │
//!                 └──┬────────┬──┘
//!                 yes│        │no
//!          ┌─────────▼──┐  ┌──▼──────────┐
//!          │ disk pool  │  │ network pool│  fetch → store → decode
//!          │ read→decode│  └──────┬──────┘
//!          └─────┬──────┘         │
//!                └──── memory.put ┴──► CompletionGate
//! ```
//!
//! The memory check belongs to the slot; the loader only answers "disk or
//! network" and runs the task.

mod error;
mod task;

pub use error::{LoadError, LoaderError};

use crate::cache::{BitmapCache, DiskCache, FileDiskCache, MemoryCache};
use crate::config::ConfigFile;
use crate::executor::{
    ExecutionPool, ResourceType, TaskHandle, DEFAULT_DISK_IO_CAPACITY, DEFAULT_NETWORK_CAPACITY,
};
use crate::provider::{HttpFetcher, ImageFetcher};
use crate::slot::CompletionGate;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Where a memory-cache miss is served from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceType {
    /// The encoded file is in the disk cache.
    Disk,

    /// The image has to be fetched.
    Network,
}

impl SourceType {
    /// Pick the tier for a memory-cache miss.
    pub fn select(disk_has_file: bool) -> Self {
        if disk_has_file {
            Self::Disk
        } else {
            Self::Network
        }
    }

    /// Pool kind that serves this source.
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Self::Disk => ResourceType::DiskIO,
            Self::Network => ResourceType::Network,
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disk => write!(f, "disk"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// Cache tiers, fetcher and pools shared by every slot.
///
/// Cloning is cheap and clones share everything.
#[derive(Clone)]
pub struct BitmapLoader {
    memory: Arc<dyn BitmapCache>,
    disk: Arc<dyn DiskCache>,
    fetcher: Arc<dyn ImageFetcher>,
    network_pool: ExecutionPool,
    disk_pool: ExecutionPool,
}

impl BitmapLoader {
    /// Create a loader with default pool sizes.
    pub fn new(
        memory: Arc<dyn BitmapCache>,
        disk: Arc<dyn DiskCache>,
        fetcher: Arc<dyn ImageFetcher>,
    ) -> Self {
        Self {
            memory,
            disk,
            fetcher,
            network_pool: ExecutionPool::new(ResourceType::Network, DEFAULT_NETWORK_CAPACITY),
            disk_pool: ExecutionPool::new(ResourceType::DiskIO, DEFAULT_DISK_IO_CAPACITY),
        }
    }

    /// Replace both pools.
    pub fn with_pools(mut self, network_pool: ExecutionPool, disk_pool: ExecutionPool) -> Self {
        self.network_pool = network_pool;
        self.disk_pool = disk_pool;
        self
    }

    /// Build the standard stack (memory LRU, file disk cache, HTTP) from config.
    pub fn from_config(config: &ConfigFile) -> Result<Self, LoaderError> {
        let memory = MemoryCache::with_config(&config.memory_cache_config());
        let disk = FileDiskCache::with_config(&config.disk_cache_config())?;
        let fetcher = HttpFetcher::with_config(&config.fetcher_config())?;

        info!(
            cache_dir = %config.cache.directory.display(),
            network_concurrency = config.network.concurrency,
            disk_concurrency = config.disk.concurrency,
            "Loader ready"
        );

        Ok(Self::new(Arc::new(memory), Arc::new(disk), Arc::new(fetcher)).with_pools(
            ExecutionPool::new(ResourceType::Network, config.network.concurrency),
            ExecutionPool::new(ResourceType::DiskIO, config.disk.concurrency),
        ))
    }

    pub fn memory_cache(&self) -> &Arc<dyn BitmapCache> {
        &self.memory
    }

    pub fn disk_cache(&self) -> &Arc<dyn DiskCache> {
        &self.disk
    }

    pub fn fetcher(&self) -> &Arc<dyn ImageFetcher> {
        &self.fetcher
    }

    pub fn network_pool(&self) -> &ExecutionPool {
        &self.network_pool
    }

    pub fn disk_pool(&self) -> &ExecutionPool {
        &self.disk_pool
    }

    /// The pool that serves `source`.
    pub fn pool(&self, source: SourceType) -> &ExecutionPool {
        match source {
            SourceType::Disk => &self.disk_pool,
            SourceType::Network => &self.network_pool,
        }
    }

    /// Disk or network for an identity that missed the memory cache.
    pub fn source_for(&self, identity: &str) -> SourceType {
        SourceType::select(self.disk.exists(identity))
    }

    /// Submit a load for `identity` to the pool for `source`.
    ///
    /// The outcome is reported through `gate` unless the task is cancelled
    /// first. Requires a running tokio runtime.
    pub fn dispatch(&self, source: SourceType, identity: &str, gate: CompletionGate) -> TaskHandle {
        let identity = identity.to_string();
        let memory = Arc::clone(&self.memory);
        let disk = Arc::clone(&self.disk);
        let name = format!("{}:{}", source, identity);

        match source {
            SourceType::Disk => self.disk_pool.submit(name, move |ctx| async move {
                let result =
                    task::load_from_disk(&ctx, &identity, disk.as_ref(), memory.as_ref()).await;
                task::report(&gate, &identity, result);
            }),
            SourceType::Network => {
                let fetcher = Arc::clone(&self.fetcher);
                self.network_pool.submit(name, move |ctx| async move {
                    let result = task::load_from_network(
                        &ctx,
                        &identity,
                        fetcher.as_ref(),
                        &disk,
                        memory.as_ref(),
                    )
                    .await;
                    task::report(&gate, &identity, result);
                })
            }
        }
    }

    /// Cancel everything in flight on both pools. Returns how many tasks
    /// were signalled.
    pub fn shutdown(&self) -> usize {
        self.network_pool.cancel_all(true) + self.disk_pool.cancel_all(true)
    }
}

impl fmt::Debug for BitmapLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitmapLoader")
            .field("fetcher", &self.fetcher.name())
            .field("network_pool", &self.network_pool)
            .field("disk_pool", &self.disk_pool)
            .finish()
    }
}
