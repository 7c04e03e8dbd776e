//! Default values and the `ConfigFile::default()` implementation.

use super::file::config_directory;
use super::settings::*;
use crate::cache::default_cache_dir;
use crate::executor::{DEFAULT_DISK_IO_CAPACITY, DEFAULT_NETWORK_CAPACITY};
use crate::provider::DEFAULT_USER_AGENT;

/// Default presentation delay (milliseconds).
pub const DEFAULT_PRESENTATION_DELAY_MS: u64 = 300;

/// Default cross-fade length (milliseconds).
pub const DEFAULT_CROSSFADE_MS: u64 = 300;

/// Default memory cache size (64 MB of decoded pixels).
pub const DEFAULT_MEMORY_CACHE_SIZE: usize = 64 * 1024 * 1024;

/// Default disk cache size (512 MB).
pub const DEFAULT_DISK_CACHE_SIZE: usize = 512 * 1024 * 1024;

/// Default HTTP timeout (seconds).
pub const DEFAULT_NETWORK_TIMEOUT_SECS: u64 = 30;

/// Upper bound accepted for either pool's concurrency.
pub const MAX_POOL_CONCURRENCY: usize = 256;

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "bitmaploader.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            slot: SlotSettings {
                presentation_delay_ms: DEFAULT_PRESENTATION_DELAY_MS,
                crossfade_ms: DEFAULT_CROSSFADE_MS,
            },
            cache: CacheSettings {
                directory: default_cache_dir(),
                memory_size: DEFAULT_MEMORY_CACHE_SIZE,
                disk_size: DEFAULT_DISK_CACHE_SIZE,
            },
            network: NetworkSettings {
                concurrency: DEFAULT_NETWORK_CAPACITY,
                timeout: DEFAULT_NETWORK_TIMEOUT_SECS,
                user_agent: DEFAULT_USER_AGENT.to_string(),
            },
            disk: DiskSettings {
                concurrency: DEFAULT_DISK_IO_CAPACITY,
            },
            logging: LoggingSettings {
                file: config_directory().join(DEFAULT_LOG_FILE),
            },
        }
    }
}
