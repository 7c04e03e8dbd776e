//! Configuration for bitmaploader.
//!
//! One INI file, `~/.bitmaploader/config.ini`, with a section per concern:
//!
//! ```ini
//! [slot]
//! presentation_delay_ms = 300
//! crossfade_ms = 300
//!
//! [cache]
//! directory = ~/.cache/bitmaploader
//! memory_size = 64MB
//! disk_size = 512MB
//!
//! [network]
//! concurrency = 8
//! timeout = 30
//!
//! [disk]
//! concurrency = 4
//!
//! [logging]
//! file = ~/.bitmaploader/bitmaploader.log
//! ```
//!
//! Every key is optional. [`ConfigFile`] converts to the component configs
//! ([`SlotConfig`](crate::slot::SlotConfig),
//! [`HttpFetcherConfig`](crate::provider::HttpFetcherConfig), ...) so
//! components never read raw settings.

mod defaults;
mod file;
mod parser;
mod settings;
mod size;
mod writer;

pub use defaults::{
    DEFAULT_CROSSFADE_MS, DEFAULT_DISK_CACHE_SIZE, DEFAULT_LOG_FILE, DEFAULT_MEMORY_CACHE_SIZE,
    DEFAULT_NETWORK_TIMEOUT_SECS, DEFAULT_PRESENTATION_DELAY_MS, MAX_POOL_CONCURRENCY,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    CacheSettings, ConfigFile, DiskSettings, LoggingSettings, NetworkSettings, SlotSettings,
};
pub use size::{format_size, parse_size, SizeParseError};
