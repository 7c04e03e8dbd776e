//! Settings structs, one per `[section]` of config.ini.
//!
//! Pure data; parsing lives in [`super::parser`] and serialization in
//! [`super::writer`].

use std::path::PathBuf;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Slot timing
    pub slot: SlotSettings,
    /// Memory and disk cache tiers
    pub cache: CacheSettings,
    /// Network pool and HTTP client
    pub network: NetworkSettings,
    /// Disk pool
    pub disk: DiskSettings,
    /// Log output
    pub logging: LoggingSettings,
}

/// `[slot]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSettings {
    /// Wait between a load finishing and the image being shown
    pub presentation_delay_ms: u64,
    /// Placeholder-to-image transition length
    pub crossfade_ms: u64,
}

/// `[cache]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Disk cache root
    pub directory: PathBuf,
    /// Decoded bytes kept in memory
    pub memory_size: usize,
    /// Encoded bytes kept on disk
    pub disk_size: usize,
}

/// `[network]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    /// Concurrent fetches
    pub concurrency: usize,
    /// Request timeout in seconds
    pub timeout: u64,
    pub user_agent: String,
}

/// `[disk]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskSettings {
    /// Concurrent cache reads
    pub concurrency: usize,
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
