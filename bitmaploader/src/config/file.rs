//! Configuration file handling for ~/.bitmaploader/config.ini.
//!
//! Missing files and missing keys fall back to defaults. Settings structs
//! live in [`super::settings`], constants in [`super::defaults`], parsing in
//! [`super::parser`] and serialization in [`super::writer`].

use super::settings::ConfigFile;
use crate::cache::{DiskCacheConfig, MemoryCacheConfig};
use crate::provider::HttpFetcherConfig;
use crate::slot::SlotConfig;
use ini::Ini;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load from the default path. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save to the default path.
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Write a default config file to `path` unless one exists.
    ///
    /// Returns true if a file was written.
    pub fn ensure_exists_at(path: &Path) -> Result<bool, ConfigFileError> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().save_to(path)?;
        Ok(true)
    }

    /// Defaults for new slots.
    pub fn slot_config(&self) -> SlotConfig {
        SlotConfig {
            presentation_delay: Duration::from_millis(self.slot.presentation_delay_ms),
            crossfade: Duration::from_millis(self.slot.crossfade_ms),
            placeholder: None,
        }
    }

    pub fn memory_cache_config(&self) -> MemoryCacheConfig {
        MemoryCacheConfig {
            max_size_bytes: self.cache.memory_size,
        }
    }

    pub fn disk_cache_config(&self) -> DiskCacheConfig {
        DiskCacheConfig {
            directory: self.cache.directory.clone(),
            max_size_bytes: self.cache.disk_size,
        }
    }

    pub fn fetcher_config(&self) -> HttpFetcherConfig {
        HttpFetcherConfig {
            timeout: Duration::from_secs(self.network.timeout),
            user_agent: self.network.user_agent.clone(),
            ..HttpFetcherConfig::default()
        }
    }
}

/// The config directory (~/.bitmaploader).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bitmaploader")
}

/// The config file (~/.bitmaploader/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
