//! CLI runner for common setup.
//!
//! Loads configuration, initializes logging and builds the loader so the
//! slot-driving commands share one startup path.

use crate::error::CliError;
use bitmaploader::config::ConfigFile;
use bitmaploader::host::SlotHost;
use bitmaploader::loader::BitmapLoader;
use bitmaploader::logging::{init_logging, LoggingGuard, LoggingOptions};
use std::path::Path;
use tracing::info;

/// Owns everything a slot-driving command needs.
pub struct CliRunner {
    /// Keeps the log writer alive
    _logging_guard: LoggingGuard,
    config: ConfigFile,
    loader: BitmapLoader,
}

impl CliRunner {
    /// Load config (from `config_path` or the default location), start
    /// logging and build the loader.
    pub fn new(config_path: Option<&Path>, debug: bool) -> Result<Self, CliError> {
        let config = load_config(config_path)?;

        let logging_guard = init_logging(
            &config.logging.file,
            LoggingOptions {
                stdout: debug,
                debug,
            },
        )
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let loader = BitmapLoader::from_config(&config)?;

        Ok(Self {
            _logging_guard: logging_guard,
            config,
            loader,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn loader(&self) -> &BitmapLoader {
        &self.loader
    }

    /// A host whose slots use the configured timing.
    pub fn host(&self) -> SlotHost {
        SlotHost::with_config(self.config.slot_config())
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("bitmaploader v{}", bitmaploader::VERSION);
        info!(
            command,
            log_file = %self.config.logging.file.display(),
            "bitmaploader CLI starting"
        );
    }
}

impl Drop for CliRunner {
    fn drop(&mut self) {
        let cancelled = self.loader.shutdown();
        if cancelled > 0 {
            info!(cancelled, "Cancelled outstanding loads");
        }
    }
}

/// Load config from an explicit path or the default location.
pub fn load_config(config_path: Option<&Path>) -> Result<ConfigFile, CliError> {
    match config_path {
        Some(path) => Ok(ConfigFile::load_from(path)?),
        None => Ok(ConfigFile::load()?),
    }
}
