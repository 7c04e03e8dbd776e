//! Cache management CLI commands.

use bitmaploader::cache::{DiskCache, FileDiskCache};
use bitmaploader::config::format_size;
use clap::Subcommand;
use std::path::Path;

use crate::error::CliError;
use crate::runner::load_config;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Remove every cached image file
    Clear,
    /// Show disk cache usage
    Stats,
}

/// Run a cache subcommand.
pub fn run(action: CacheAction, config_path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let cache = FileDiskCache::with_config(&config.disk_cache_config())?;

    match action {
        CacheAction::Clear => {
            println!("Clearing disk cache at: {}", cache.cache_dir().display());
            let result = cache.clear()?;
            println!(
                "Deleted {} files, freed {}",
                result.files_deleted,
                format_size(result.bytes_freed as usize)
            );
        }
        CacheAction::Stats => {
            let usage = cache.usage()?;
            println!("Disk cache: {}", cache.cache_dir().display());
            println!("  Files: {}", usage.files);
            println!(
                "  Size:  {} of {}",
                format_size(usage.bytes as usize),
                format_size(cache.max_size_bytes())
            );
        }
    }

    Ok(())
}
