//! Configuration management CLI commands.
//!
//! `config init` writes a default file, `config show` prints the values in
//! effect and `config path` prints where the file lives.

use bitmaploader::config::{config_file_path, format_size, ConfigFile};
use clap::Subcommand;
use std::path::Path;

use crate::error::CliError;
use crate::runner::load_config;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Create a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the configuration in effect
    Show,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, config_path: Option<&Path>) -> Result<(), CliError> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path);

    match command {
        ConfigCommands::Init { force } => run_init(&path, force),
        ConfigCommands::Show => run_show(config_path),
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    let written = if force {
        ConfigFile::default().save_to(path)?;
        true
    } else {
        ConfigFile::ensure_exists_at(path)?
    };

    if written {
        println!("Wrote default configuration to {}", path.display());
    } else {
        println!("Configuration already exists at {}", path.display());
        println!("Use --force to overwrite it with defaults.");
    }
    Ok(())
}

fn run_show(config_path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;

    let mut current_section = "";
    for (section, key, value) in settings_rows(&config) {
        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }
        println!("  {} = {}", key, value);
    }
    Ok(())
}

/// Every setting as `(section, key, display value)`, in file order.
pub fn settings_rows(config: &ConfigFile) -> Vec<(&'static str, &'static str, String)> {
    vec![
        (
            "slot",
            "presentation_delay_ms",
            config.slot.presentation_delay_ms.to_string(),
        ),
        ("slot", "crossfade_ms", config.slot.crossfade_ms.to_string()),
        (
            "cache",
            "directory",
            config.cache.directory.display().to_string(),
        ),
        ("cache", "memory_size", format_size(config.cache.memory_size)),
        ("cache", "disk_size", format_size(config.cache.disk_size)),
        (
            "network",
            "concurrency",
            config.network.concurrency.to_string(),
        ),
        ("network", "timeout", config.network.timeout.to_string()),
        ("network", "user_agent", config.network.user_agent.clone()),
        ("disk", "concurrency", config.disk.concurrency.to_string()),
        ("logging", "file", config.logging.file.display().to_string()),
    ]
}
