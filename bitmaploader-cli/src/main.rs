//! bitmaploader CLI - Command-line interface
//!
//! Drives display slots from the terminal: load images through the
//! memory, disk and network tiers, simulate a scrolling list and manage
//! the cache and configuration.

mod commands;
mod console;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::cache::CacheAction;
use commands::config::ConfigCommands;
use commands::fetch::FetchArgs;
use commands::scroll::ScrollArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "bitmaploader")]
#[command(version = bitmaploader::VERSION)]
#[command(about = "Load images into display slots with caching and cancellation", long_about = None)]
struct Cli {
    /// Enable debug logging (also echoes logs to stdout)
    #[arg(long, global = true)]
    debug: bool,

    /// Use this config file instead of ~/.bitmaploader/config.ini
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load identities into one slot, each superseding the previous
    Fetch(FetchArgs),

    /// Rebind a few slots round-robin across many identities
    Scroll(ScrollArgs),

    /// Manage the disk cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        e.exit();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Fetch(args) => {
            let runner = CliRunner::new(config_path, cli.debug)?;
            commands::fetch::run(args, &runner).await
        }
        Commands::Scroll(args) => {
            let runner = CliRunner::new(config_path, cli.debug)?;
            commands::scroll::run(args, &runner).await
        }
        Commands::Cache { action } => commands::cache::run(action, config_path),
        Commands::Config { command } => commands::config::run(command, config_path),
    }
}
