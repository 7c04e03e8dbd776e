//! CLI error handling with user-friendly messages.
//!
//! Every command returns `Result<(), CliError>`; `main` prints the error and
//! exits with status 1.

use bitmaploader::bitmap::BitmapError;
use bitmaploader::cache::CacheError;
use bitmaploader::config::ConfigFileError;
use bitmaploader::loader::LoaderError;
use bitmaploader::slot::SlotError;
use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration could not be loaded or saved
    Config(ConfigFileError),
    /// Loader could not be built
    Loader(LoaderError),
    /// A request was rejected by the slot
    Request(SlotError),
    /// Disk cache operation failed
    Cache(CacheError),
    /// The final identity failed to load
    LoadFailed { identity: String },
    /// Nothing settled before the deadline
    Timeout { waited: Duration },
    /// Failed to write the output image
    FileWrite { path: PathBuf, error: BitmapError },
    /// Invalid command-line input
    Usage(String),
}

impl CliError {
    /// Print the error and exit with status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Config(ConfigFileError::InvalidValue { .. }) => {
                eprintln!();
                eprintln!("Run 'bitmaploader config path' to locate the file,");
                eprintln!("or 'bitmaploader config show' to see the values in effect.");
            }
            CliError::LoadFailed { .. } => {
                eprintln!();
                eprintln!("See the log file for the underlying error.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Loader(e) => write!(f, "Failed to start loader: {}", e),
            CliError::Request(e) => write!(f, "Request rejected: {}", e),
            CliError::Cache(e) => write!(f, "Cache error: {}", e),
            CliError::LoadFailed { identity } => write!(f, "Failed to load '{}'", identity),
            CliError::Timeout { waited } => {
                write!(f, "Timed out after {}s waiting for images", waited.as_secs())
            }
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write '{}': {}", path.display(), error)
            }
            CliError::Usage(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Loader(e) => Some(e),
            CliError::Request(e) => Some(e),
            CliError::Cache(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<LoaderError> for CliError {
    fn from(e: LoaderError) -> Self {
        CliError::Loader(e)
    }
}

impl From<SlotError> for CliError {
    fn from(e: SlotError) -> Self {
        CliError::Request(e)
    }
}

impl From<CacheError> for CliError {
    fn from(e: CacheError) -> Self {
        CliError::Cache(e)
    }
}
