//! Logging setup.
//!
//! - Writes to a log file that is truncated at the start of each session
//! - Optionally mirrors to stdout for interactive use
//! - Level comes from `RUST_LOG`, falling back to `info` (or `debug` with
//!   [`LoggingOptions::debug`])

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping it flushes and closes the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Knobs for [`init_logging`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingOptions {
    /// Also log to stdout
    pub stdout: bool,
    /// Default to `debug` instead of `info` when `RUST_LOG` is unset
    pub debug: bool,
}

/// Install the global subscriber, logging to `log_file`.
///
/// Creates the parent directory and truncates any previous log.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be
/// truncated.
pub fn init_logging(log_file: &Path, options: LoggingOptions) -> Result<LoggingGuard, io::Error> {
    let (dir, name) = prepare_log_file(log_file)?;

    let file_appender = tracing_appender::rolling::never(dir, name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(true);

    let stdout_layer = options.stdout.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .with_ansi(true)
            .with_target(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter(options.debug))
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn env_filter(debug: bool) -> EnvFilter {
    let fallback = if debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Create the log directory and empty the file. Returns (dir, file name).
fn prepare_log_file(log_file: &Path) -> Result<(&Path, &std::ffi::OsStr), io::Error> {
    let name = log_file.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("log path has no file name: {}", log_file.display()),
        )
    })?;
    let dir = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    fs::create_dir_all(dir)?;
    fs::write(log_file, "")?;
    Ok((dir, name))
}
