//! INI serialization: `ConfigFile` → commented config.ini text.

use std::path::Path;

use super::settings::ConfigFile;
use super::size::format_size;

/// Render `config` as the commented INI written to disk.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[slot]
; Wait between an image finishing loading and it being shown, in
; milliseconds (default: 300). The slot re-checks that it still wants the
; image once the wait is over.
presentation_delay_ms = {}
; Placeholder-to-image cross-fade length in milliseconds (default: 300)
crossfade_ms = {}

[cache]
; Disk cache directory. If empty, the platform cache directory is used
; (~/.cache/bitmaploader on Linux)
directory = {}
; Decoded images kept in memory (default: 64MB)
; Supports: KB, MB, GB suffixes
memory_size = {}
; Downloaded files kept on disk (default: 512MB)
disk_size = {}

[network]
; Concurrent downloads (default: 8, max: 256)
concurrency = {}
; Request timeout in seconds (default: 30)
timeout = {}
; User-Agent header sent with every request
user_agent = {}

[disk]
; Concurrent disk cache reads (default: 4, max: 256)
concurrency = {}

[logging]
; Log file location
file = {}
"#,
        config.slot.presentation_delay_ms,
        config.slot.crossfade_ms,
        path_to_string(&config.cache.directory),
        format_size(config.cache.memory_size),
        format_size(config.cache.disk_size),
        config.network.concurrency,
        config.network.timeout,
        config.network.user_agent,
        config.disk.concurrency,
        path_to_string(&config.logging.file),
    )
}

/// Display a path, abbreviating the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
