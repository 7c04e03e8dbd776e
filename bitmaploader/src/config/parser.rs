//! INI parsing: `Ini` → `ConfigFile`.
//!
//! The single place where INI key names map to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::defaults::MAX_POOL_CONCURRENCY;
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use super::size::parse_size;

/// Parse an `Ini` into a `ConfigFile`, overlaying defaults.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [slot]
    if let Some(section) = ini.section(Some("slot")) {
        if let Some(v) = section.get("presentation_delay_ms") {
            config.slot.presentation_delay_ms =
                parse_number("slot", "presentation_delay_ms", v, "a whole number of milliseconds")?;
        }
        if let Some(v) = section.get("crossfade_ms") {
            config.slot.crossfade_ms =
                parse_number("slot", "crossfade_ms", v, "a whole number of milliseconds")?;
        }
    }

    // [cache]
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.cache.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("memory_size") {
            config.cache.memory_size = parse_size(v).map_err(|_| {
                invalid("cache", "memory_size", v, "expected format like '64MB' or '1GB'")
            })?;
        }
        if let Some(v) = section.get("disk_size") {
            let size = parse_size(v).map_err(|_| {
                invalid("cache", "disk_size", v, "expected format like '512MB' or '2GB'")
            })?;
            if size == 0 {
                return Err(invalid("cache", "disk_size", v, "must be greater than zero"));
            }
            config.cache.disk_size = size;
        }
    }

    // [network]
    if let Some(section) = ini.section(Some("network")) {
        if let Some(v) = section.get("concurrency") {
            config.network.concurrency = parse_concurrency("network", v)?;
        }
        if let Some(v) = section.get("timeout") {
            let timeout: u64 = parse_number("network", "timeout", v, "a positive number of seconds")?;
            if timeout == 0 {
                return Err(invalid("network", "timeout", v, "must be a positive number of seconds"));
            }
            config.network.timeout = timeout;
        }
        if let Some(v) = section.get("user_agent") {
            let v = v.trim();
            if !v.is_empty() {
                config.network.user_agent = v.to_string();
            }
        }
    }

    // [disk]
    if let Some(section) = ini.section(Some("disk")) {
        if let Some(v) = section.get("concurrency") {
            config.disk.concurrency = parse_concurrency("disk", v)?;
        }
    }

    // [logging]
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn parse_number<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    expected: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, &format!("must be {}", expected)))
}

fn parse_concurrency(section: &str, value: &str) -> Result<usize, ConfigFileError> {
    let reason = format!("must be between 1 and {}", MAX_POOL_CONCURRENCY);
    let n: usize = value
        .trim()
        .parse()
        .map_err(|_| invalid(section, "concurrency", value, &reason))?;
    if n == 0 || n > MAX_POOL_CONCURRENCY {
        return Err(invalid(section, "concurrency", value, &reason));
    }
    Ok(n)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;

    fn parse(text: &str) -> Result<ConfigFile, ConfigFileError> {
        parse_ini(&Ini::load_from_str(text).unwrap())
    }

    #[test]
    fn test_empty_ini_gives_defaults() {
        assert_eq!(parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_parses_every_section() {
        let config = parse(
            "[slot]\n\
             presentation_delay_ms = 120\n\
             crossfade_ms = 0\n\
             [cache]\n\
             directory = /tmp/images\n\
             memory_size = 32MB\n\
             disk_size = 1GB\n\
             [network]\n\
             concurrency = 12\n\
             timeout = 10\n\
             user_agent = gallery/1.0\n\
             [disk]\n\
             concurrency = 2\n\
             [logging]\n\
             file = /tmp/bitmaploader.log\n",
        )
        .unwrap();

        assert_eq!(config.slot.presentation_delay_ms, 120);
        assert_eq!(config.slot.crossfade_ms, 0);
        assert_eq!(config.cache.directory, PathBuf::from("/tmp/images"));
        assert_eq!(config.cache.memory_size, 32 * 1024 * 1024);
        assert_eq!(config.cache.disk_size, 1024 * 1024 * 1024);
        assert_eq!(config.network.concurrency, 12);
        assert_eq!(config.network.timeout, 10);
        assert_eq!(config.network.user_agent, "gallery/1.0");
        assert_eq!(config.disk.concurrency, 2);
        assert_eq!(config.logging.file, PathBuf::from("/tmp/bitmaploader.log"));
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config = parse("[cache]\ndirectory =\n[network]\nuser_agent =\n").unwrap();
        let defaults = ConfigFile::default();

        assert_eq!(config.cache.directory, defaults.cache.directory);
        assert_eq!(config.network.user_agent, defaults.network.user_agent);
    }

    #[test]
    fn test_rejects_bad_delay() {
        let err = parse("[slot]\npresentation_delay_ms = soon\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::InvalidValue { ref key, .. } if key == "presentation_delay_ms"
        ));
    }

    #[test]
    fn test_rejects_bad_sizes() {
        assert!(parse("[cache]\nmemory_size = huge\n").is_err());
        assert!(parse("[cache]\ndisk_size = 0\n").is_err());
    }

    #[test]
    fn test_concurrency_bounds() {
        assert!(parse("[network]\nconcurrency = 0\n").is_err());
        assert!(parse(&format!("[disk]\nconcurrency = {}\n", MAX_POOL_CONCURRENCY + 1)).is_err());
        assert_eq!(
            parse(&format!("[disk]\nconcurrency = {}\n", MAX_POOL_CONCURRENCY))
                .unwrap()
                .disk
                .concurrency,
            MAX_POOL_CONCURRENCY
        );
    }

    #[test]
    fn test_rejects_zero_timeout() {
        assert!(parse("[network]\ntimeout = 0\n").is_err());
    }

    #[test]
    fn test_expand_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/cache"), home.join("cache"));
        }
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
    }
}
