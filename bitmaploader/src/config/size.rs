//! Human-readable byte sizes ("64MB", "2GB").

use thiserror::Error;

const KB: usize = 1024;
const MB: usize = 1024 * KB;
const GB: usize = 1024 * MB;

/// Suffixes checked longest first so "MB" wins over "B".
const UNITS: [(&str, usize); 7] = [
    ("GB", GB),
    ("MB", MB),
    ("KB", KB),
    ("G", GB),
    ("M", MB),
    ("K", KB),
    ("B", 1),
];

/// A size string that could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid size '{0}' - expected a whole number with an optional KB, MB or GB suffix")]
pub struct SizeParseError(String);

/// Parse a size such as `512`, `64MB`, `2 gb` into bytes.
///
/// Suffixes are binary (1KB = 1024) and case-insensitive. Fractions are
/// rejected.
///
/// ```
/// use bitmaploader::config::parse_size;
///
/// assert_eq!(parse_size("64MB").unwrap(), 64 * 1024 * 1024);
/// assert_eq!(parse_size("2 k").unwrap(), 2048);
/// ```
pub fn parse_size(input: &str) -> Result<usize, SizeParseError> {
    let trimmed = input.trim();
    let upper = trimmed.to_ascii_uppercase();

    let (digits, multiplier) = UNITS
        .iter()
        .find_map(|(suffix, multiplier)| {
            upper
                .strip_suffix(suffix)
                .map(|digits| (digits.trim_end(), *multiplier))
        })
        .unwrap_or((upper.as_str(), 1));

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SizeParseError(input.to_string()));
    }

    digits
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .ok_or_else(|| SizeParseError(input.to_string()))
}

/// Format bytes using the largest suffix that divides them exactly.
///
/// ```
/// use bitmaploader::config::format_size;
///
/// assert_eq!(format_size(64 * 1024 * 1024), "64MB");
/// assert_eq!(format_size(1500), "1500");
/// ```
pub fn format_size(bytes: usize) -> String {
    for (suffix, unit) in [("GB", GB), ("MB", MB), ("KB", KB)] {
        if bytes >= unit && bytes % unit == 0 {
            return format!("{}{}", bytes / unit, suffix);
        }
    }
    bytes.to_string()
}
