//! Cache path construction for identities.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// File extension for cached image bytes.
pub const CACHE_FILE_EXTENSION: &str = "img";

/// Extension used while a file is being written.
pub const PARTIAL_FILE_EXTENSION: &str = "part";

/// Construct the full path for a cached image.
///
/// Identities are arbitrary strings (usually URLs), so the file name is the
/// SHA-256 of the identity, sharded by its first byte:
///
/// ```text
/// <cache_dir>/<hh>/<sha256>.img
/// ```
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use bitmaploader::cache::cache_path;
///
/// let path = cache_path(&PathBuf::from("/cache"), "https://example.com/a.png");
/// assert!(path.starts_with("/cache"));
/// assert_eq!(path.extension().unwrap(), "img");
/// ```
pub fn cache_path(cache_dir: &Path, identity: &str) -> PathBuf {
    let digest = identity_digest(identity);
    cache_dir
        .join(&digest[..2])
        .join(format!("{}.{}", digest, CACHE_FILE_EXTENSION))
}

/// Hex-encoded SHA-256 of an identity.
pub fn identity_digest(identity: &str) -> String {
    format!("{:x}", Sha256::digest(identity.as_bytes()))
}

/// Returns true if `path` looks like a completed cache file.
pub(crate) fn is_cache_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == CACHE_FILE_EXTENSION)
        .unwrap_or(false)
}
