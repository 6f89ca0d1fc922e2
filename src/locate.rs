//! Engine binary and data-directory discovery.

use crate::util;
use std::path::{Path, PathBuf};

/// Environment variable naming the engine's data directory.
pub const DATA_DIR_ENV: &str = "TESSDATA_PREFIX";

/// Last known-good binary path stored in the cache file, if it still points at a file.
pub fn cached_command(cache_file: &Path) -> Option<PathBuf> {
    if !cache_file.is_file() {
        return None;
    }
    let cached = util::read_trimmed(cache_file).ok()?;
    let path = PathBuf::from(cached);
    path.is_file().then_some(path)
}

/// `$TESSDATA_PREFIX` if it is a directory, else `tessdata` next to the command.
pub fn data_dir_for(command: &str) -> Option<PathBuf> {
    if let Some(prefix) = std::env::var_os(DATA_DIR_ENV) {
        let prefix = PathBuf::from(prefix);
        if prefix.is_dir() {
            return Some(prefix);
        }
    }
    let parent = Path::new(command).parent()?;
    if parent.as_os_str().is_empty() {
        return None;
    }
    let candidate = parent.join("tessdata");
    candidate.is_dir().then_some(candidate)
}

/// Extracts `5.3.0` from `tesseract 5.3.0` or `tesseract v5.3.0`.
pub fn parse_version(output: &str) -> Option<String> {
    let raw = output.split_whitespace().nth(1)?;
    let version = raw.trim_start_matches(|c: char| !c.is_ascii_digit());
    (!version.is_empty()).then(|| version.to_string())
}
