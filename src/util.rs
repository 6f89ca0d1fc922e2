use crate::config::Paths;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Every temporary file this crate creates starts with this prefix.
pub const TEMP_PREFIX: &str = "TESS_";

pub fn temp_dir(paths: &Paths) -> PathBuf {
    if !paths.temp_dir.is_empty() {
        return PathBuf::from(&paths.temp_dir);
    }
    if !cfg!(windows) {
        let preserved = Path::new("/var/tmp");
        if preserved.is_dir() {
            return preserved.to_path_buf();
        }
    }
    std::env::temp_dir()
}

/// Creates an empty, uniquely named file that outlives this call.
pub fn new_temp_file(dir: &Path) -> Result<PathBuf> {
    let file = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(dir)
        .map_err(|e| Error::io("create temp file in", dir, e))?;
    file.into_temp_path()
        .keep()
        .map_err(|e| Error::io("keep temp file in", dir, e.error))
}

/// Returns a unique name in `dir` without leaving a file behind.
pub fn new_temp_name(dir: &Path) -> Result<PathBuf> {
    let file = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(dir)
        .map_err(|e| Error::io("create temp file in", dir, e))?;
    Ok(file.path().to_path_buf())
}

pub fn read_trimmed(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path).map_err(|e| Error::io("read", path, e))?;
    Ok(raw.trim().to_string())
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|e| Error::io("write", path, e))
}

pub fn remove_file(path: &Path) -> Result<()> {
    std::fs::remove_file(path).map_err(|e| Error::io("delete", path, e))
}
