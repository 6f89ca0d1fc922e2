use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: Engine,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Engine {
    /// Tesseract command or absolute binary path.
    pub command: String,
    /// Tesseract data directory (absolute).
    pub data_dir: Option<PathBuf>,
    /// Joins the contents of several output files into one string.
    pub content_sep: String,
    /// File name, inside the temp dir, caching the last known-good binary path.
    pub path_cache_file: String,
}
impl Default for Engine {
    fn default() -> Self {
        Self {
            command: "tesseract".into(),
            data_dir: None,
            content_sep: "||||".into(),
            path_cache_file: ".TESSPATH".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Paths {
    /// Empty means `/var/tmp` when it exists (non-Windows), else the system temp dir.
    pub temp_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}
