//! XDG Base Directory support.
//!
//! Resolves where Verselink keeps its configuration, installed
//! version indexes and the on-disk query cache.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "verselink";

/// XDG directory structure for Verselink
///
/// Each directory is resolved in priority order:
/// 1. Explicit `VERSELINK_*_DIR` env var
/// 2. `XDG_*_HOME` env var, plus `verselink/`
/// 3. XDG default under the home directory
#[derive(Debug, Clone)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
}

impl XdgDirs {
    pub fn new() -> Self {
        Self {
            config_dir: resolve("VERSELINK_CONFIG_DIR", "XDG_CONFIG_HOME", &[".config"]),
            data_dir: resolve("VERSELINK_DATA_DIR", "XDG_DATA_HOME", &[".local", "share"]),
            cache_dir: resolve("VERSELINK_CACHE_DIR", "XDG_CACHE_HOME", &[".cache"]),
        }
    }

    /// All directories below one root (tests and portable installs)
    pub fn under(root: &Path) -> Self {
        Self {
            config_dir: root.join("config"),
            data_dir: root.join("data"),
            cache_dir: root.join("cache"),
        }
    }

    /// Config file path (`VERSELINK_CONFIG_FILE` wins)
    pub fn config_file(&self) -> PathBuf {
        if let Ok(file) = env::var("VERSELINK_CONFIG_FILE") {
            return PathBuf::from(file);
        }
        self.config_dir.join("config.toml")
    }

    /// Root of the per-version indexes
    pub fn versions_dir(&self) -> PathBuf {
        self.data_dir.join("versions")
    }

    /// Directory of the file-backed query cache
    pub fn query_cache_dir(&self) -> PathBuf {
        self.cache_dir.join("query-cache")
    }

    /// Create the data and cache directories if they don't exist
    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(self.versions_dir())?;
        fs::create_dir_all(self.query_cache_dir())?;
        Ok(())
    }

    /// Log the resolved paths
    pub fn log_paths(&self) {
        tracing::debug!("XDG directories resolved:");
        tracing::debug!("  Config file: {:?}", self.config_file());
        tracing::debug!("  Versions: {:?}", self.versions_dir());
        tracing::debug!("  Query cache: {:?}", self.query_cache_dir());
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve(override_var: &str, xdg_var: &str, home_default: &[&str]) -> PathBuf {
    if let Ok(dir) = env::var(override_var) {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = env::var(xdg_var) {
        return PathBuf::from(xdg).join(APP_DIR);
    }

    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    for segment in home_default {
        path.push(segment);
    }
    path.join(APP_DIR)
}
