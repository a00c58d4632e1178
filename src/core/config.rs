//! Configuration management for Verselink.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.
//! The resulting `Config` is passed explicitly into the services and
//! the scanner; nothing reads it from global state.

use crate::core::error::{Result, VerselinkError};
use crate::core::search::DEFAULT_STOP_WORDS;
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Page size when the caller gives none
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Upper bound for any requested page size
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    /// Maximum query string length (characters)
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,

    /// Versions searched when the caller names none
    #[serde(default = "default_versions")]
    pub default_versions: Vec<String>,

    /// Language used for book names in reference strings
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Matching verses kept per version in regex mode
    #[serde(default = "default_regex_match_limit")]
    pub regex_match_limit: usize,

    #[serde(default = "default_highlight_open")]
    pub highlight_open: String,

    #[serde(default = "default_highlight_close")]
    pub highlight_close: String,

    /// Words stripped from natural-mode queries
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,
}

/// Which cache backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    Memory,
    #[default]
    File,
    None,
}

impl fmt::Display for CacheBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CacheBackendKind::Memory => "memory",
            CacheBackendKind::File => "file",
            CacheBackendKind::None => "none",
        };
        f.write_str(name)
    }
}

impl FromStr for CacheBackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(CacheBackendKind::Memory),
            "file" => Ok(CacheBackendKind::File),
            "none" | "off" => Ok(CacheBackendKind::None),
            other => Err(format!(
                "unknown cache backend '{other}' (expected memory, file or none)"
            )),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackendKind,

    /// Lifetime of cached searches and passages
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Directory for the file backend
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Root directory of the per-version indexes
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,
}

/// Text scanner configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScannerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Version written into annotations
    #[serde(default = "default_scanner_version")]
    pub default_version: String,

    /// Language of the book vocabulary
    #[serde(default = "default_language")]
    pub language: String,

    /// Containers whose text is never scanned
    #[serde(default = "default_exclude_selectors")]
    pub exclude_selectors: Vec<String>,

    /// Text nodes processed between yield checks
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Time budget per frame before yielding
    #[serde(default = "default_frame_budget_ms")]
    pub frame_budget_ms: u64,

    /// Quiet period that coalesces bursts of added nodes
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Also link chapter-only references ("Psalm 23")
    #[serde(default)]
    pub link_whole_chapters: bool,
}

// Default value functions
fn default_limit() -> usize {
    10
}

fn default_max_limit() -> usize {
    100
}

fn default_max_query_length() -> usize {
    500
}

fn default_versions() -> Vec<String> {
    vec!["kjv".to_string()]
}

fn default_language() -> String {
    "en".to_string()
}

fn default_regex_match_limit() -> usize {
    5000
}

fn default_highlight_open() -> String {
    "<mark>".to_string()
}

fn default_highlight_close() -> String {
    "</mark>".to_string()
}

fn default_stop_words() -> Vec<String> {
    DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect()
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./cache/query-cache")
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("./data/versions")
}

fn default_true() -> bool {
    true
}

fn default_scanner_version() -> String {
    "kjv".to_string()
}

fn default_exclude_selectors() -> Vec<String> {
    [
        "script",
        "style",
        "code",
        "pre",
        "textarea",
        "a",
        ".verselink-ref",
        ".no-verselink",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_chunk_size() -> usize {
    50
}

fn default_frame_budget_ms() -> u64 {
    8
}

fn default_debounce_ms() -> u64 {
    150
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            max_query_length: default_max_query_length(),
            default_versions: default_versions(),
            default_language: default_language(),
            regex_match_limit: default_regex_match_limit(),
            highlight_open: default_highlight_open(),
            highlight_close: default_highlight_close(),
            stop_words: default_stop_words(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::default(),
            ttl_secs: default_ttl_secs(),
            dir: default_cache_dir(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            index_dir: default_index_dir(),
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_version: default_scanner_version(),
            language: default_language(),
            exclude_selectors: default_exclude_selectors(),
            chunk_size: default_chunk_size(),
            frame_budget_ms: default_frame_budget_ms(),
            debounce_ms: default_debounce_ms(),
            link_whole_chapters: false,
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| VerselinkError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        Self::load_with_xdg(&XdgDirs::new())
    }

    /// Load config with explicit XDG directories
    ///
    /// File lookup order:
    /// 1. `VERSELINK_CONFIG_FILE`
    /// 2. XDG config file (~/.config/verselink/config.toml)
    /// 3. ./verselink.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let xdg_config = xdg.config_file();
        let mut config = if xdg_config.exists() {
            Self::from_file(&xdg_config)?
        } else if Path::new("verselink.toml").exists() {
            Self::from_file("verselink.toml")?
        } else {
            Self::default()
        };

        // Relative defaults become XDG locations unless set explicitly
        if config.storage.index_dir == default_index_dir() {
            config.storage.index_dir = xdg.versions_dir();
        }
        if config.cache.dir == default_cache_dir() {
            config.cache.dir = xdg.query_cache_dir();
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    ///
    /// Unparseable values are ignored with a warning.
    pub fn merge_env(&mut self) {
        fn parsed<T: FromStr>(var: &str) -> Option<T> {
            let value = env::var(var).ok()?;
            match value.parse() {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    tracing::warn!("Ignoring invalid {}={:?}", var, value);
                    None
                }
            }
        }

        if let Some(limit) = parsed("VERSELINK_DEFAULT_LIMIT") {
            self.search.default_limit = limit;
        }
        if let Some(limit) = parsed("VERSELINK_MAX_LIMIT") {
            self.search.max_limit = limit;
        }
        if let Some(ttl) = parsed("VERSELINK_CACHE_TTL") {
            self.cache.ttl_secs = ttl;
        }
        if let Some(backend) = parsed("VERSELINK_CACHE_BACKEND") {
            self.cache.backend = backend;
        }
        if let Ok(dir) = env::var("VERSELINK_INDEX_DIR") {
            self.storage.index_dir = PathBuf::from(dir);
        }
        if let Ok(versions) = env::var("VERSELINK_DEFAULT_VERSIONS") {
            self.search.default_versions = versions
                .split(',')
                .map(|v| v.trim().to_lowercase())
                .filter(|v| !v.is_empty())
                .collect();
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| Err(VerselinkError::ConfigError(message.to_string()));

        if self.search.default_limit == 0 {
            return invalid("Default limit must be non-zero");
        }
        if self.search.max_limit == 0 {
            return invalid("Max limit must be non-zero");
        }
        if self.search.default_limit > self.search.max_limit {
            return invalid("Default limit cannot exceed max limit");
        }
        if self.search.max_query_length == 0 {
            return invalid("Max query length must be non-zero");
        }
        if self.search.default_versions.is_empty() {
            return invalid("At least one default version is required");
        }
        if self.search.regex_match_limit == 0 {
            return invalid("Regex match limit must be non-zero");
        }
        if self.scanner.chunk_size == 0 {
            return invalid("Scanner chunk size must be non-zero");
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Default limit: {}", self.search.default_limit);
        tracing::info!("  Max limit: {}", self.search.max_limit);
        tracing::info!("  Max query length: {}", self.search.max_query_length);
        tracing::info!("  Default versions: {:?}", self.search.default_versions);
        tracing::info!("  Cache backend: {}", self.cache.backend);
        tracing::info!("  Cache TTL: {}s", self.cache.ttl_secs);
        tracing::info!("  Cache dir: {:?}", self.cache.dir);
        tracing::info!("  Index dir: {:?}", self.storage.index_dir);
        tracing::info!("  Scanner enabled: {}", self.scanner.enabled);
    }
}
