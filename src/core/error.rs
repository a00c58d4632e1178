//! Error types and error handling for Verselink.
//!
//! Each concern has its own error enum so callers can recover
//! locally (an unparseable reference, a bad regex, a store that is
//! down for one version). `VerselinkError` wraps them for the
//! operations that genuinely fail.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Verselink operations
pub type Result<T> = std::result::Result<T, VerselinkError>;

/// Reference grammar failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Not a Bible reference: {0}")]
    NoMatch(String),

    #[error("Unknown book: {0}")]
    UnknownBook(String),
}

/// Errors reported inside a `SearchResponse` instead of being raised
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum SearchError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Verse Store failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Version '{version}' unavailable: {message}")]
    Unavailable { version: String, message: String },

    #[error("Index error: {0}")]
    Index(String),

    #[error("Invalid version id: {0}")]
    InvalidVersion(String),

    #[error("Invalid verse data at line {line}: {message}")]
    InvalidData { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tantivy::TantivyError> for StoreError {
    fn from(err: tantivy::TantivyError) -> Self {
        StoreError::Index(err.to_string())
    }
}

/// Cache backend failures (always treated as a miss by callers)
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main error type for Verselink
#[derive(Error, Debug)]
pub enum VerselinkError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Passage not found: {0}")]
    PassageNotFound(String),

    #[error("Version not installed: {0}")]
    VersionNotInstalled(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl VerselinkError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a "not found" type error
    ///
    /// An unparseable reference is reported to users as "reference not
    /// found", not as an application error.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            VerselinkError::PassageNotFound(_)
                | VerselinkError::VersionNotInstalled(_)
                | VerselinkError::Parse(_)
        )
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            VerselinkError::InvalidQuery(_) | VerselinkError::ConfigError(_)
        )
    }
}
