//! Verse Store interface and implementations.
//!
//! The search orchestrator and passage service only ever talk to a
//! `VerseStore`; they never issue storage-specific queries. Two
//! stores are provided:
//!
//! - **memory**: linear scan over in-memory rows, unranked
//! - **tantivy**: one on-disk full-text index per version with
//!   native natural / boolean / ngram search and BM25 scores
//!
//! The `loader` module reads tab-separated verse files for import.

pub mod loader;
mod memory;
mod tantivy;

pub use self::tantivy::{validate_version_id, TantivyVerseStore, VersionMetadata, SCHEMA_VERSION};
pub use loader::{discover_version_files, read_verses_tsv};
pub use memory::MemoryVerseStore;

use crate::core::error::StoreError;
use crate::core::grammar::BookResolver;
use crate::core::types::{BookNumber, SearchMode, Verse};
use std::ops::RangeInclusive;

/// How `search_raw` interprets its text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawSearchMode {
    /// Engine-native free text search
    Natural,
    /// Engine-native boolean syntax
    Boolean,
    /// Engine-native partial-word search
    Ngram,
    /// Case-insensitive literal substring match, unranked
    Substring,
    /// Every verse passing the book filter, unranked (text ignored)
    All,
}

impl From<SearchMode> for RawSearchMode {
    fn from(mode: SearchMode) -> Self {
        match mode {
            SearchMode::Natural => RawSearchMode::Natural,
            SearchMode::Boolean => RawSearchMode::Boolean,
            SearchMode::Ngram => RawSearchMode::Ngram,
            SearchMode::Regex => RawSearchMode::All,
        }
    }
}

/// A store hit with the engine's own score, if it ranks at all
#[derive(Debug, Clone, PartialEq)]
pub struct RawHit {
    pub verse: Verse,
    pub relevance: Option<f64>,
}

impl RawHit {
    pub fn unranked(verse: Verse) -> Self {
        Self {
            verse,
            relevance: None,
        }
    }
}

/// Persistence and query service for verse text
///
/// Implementations serialise their own internal consistency; callers
/// issue independent read-only calls.
pub trait VerseStore: BookResolver {
    /// Whether a version can be queried
    fn is_version_installed(&self, version: &str) -> bool;

    /// All installed versions, sorted
    fn installed_versions(&self) -> Vec<String>;

    fn get_verse(
        &self,
        version: &str,
        book: BookNumber,
        chapter: u32,
        verse: u32,
    ) -> Result<Option<Verse>, StoreError>;

    /// Verses of a chapter in verse order, optionally restricted to a range
    fn get_verses(
        &self,
        version: &str,
        book: BookNumber,
        chapter: u32,
        range: Option<RangeInclusive<u32>>,
    ) -> Result<Vec<Verse>, StoreError>;

    /// Search one version. An empty `book_filter` means all books.
    fn search_raw(
        &self,
        version: &str,
        text: &str,
        mode: RawSearchMode,
        book_filter: &[BookNumber],
    ) -> Result<Vec<RawHit>, StoreError>;
}

/// Book filter check shared by the stores
pub(crate) fn book_allowed(book_filter: &[BookNumber], book: BookNumber) -> bool {
    book_filter.is_empty() || book_filter.contains(&book)
}
