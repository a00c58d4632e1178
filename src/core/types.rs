//! Core data types for Verselink.
//!
//! This module defines the structures shared by the parser, the
//! verse store, the search orchestrator and the scanner: canonical
//! references, verses, search options, results and passages.

use crate::core::error::SearchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Canonical book number (1 = Genesis ... 66 = Revelation)
pub type BookNumber = u8;

/// Number of books in the canonical table
pub const BOOK_COUNT: BookNumber = 66;

/// A fully resolved Bible reference
///
/// Built by the reference parser and never mutated afterwards, so
/// the fields are only readable through accessors. A reference
/// without verses addresses the whole chapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ReferenceFields")]
pub struct BibleReference {
    book_number: BookNumber,
    book_name: String,
    chapter: u32,
    verse_start: Option<u32>,
    verse_end: Option<u32>,
    language: String,
}

impl BibleReference {
    /// Build a validated reference.
    ///
    /// Returns `None` when the book is outside 1..=66, the chapter or
    /// a verse is zero, an end verse is given without a start, or
    /// the range is reversed. A range whose end equals its start is
    /// collapsed to a single verse.
    pub fn new(
        book_number: BookNumber,
        book_name: impl Into<String>,
        chapter: u32,
        verse_start: Option<u32>,
        verse_end: Option<u32>,
        language: impl Into<String>,
    ) -> Option<Self> {
        if book_number == 0 || book_number > BOOK_COUNT || chapter == 0 {
            return None;
        }

        let verse_end = match (verse_start, verse_end) {
            (None, Some(_)) => return None,
            (Some(0), _) => return None,
            (Some(start), Some(end)) if end < start => return None,
            (Some(start), Some(end)) if end == start => None,
            (_, end) => end,
        };

        Some(Self {
            book_number,
            book_name: book_name.into(),
            chapter,
            verse_start,
            verse_end,
            language: language.into(),
        })
    }

    pub fn book_number(&self) -> BookNumber {
        self.book_number
    }

    pub fn book_name(&self) -> &str {
        &self.book_name
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    pub fn verse_start(&self) -> Option<u32> {
        self.verse_start
    }

    pub fn verse_end(&self) -> Option<u32> {
        self.verse_end
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// True when the reference addresses a whole chapter
    pub fn is_whole_chapter(&self) -> bool {
        self.verse_start.is_none()
    }

    /// Inclusive verse range, or `None` for a whole chapter
    pub fn verse_range(&self) -> Option<RangeInclusive<u32>> {
        self.verse_start
            .map(|start| start..=self.verse_end.unwrap_or(start))
    }
}

/// Serialized shape of a reference, checked by `BibleReference::new`
#[derive(Deserialize)]
struct ReferenceFields {
    book_number: BookNumber,
    book_name: String,
    chapter: u32,
    verse_start: Option<u32>,
    verse_end: Option<u32>,
    language: String,
}

impl TryFrom<ReferenceFields> for BibleReference {
    type Error = String;

    fn try_from(fields: ReferenceFields) -> Result<Self, Self::Error> {
        let ReferenceFields {
            book_number,
            book_name,
            chapter,
            verse_start,
            verse_end,
            language,
        } = fields;
        let rejected = format!(
            "invalid reference: book {book_number} chapter {chapter} verses {verse_start:?}-{verse_end:?}"
        );
        Self::new(book_number, book_name, chapter, verse_start, verse_end, language).ok_or(rejected)
    }
}

impl fmt::Display for BibleReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.book_name, self.chapter)?;
        if let Some(start) = self.verse_start {
            write!(f, ":{start}")?;
            if let Some(end) = self.verse_end {
                write!(f, "-{end}")?;
            }
        }
        Ok(())
    }
}

/// A single verse row as returned by the verse store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub version: String,
    pub book_number: BookNumber,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

impl Verse {
    /// Canonical ordering key (book, chapter, verse)
    pub fn canonical_key(&self) -> (BookNumber, u32, u32) {
        (self.book_number, self.chapter, self.verse)
    }
}

/// How the search text is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Free text, stop words stripped, any term may match
    #[default]
    Natural,
    /// Boolean query syntax (AND / OR / NOT, +term, -term)
    Boolean,
    /// Character n-gram matching (partial words, CJK text)
    Ngram,
    /// Caller-supplied regular expression applied per verse
    Regex,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Natural => "natural",
            SearchMode::Boolean => "boolean",
            SearchMode::Ngram => "ngram",
            SearchMode::Regex => "regex",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "natural" => Ok(SearchMode::Natural),
            "boolean" => Ok(SearchMode::Boolean),
            "ngram" => Ok(SearchMode::Ngram),
            "regex" | "regexp" => Ok(SearchMode::Regex),
            other => Err(format!(
                "unknown search mode '{other}' (expected natural, boolean, ngram or regex)"
            )),
        }
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Relevance,
    Reference,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::Reference => "reference",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relevance" => Ok(SortBy::Relevance),
            "reference" | "canonical" => Ok(SortBy::Reference),
            other => Err(format!(
                "unknown sort order '{other}' (expected relevance or reference)"
            )),
        }
    }
}

/// Options for a single search call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Versions to search (must not be empty)
    pub versions: Vec<String>,

    /// Books to restrict to (empty = all)
    #[serde(default)]
    pub books: Vec<BookNumber>,

    /// Page size
    pub limit: usize,

    /// Offset into the merged result list
    #[serde(default)]
    pub offset: usize,

    #[serde(default)]
    pub search_mode: SearchMode,

    #[serde(default)]
    pub sort_by: SortBy,

    /// Wrap matched terms in highlight markers
    #[serde(default = "default_true")]
    pub highlight: bool,

    /// Read and write the search cache
    #[serde(default = "default_true")]
    pub use_cache: bool,
}

fn default_true() -> bool {
    true
}

impl SearchOptions {
    /// Options for the given versions with default paging and modes
    pub fn for_versions<I, S>(versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            versions: versions.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            versions: vec!["kjv".to_string()],
            books: Vec::new(),
            limit: 10,
            offset: 0,
            search_mode: SearchMode::Natural,
            sort_by: SortBy::Relevance,
            highlight: true,
            use_cache: true,
        }
    }
}

/// A ranked verse hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub version: String,
    pub book_number: BookNumber,
    pub chapter_number: u32,
    pub verse_number: u32,
    pub text: String,

    /// Only comparable within the response it came from
    pub relevance: f64,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub highlighted_text: Option<String>,

    /// Display reference, e.g. "John 3:16"
    pub reference_string: String,
}

impl SearchResult {
    /// Canonical ordering key (book, chapter, verse)
    pub fn canonical_key(&self) -> (BookNumber, u32, u32) {
        (self.book_number, self.chapter_number, self.verse_number)
    }
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,

    /// Size of the merged result set across all versions
    pub total: usize,

    pub has_more: bool,

    /// Served from the cache
    #[serde(default)]
    pub cached: bool,

    /// Set for reported (not raised) failures such as a bad pattern
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<SearchError>,
}

impl SearchResponse {
    /// Empty response carrying an error
    pub fn failed(error: SearchError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }
}

/// Passage rendering style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassageFormat {
    /// Verse texts joined by single spaces
    #[default]
    Plain,
    /// Each verse prefixed with its number
    Numbered,
    /// `<p>` wrapped, verse numbers in `<sup>`
    Html,
}

impl FromStr for PassageFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plain" => Ok(PassageFormat::Plain),
            "numbered" => Ok(PassageFormat::Numbered),
            "html" => Ok(PassageFormat::Html),
            other => Err(format!(
                "unknown passage format '{other}' (expected plain, numbered or html)"
            )),
        }
    }
}

/// Options for passage retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageOptions {
    /// Language used to resolve the book name
    pub language: String,
    pub format: PassageFormat,
    pub use_cache: bool,
}

impl Default for PassageOptions {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            format: PassageFormat::Plain,
            use_cache: true,
        }
    }
}

/// A resolved passage with its rendered text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub reference: BibleReference,
    pub version: String,
    pub verses: Vec<Verse>,
    pub text: String,

    #[serde(default)]
    pub cached: bool,
}
