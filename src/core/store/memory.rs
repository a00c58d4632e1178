//! In-memory verse store.
//!
//! Rows are kept per version in canonical order. Native search is a
//! simple unranked word-prefix engine: every hit scores `1.0`, the
//! way non-ranking database engines report matches.

use super::{book_allowed, RawHit, RawSearchMode, VerseStore};
use crate::core::error::StoreError;
use crate::core::grammar::{BookAlias, BookResolver, StaticBookTable};
use crate::core::types::{BookNumber, Verse};
use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;
use std::sync::{Arc, RwLock};

/// Verse store holding every row in memory
pub struct MemoryVerseStore {
    versions: RwLock<HashMap<String, Vec<Verse>>>,
    unavailable: RwLock<HashSet<String>>,
    books: Arc<dyn BookResolver>,
}

impl MemoryVerseStore {
    /// Empty store using the built-in book table
    pub fn new() -> Self {
        Self::with_resolver(Arc::new(StaticBookTable::new()))
    }

    pub fn with_resolver(books: Arc<dyn BookResolver>) -> Self {
        Self {
            versions: RwLock::new(HashMap::new()),
            unavailable: RwLock::new(HashSet::new()),
            books,
        }
    }

    /// Install (or replace) a version
    pub fn insert_version(&self, version: &str, mut verses: Vec<Verse>) {
        for verse in &mut verses {
            verse.version = version.to_string();
        }
        verses.sort_by_key(Verse::canonical_key);

        if let Ok(mut versions) = self.versions.write() {
            versions.insert(version.to_string(), verses);
        }
    }

    /// Simulate a backend outage for one version
    pub fn set_unavailable(&self, version: &str, unavailable: bool) {
        if let Ok(mut set) = self.unavailable.write() {
            if unavailable {
                set.insert(version.to_string());
            } else {
                set.remove(version);
            }
        }
    }

    fn with_rows<T>(
        &self,
        version: &str,
        f: impl FnOnce(&[Verse]) -> T,
    ) -> Result<T, StoreError> {
        let down = self
            .unavailable
            .read()
            .map(|set| set.contains(version))
            .unwrap_or(false);
        if down {
            return Err(StoreError::Unavailable {
                version: version.to_string(),
                message: "backend marked unavailable".to_string(),
            });
        }

        let versions = self.versions.read().map_err(|_| StoreError::Unavailable {
            version: version.to_string(),
            message: "store lock poisoned".to_string(),
        })?;
        let rows = versions.get(version).map(Vec::as_slice).unwrap_or(&[]);
        Ok(f(rows))
    }
}

impl Default for MemoryVerseStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercased words of a verse
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn has_word_prefix(words: &[String], term: &str) -> bool {
    words.iter().any(|w| w.starts_with(term))
}

fn natural_match(text: &str, query: &str) -> bool {
    let verse_words = words(text);
    words(query)
        .iter()
        .any(|term| has_word_prefix(&verse_words, term))
}

/// `+term` / plain terms are required, `-term` excluded; `OR`
/// separates alternative groups.
fn boolean_match(text: &str, query: &str) -> bool {
    let verse_words = words(text);
    query.split(" OR ").any(|group| {
        let mut required = 0;
        let mut negate_next = false;
        for raw in group.split_whitespace() {
            match raw {
                "AND" => continue,
                "NOT" => {
                    negate_next = true;
                    continue;
                }
                _ => {}
            }

            let (negated, term) = match raw.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (negate_next, raw.trim_start_matches('+')),
            };
            negate_next = false;

            let terms = words(term);
            if negated {
                if terms.iter().any(|t| has_word_prefix(&verse_words, t)) {
                    return false;
                }
                continue;
            }
            for term in terms {
                required += 1;
                if !has_word_prefix(&verse_words, &term) {
                    return false;
                }
            }
        }
        required > 0
    })
}

fn ngram_match(text: &str, query: &str) -> bool {
    let lowered = text.to_lowercase();
    let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    !terms.is_empty() && terms.iter().all(|term| lowered.contains(term.as_str()))
}

impl BookResolver for MemoryVerseStore {
    fn aliases(&self, language: &str) -> Vec<BookAlias> {
        self.books.aliases(language)
    }

    fn resolve_book_abbreviation(&self, token: &str, language: &str) -> Option<BookNumber> {
        self.books.resolve_book_abbreviation(token, language)
    }

    fn book_name(&self, book: BookNumber, language: &str) -> Option<String> {
        self.books.book_name(book, language)
    }
}

impl VerseStore for MemoryVerseStore {
    fn is_version_installed(&self, version: &str) -> bool {
        self.versions
            .read()
            .map(|versions| versions.contains_key(version))
            .unwrap_or(false)
    }

    fn installed_versions(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .versions
            .read()
            .map(|versions| versions.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    fn get_verse(
        &self,
        version: &str,
        book: BookNumber,
        chapter: u32,
        verse: u32,
    ) -> Result<Option<Verse>, StoreError> {
        self.with_rows(version, |rows| {
            rows.iter()
                .find(|v| v.canonical_key() == (book, chapter, verse))
                .cloned()
        })
    }

    fn get_verses(
        &self,
        version: &str,
        book: BookNumber,
        chapter: u32,
        range: Option<RangeInclusive<u32>>,
    ) -> Result<Vec<Verse>, StoreError> {
        self.with_rows(version, |rows| {
            rows.iter()
                .filter(|v| v.book_number == book && v.chapter == chapter)
                .filter(|v| range.as_ref().map_or(true, |r| r.contains(&v.verse)))
                .cloned()
                .collect()
        })
    }

    fn search_raw(
        &self,
        version: &str,
        text: &str,
        mode: RawSearchMode,
        book_filter: &[BookNumber],
    ) -> Result<Vec<RawHit>, StoreError> {
        let needle = text.trim().to_lowercase();

        self.with_rows(version, |rows| {
            rows.iter()
                .filter(|v| book_allowed(book_filter, v.book_number))
                .filter_map(|v| {
                    let (matched, relevance) = match mode {
                        RawSearchMode::Natural => (natural_match(&v.text, text), Some(1.0)),
                        RawSearchMode::Boolean => (boolean_match(&v.text, text), Some(1.0)),
                        RawSearchMode::Ngram => (ngram_match(&v.text, text), Some(1.0)),
                        RawSearchMode::Substring => (
                            !needle.is_empty() && v.text.to_lowercase().contains(&needle),
                            None,
                        ),
                        RawSearchMode::All => (true, None),
                    };
                    matched.then(|| RawHit {
                        verse: v.clone(),
                        relevance,
                    })
                })
                .collect()
        })
    }
}
