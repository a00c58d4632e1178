//! Content-addressed cache keys.
//!
//! Keys look like `verselink:{namespace}:{sha256-hex}`. The hash is
//! taken over a canonical JSON document of the request: versions and
//! books are sorted and de-duplicated first, so option lists that
//! differ only in order share a key.

use crate::core::types::{BibleReference, BookNumber, PassageFormat, SearchMode, SearchOptions, SortBy};
use serde::Serialize;
use sha2::{Digest, Sha256};

pub const KEY_PREFIX: &str = "verselink";
pub const SEARCH_NAMESPACE: &str = "search";
pub const PASSAGE_NAMESPACE: &str = "passage";

#[derive(Serialize)]
struct SearchKeyMaterial<'a> {
    query: &'a str,
    versions: Vec<&'a str>,
    books: Vec<BookNumber>,
    search_mode: SearchMode,
    sort_by: SortBy,
    limit: usize,
    offset: usize,
    highlight: bool,
}

#[derive(Serialize)]
struct PassageKeyMaterial<'a> {
    book: BookNumber,
    chapter: u32,
    verse_start: Option<u32>,
    verse_end: Option<u32>,
    language: &'a str,
    version: &'a str,
    format: PassageFormat,
}

fn derive(namespace: &str, material: &impl Serialize) -> String {
    // Serialising plain structs of strings and integers cannot fail
    let canonical = serde_json::to_vec(material).unwrap_or_default();
    let digest = Sha256::digest(&canonical);
    format!("{KEY_PREFIX}:{namespace}:{}", hex::encode(digest))
}

/// Cache key for a search over an already-normalised query
pub fn search_key(normalized_query: &str, options: &SearchOptions) -> String {
    let mut versions: Vec<&str> = options.versions.iter().map(String::as_str).collect();
    versions.sort_unstable();
    versions.dedup();

    let mut books = options.books.clone();
    books.sort_unstable();
    books.dedup();

    derive(
        SEARCH_NAMESPACE,
        &SearchKeyMaterial {
            query: normalized_query,
            versions,
            books,
            search_mode: options.search_mode,
            sort_by: options.sort_by,
            limit: options.limit,
            offset: options.offset,
            highlight: options.highlight,
        },
    )
}

/// Cache key for a rendered passage
pub fn passage_key(reference: &BibleReference, version: &str, format: PassageFormat) -> String {
    derive(
        PASSAGE_NAMESPACE,
        &PassageKeyMaterial {
            book: reference.book_number(),
            chapter: reference.chapter(),
            verse_start: reference.verse_start(),
            verse_end: reference.verse_end(),
            language: reference.language(),
            version,
            format,
        },
    )
}

/// Prefix matching every key of a namespace
pub fn namespace_prefix(namespace: &str) -> String {
    format!("{KEY_PREFIX}:{namespace}:")
}
