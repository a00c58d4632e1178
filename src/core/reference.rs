//! Reference parsing and canonical formatting.
//!
//! `parse` resolves strings such as "John 3:16-18", "Gen 1" or
//! "1 Sam. 3:4" into a `BibleReference`. Grammar alternatives, tried
//! in order:
//!
//! 1. `Book Chapter:Verse-Verse`
//! 2. `Book Chapter:Verse`
//! 3. `Book Chapter`
//!
//! Book spellings come from the shared grammar vocabulary, so the
//! parser accepts exactly what the scanner links.

use crate::core::error::ParseError;
use crate::core::grammar::{BookResolver, BookVocabulary, ReferenceMatch, VocabularyRegistry};
use crate::core::types::BibleReference;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

// A name followed by a chapter: shaped like a reference even when the
// name is not a known book.
static REFERENCE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[123]\s*)?[^\d:：]+?\.?\s*\d{1,3}(?:\s*[:：]\s*\d{1,3}(?:\s*[-‐–—]\s*\d{1,3})?)?$")
        .unwrap()
});

/// Collapse runs of whitespace and trim
pub fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a reference against a compiled vocabulary.
///
/// `book_name` resolves the display name for the matched book.
pub fn parse_with(
    vocabulary: &BookVocabulary,
    resolver: &dyn BookResolver,
    reference: &str,
) -> Result<BibleReference, ParseError> {
    let normalized = normalize_whitespace(reference);
    if normalized.is_empty() {
        return Err(ParseError::NoMatch(reference.to_string()));
    }

    let Some(found) = vocabulary.match_exact(&normalized) else {
        return Err(classify_failure(&normalized));
    };

    build_reference(vocabulary, resolver, &found)
        .ok_or_else(|| ParseError::NoMatch(reference.to_string()))
}

/// Turn a grammar match into a validated reference
pub fn build_reference(
    vocabulary: &BookVocabulary,
    resolver: &dyn BookResolver,
    found: &ReferenceMatch,
) -> Option<BibleReference> {
    let language = vocabulary.language();
    let book_name = resolver
        .book_name(found.book_number, language)
        .unwrap_or_else(|| found.book_text.clone());

    BibleReference::new(
        found.book_number,
        book_name,
        found.chapter,
        found.verse_start,
        found.verse_end,
        language,
    )
}

fn classify_failure(normalized: &str) -> ParseError {
    if REFERENCE_SHAPE.is_match(normalized) {
        let book = normalized
            .trim_end_matches(|c: char| c.is_ascii_digit() || " :：-‐–—".contains(c))
            .trim_end_matches('.')
            .to_string();
        ParseError::UnknownBook(book)
    } else {
        ParseError::NoMatch(normalized.to_string())
    }
}

/// Canonical form of a reference ("John 3:16-18")
pub fn format_reference(reference: &BibleReference) -> String {
    reference.to_string()
}

/// Parser bound to a book resolver, caching vocabularies per language
pub struct ReferenceParser {
    registry: VocabularyRegistry,
}

impl ReferenceParser {
    pub fn new(resolver: Arc<dyn BookResolver>) -> Self {
        Self {
            registry: VocabularyRegistry::new(resolver),
        }
    }

    /// Parse a reference string in the given language
    pub fn parse(&self, reference: &str, language: &str) -> Result<BibleReference, ParseError> {
        let vocabulary = self.vocabulary(language)?;
        parse_with(&vocabulary, self.registry.resolver().as_ref(), reference)
    }

    /// Parse, mapping failures to `None`
    pub fn try_parse(&self, reference: &str, language: &str) -> Option<BibleReference> {
        match self.parse(reference, language) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::debug!(reference = %reference, error = %e, "Reference not recognised");
                None
            }
        }
    }

    /// Compiled vocabulary for a language (shared with the scanner)
    pub fn vocabulary(&self, language: &str) -> Result<Arc<BookVocabulary>, ParseError> {
        self.registry.vocabulary(language).map_err(|e| {
            tracing::warn!(language = %language, error = %e, "Book vocabulary failed to compile");
            ParseError::NoMatch(format!("vocabulary for '{language}' unavailable"))
        })
    }

    pub fn resolver(&self) -> &Arc<dyn BookResolver> {
        self.registry.resolver()
    }
}
