//! Query normalisation.
//!
//! Before a query is hashed into a cache key or sent to the verse
//! store it is normalised: whitespace is collapsed and, in natural
//! mode, stop words are removed token by token. Stripping is undone
//! when it would leave nothing, so "the" still searches for "the".

use crate::core::types::SearchMode;
use std::collections::HashSet;

/// Words dropped from natural-mode queries
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is",
    "it", "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there",
    "these", "they", "this", "to", "was", "will", "with",
];

/// Terms shorter than this are neither scored nor highlighted
pub const MIN_TERM_CHARS: usize = 3;

/// Boolean-mode operator keywords
const OPERATORS: [&str; 3] = ["AND", "OR", "NOT"];

/// Normalise a query for the given mode
///
/// # Examples
///
/// ```
/// use verselink::core::search::normalize_query;
/// use verselink::core::types::SearchMode;
///
/// let stop = vec!["the".to_string(), "of".to_string()];
/// assert_eq!(normalize_query("  love   of the  world ", SearchMode::Natural, &stop), "love world");
/// assert_eq!(normalize_query("the", SearchMode::Natural, &stop), "the");
/// assert_eq!(normalize_query("the  world", SearchMode::Boolean, &stop), "the world");
/// ```
pub fn normalize_query(query: &str, mode: SearchMode, stop_words: &[String]) -> String {
    match mode {
        // Whitespace inside a pattern is significant
        SearchMode::Regex => query.trim().to_string(),
        SearchMode::Natural => {
            let collapsed: Vec<&str> = query.split_whitespace().collect();
            let stop: HashSet<String> = stop_words.iter().map(|w| w.to_lowercase()).collect();
            let kept: Vec<&str> = collapsed
                .iter()
                .copied()
                .filter(|token| !stop.contains(&token.to_lowercase()))
                .collect();
            if kept.is_empty() {
                collapsed.join(" ")
            } else {
                kept.join(" ")
            }
        }
        SearchMode::Boolean | SearchMode::Ngram => {
            query.split_whitespace().collect::<Vec<_>>().join(" ")
        }
    }
}

/// Lowercased terms used for scoring and highlighting
///
/// Boolean operators and excluded (`-term`, `NOT term`) terms are
/// dropped; regex queries have no terms. Only terms of at least
/// `MIN_TERM_CHARS` characters are returned, each once.
pub fn query_terms(normalized: &str, mode: SearchMode) -> Vec<String> {
    if mode == SearchMode::Regex {
        return Vec::new();
    }

    let mut terms: Vec<String> = Vec::new();
    let mut skip_next = false;
    for token in normalized.split_whitespace() {
        if mode == SearchMode::Boolean {
            if token == "NOT" {
                skip_next = true;
                continue;
            }
            if OPERATORS.contains(&token) {
                continue;
            }
            if std::mem::take(&mut skip_next) || token.starts_with('-') {
                continue;
            }
        }

        for word in token
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|w| w.chars().count() >= MIN_TERM_CHARS)
        {
            let word = word.to_lowercase();
            if !terms.contains(&word) {
                terms.push(word);
            }
        }
    }
    terms
}
