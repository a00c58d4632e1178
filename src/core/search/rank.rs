//! Relevance scoring, ordering and pagination.
//!
//! Each query term scores 10 per whole-token occurrence and 3 per
//! occurrence inside a longer word. The sum is scaled by
//! `200 / verse length` so a short verse containing a term outranks a
//! long verse with the same raw count. Ties fall back to canonical
//! order (book, chapter, verse) and then version id, so the order is
//! total and pages never overlap or skip.

use crate::core::types::{SearchResult, SortBy};
use regex::Regex;
use std::cmp::Ordering;

pub const TOKEN_WEIGHT: f64 = 10.0;
pub const SUBSTRING_WEIGHT: f64 = 3.0;
pub const LENGTH_NORM: f64 = 200.0;

fn length_factor(text: &str) -> f64 {
    match text.chars().count() {
        0 => 0.0,
        len => LENGTH_NORM / len as f64,
    }
}

/// Score a verse against lowercased query terms
pub fn score_text(text: &str, terms: &[String]) -> f64 {
    if terms.is_empty() {
        return 0.0;
    }

    let lowered = text.to_lowercase();
    let raw: f64 = terms
        .iter()
        .map(|term| {
            let (tokens, partial) = count_occurrences(&lowered, term);
            tokens as f64 * TOKEN_WEIGHT + partial as f64 * SUBSTRING_WEIGHT
        })
        .sum();

    raw * length_factor(text)
}

/// Score a verse by the number of pattern matches
pub fn score_regex(text: &str, pattern: &Regex) -> f64 {
    pattern.find_iter(text).count() as f64 * TOKEN_WEIGHT * length_factor(text)
}

/// (whole-token, inside-a-word) occurrence counts of `term` in `text`
fn count_occurrences(text: &str, term: &str) -> (usize, usize) {
    if term.is_empty() {
        return (0, 0);
    }

    let mut tokens = 0;
    let mut partial = 0;
    for (start, found) in text.match_indices(term) {
        let before = text[..start].chars().next_back();
        let after = text[start + found.len()..].chars().next();
        let is_word = |c: Option<char>| c.is_some_and(char::is_alphanumeric);
        if is_word(before) || is_word(after) {
            partial += 1;
        } else {
            tokens += 1;
        }
    }
    (tokens, partial)
}

fn canonical_then_version(a: &SearchResult, b: &SearchResult) -> Ordering {
    a.canonical_key()
        .cmp(&b.canonical_key())
        .then_with(|| a.version.cmp(&b.version))
}

/// Total order used for merging and paging
pub fn compare(a: &SearchResult, b: &SearchResult, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Relevance => b
            .relevance
            .total_cmp(&a.relevance)
            .then_with(|| canonical_then_version(a, b)),
        SortBy::Reference => canonical_then_version(a, b),
    }
}

/// One page cut from a merged result list
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub results: Vec<SearchResult>,
    pub total: usize,
    pub has_more: bool,
}

/// Sort the union of every version's results and cut one page
///
/// `offset + results.len() <= total` holds whenever `offset <= total`.
/// An offset past the end yields an empty page with the real `total`
/// and `has_more == false`.
pub fn merge_and_paginate(
    mut merged: Vec<SearchResult>,
    sort_by: SortBy,
    offset: usize,
    limit: usize,
) -> Page {
    merged.sort_by(|a, b| compare(a, b, sort_by));

    let total = merged.len();
    let results: Vec<SearchResult> = merged.into_iter().skip(offset).take(limit).collect();
    let has_more = offset.saturating_add(results.len()) < total;

    Page {
        results,
        total,
        has_more,
    }
}
