//! Multi-version search orchestration.
//!
//! A search call normalises the query, probes the cache, fans out to
//! every installed requested version through the verse store, scores
//! and merges the per-version hits, cuts one page from the union,
//! highlights it and writes the page back to the cache.
//!
//! Failure policy:
//! - a version that is not installed is skipped silently
//! - a version whose store call fails is logged and skipped
//! - a bad regex is reported in `SearchResponse.error`
//! - cache failures are misses

use super::highlight::{highlight, term_patterns, Markers};
use super::query::{normalize_query, query_terms};
use super::rank::{merge_and_paginate, score_regex, score_text};
use crate::core::cache::{search_key, QueryCache};
use crate::core::config::SearchConfig;
use crate::core::error::{Result, SearchError, VerselinkError};
use crate::core::store::{RawHit, RawSearchMode, VerseStore};
use crate::core::types::{
    BibleReference, SearchMode, SearchOptions, SearchResponse, SearchResult, SortBy, Verse,
};
use regex::{Regex, RegexBuilder};
use std::sync::Arc;

/// Compiled size limit for user-supplied patterns
const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// How hits are scored for one call
enum Scoring<'a> {
    Terms(&'a [String]),
    Pattern(&'a Regex),
}

/// Search orchestrator over a verse store and a cache
pub struct SearchService {
    store: Arc<dyn VerseStore>,
    cache: QueryCache,
    config: SearchConfig,
}

impl SearchService {
    pub fn new(store: Arc<dyn VerseStore>, cache: QueryCache, config: SearchConfig) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run a search
    ///
    /// Returns `Err` only for unusable input (empty or over-long
    /// query, no versions). Everything else, including an invalid
    /// regex, produces a response.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<SearchResponse> {
        let options = self.effective_options(query, options)?;
        let normalized = normalize_query(query, options.search_mode, &self.config.stop_words);

        let key = search_key(&normalized, &options);
        if options.use_cache {
            if let Some(mut cached) = self.cache.get_json::<SearchResponse>(&key) {
                cached.cached = true;
                return Ok(cached);
            }
        }

        let response = match options.search_mode {
            SearchMode::Regex => self.search_regex(&normalized, &options),
            _ => self.search_text(&normalized, &options),
        };

        if options.use_cache && response.error.is_none() {
            self.cache.set_json(&key, &response);
        }

        tracing::debug!(
            query = %normalized,
            mode = %options.search_mode,
            total = response.total,
            returned = response.results.len(),
            "Search completed"
        );
        Ok(response)
    }

    /// Validate the query and clamp paging
    fn effective_options(&self, query: &str, options: &SearchOptions) -> Result<SearchOptions> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(VerselinkError::InvalidQuery(
                "Query cannot be empty".to_string(),
            ));
        }
        if trimmed.chars().count() > self.config.max_query_length {
            return Err(VerselinkError::InvalidQuery(format!(
                "Query exceeds {} characters",
                self.config.max_query_length
            )));
        }
        if options.versions.is_empty() {
            return Err(VerselinkError::InvalidQuery(
                "At least one version is required".to_string(),
            ));
        }

        let mut effective = options.clone();
        effective.limit = options.limit.clamp(1, self.config.max_limit.max(1));
        Ok(effective)
    }

    /// Requested versions that are installed, each once, in request order
    fn target_versions<'a>(&self, options: &'a SearchOptions) -> Vec<&'a str> {
        let mut targets: Vec<&str> = Vec::with_capacity(options.versions.len());
        for version in &options.versions {
            if targets.contains(&version.as_str()) {
                continue;
            }
            if self.store.is_version_installed(version) {
                targets.push(version);
            } else {
                tracing::debug!(version = %version, "Skipping version that is not installed");
            }
        }
        targets
    }

    fn search_text(&self, normalized: &str, options: &SearchOptions) -> SearchResponse {
        let terms = query_terms(normalized, options.search_mode);
        let mode = RawSearchMode::from(options.search_mode);

        let mut merged = Vec::new();
        for version in self.target_versions(options) {
            let hits = match self.store.search_raw(version, normalized, mode, &options.books) {
                Ok(hits) if hits.is_empty() => self.substring_fallback(version, normalized, options),
                Ok(hits) => hits,
                Err(e) => {
                    tracing::warn!(version = %version, error = %e, "Version search failed, excluding it");
                    continue;
                }
            };
            merged.extend(
                hits.into_iter()
                    .map(|hit| self.to_result(hit, options.sort_by, Scoring::Terms(&terms))),
            );
        }

        let patterns = term_patterns(&terms);
        self.finish(merged, options, &patterns)
    }

    /// Literal match for a version whose native search came back empty
    fn substring_fallback(
        &self,
        version: &str,
        normalized: &str,
        options: &SearchOptions,
    ) -> Vec<RawHit> {
        tracing::debug!(version = %version, query = %normalized, "No native hits, trying substring match");
        match self
            .store
            .search_raw(version, normalized, RawSearchMode::Substring, &options.books)
        {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(version = %version, error = %e, "Substring fallback failed");
                Vec::new()
            }
        }
    }

    fn search_regex(&self, pattern: &str, options: &SearchOptions) -> SearchResponse {
        let regex = match RegexBuilder::new(pattern)
            .case_insensitive(true)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
        {
            Ok(regex) => regex,
            Err(e) => {
                tracing::debug!(pattern = %pattern, error = %e, "Rejected search pattern");
                return SearchResponse::failed(SearchError::InvalidPattern(e.to_string()));
            }
        };

        let mut merged = Vec::new();
        for version in self.target_versions(options) {
            let candidates =
                match self
                    .store
                    .search_raw(version, "", RawSearchMode::All, &options.books)
                {
                    Ok(hits) => hits,
                    Err(e) => {
                        tracing::warn!(version = %version, error = %e, "Version search failed, excluding it");
                        continue;
                    }
                };

            let examined = candidates.len();
            let mut matches: Vec<RawHit> = candidates
                .into_iter()
                .filter(|hit| regex.is_match(&hit.verse.text))
                .collect();

            if matches.len() > self.config.regex_match_limit {
                tracing::warn!(
                    version = %version,
                    examined,
                    matches = matches.len(),
                    limit = self.config.regex_match_limit,
                    "Regex match limit reached, dropping later verses"
                );
                matches.truncate(self.config.regex_match_limit);
            }

            merged.extend(
                matches
                    .into_iter()
                    .map(|hit| self.to_result(hit, options.sort_by, Scoring::Pattern(&regex))),
            );
        }

        self.finish(merged, options, std::slice::from_ref(&regex))
    }

    fn to_result(&self, hit: RawHit, sort_by: SortBy, scoring: Scoring<'_>) -> SearchResult {
        let relevance = match (sort_by, scoring) {
            (SortBy::Reference, _) => hit.relevance.unwrap_or(0.0),
            (SortBy::Relevance, Scoring::Pattern(regex)) => score_regex(&hit.verse.text, regex),
            // Nothing long enough to score: keep the engine's own rank
            (SortBy::Relevance, Scoring::Terms(terms)) if terms.is_empty() => {
                hit.relevance.unwrap_or(0.0)
            }
            (SortBy::Relevance, Scoring::Terms(terms)) => score_text(&hit.verse.text, terms),
        };

        let reference_string = self.reference_string(&hit.verse);
        let Verse {
            version,
            book_number,
            chapter,
            verse,
            text,
        } = hit.verse;

        SearchResult {
            version,
            book_number,
            chapter_number: chapter,
            verse_number: verse,
            text,
            relevance,
            highlighted_text: None,
            reference_string,
        }
    }

    fn reference_string(&self, verse: &Verse) -> String {
        let language = &self.config.default_language;
        let name = self
            .store
            .book_name(verse.book_number, language)
            .unwrap_or_else(|| format!("Book {}", verse.book_number));
        BibleReference::new(
            verse.book_number,
            name,
            verse.chapter,
            Some(verse.verse),
            None,
            language.as_str(),
        )
        .map(|r| r.to_string())
        .unwrap_or_default()
    }

    /// Merge, paginate and highlight
    fn finish(
        &self,
        merged: Vec<SearchResult>,
        options: &SearchOptions,
        patterns: &[Regex],
    ) -> SearchResponse {
        let page = merge_and_paginate(merged, options.sort_by, options.offset, options.limit);

        let mut results = page.results;
        if options.highlight && !patterns.is_empty() {
            let markers = Markers {
                open: self.config.highlight_open.clone(),
                close: self.config.highlight_close.clone(),
            };
            for result in &mut results {
                result.highlighted_text = Some(highlight(&result.text, patterns, &markers));
            }
        }

        SearchResponse {
            results,
            total: page.total,
            has_more: page.has_more,
            cached: false,
            error: None,
        }
    }
}
