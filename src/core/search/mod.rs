//! Search module.
//!
//! - `query`: normalisation and term extraction
//! - `rank`: relevance scoring, ordering and pagination
//! - `highlight`: term marking
//! - `orchestrator`: `SearchService`, the multi-version search
//! - `passage`: `PassageService`, reference lookup

mod highlight;
mod orchestrator;
mod passage;
mod query;
mod rank;

pub use highlight::{escape_html, highlight, match_spans, term_patterns, Markers};
pub use orchestrator::SearchService;
pub use passage::{render, PassageService};
pub use query::{normalize_query, query_terms, DEFAULT_STOP_WORDS, MIN_TERM_CHARS};
pub use rank::{compare, merge_and_paginate, score_regex, score_text, Page};
