// Integration tests for multi-version search

use crate::common::create_test_services;
use std::collections::HashSet;
use verselink::core::error::VerselinkError;
use verselink::core::types::{SearchMode, SearchOptions, SortBy};

fn options(versions: &[&str]) -> SearchOptions {
    SearchOptions {
        use_cache: false,
        ..SearchOptions::for_versions(versions.iter().copied())
    }
}

#[test]
fn test_natural_search_matches_word_forms() {
    let (services, _store) = create_test_services();
    let response = services.search.search("love", &options(&["kjv"])).unwrap();

    // Deut 6:5, John 3:16 (loved), Rom 8:28, 1 John 4:8 (loveth, love)
    assert_eq!(response.total, 4);
    assert!(response.error.is_none());
    for result in &response.results {
        assert!(result.text.to_lowercase().contains("lov"), "{}", result.text);
        assert!(result.relevance > 0.0);
    }
}

#[test]
fn test_results_carry_references_and_highlights() {
    let (services, _store) = create_test_services();
    let response = services.search.search("shepherd", &options(&["kjv"])).unwrap();

    assert_eq!(response.results.len(), 1);
    let hit = &response.results[0];
    assert_eq!(hit.reference_string, "Psalms 23:1");
    assert_eq!(
        hit.highlighted_text.as_deref(),
        Some("The LORD is my <mark>shepherd</mark>; I shall not want.")
    );
}

#[test]
fn test_highlight_can_be_disabled() {
    let (services, _store) = create_test_services();
    let mut opts = options(&["kjv"]);
    opts.highlight = false;
    let response = services.search.search("shepherd", &opts).unwrap();
    assert!(response.results[0].highlighted_text.is_none());
}

#[test]
fn test_fan_out_merges_versions() {
    let (services, _store) = create_test_services();
    let response = services
        .search
        .search("shepherd", &options(&["kjv", "web"]))
        .unwrap();

    assert_eq!(response.total, 2);
    let versions: HashSet<&str> = response.results.iter().map(|r| r.version.as_str()).collect();
    assert_eq!(versions, HashSet::from(["kjv", "web"]));
}

#[test]
fn test_pages_have_no_duplicates_or_gaps() {
    let (services, _store) = create_test_services();
    let mut opts = options(&["kjv", "web"]);
    opts.limit = 3;

    let everything = {
        let mut all = opts.clone();
        all.limit = 100;
        services.search.search("God", &all).unwrap()
    };
    assert!(everything.total > opts.limit);

    let mut seen = Vec::new();
    loop {
        let page = services.search.search("God", &opts).unwrap();
        assert!(opts.offset + page.results.len() <= page.total);
        assert_eq!(page.total, everything.total);
        seen.extend(
            page.results
                .iter()
                .map(|r| (r.version.clone(), r.canonical_key())),
        );
        if !page.has_more {
            break;
        }
        opts.offset += opts.limit;
    }

    let unique: HashSet<_> = seen.iter().cloned().collect();
    assert_eq!(unique.len(), seen.len(), "duplicate across pages");
    assert_eq!(seen.len(), everything.total, "skipped results");

    let expected: Vec<_> = everything
        .results
        .iter()
        .map(|r| (r.version.clone(), r.canonical_key()))
        .collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_offset_past_end_is_empty() {
    let (services, _store) = create_test_services();
    let mut opts = options(&["kjv"]);
    opts.offset = 50;
    let response = services.search.search("God", &opts).unwrap();
    // Past the end: an empty page, total still counts every hit
    assert!(response.results.is_empty());
    assert!(!response.has_more);
    assert!(response.total > 0);
}

#[test]
fn test_literal_fallback_finds_word_fragments() {
    let (services, _store) = create_test_services();
    let response = services
        .search
        .search("orld", &options(&["kjv", "web"]))
        .unwrap();

    // John 3:16-17 in kjv, John 3:16 in web
    assert_eq!(response.total, 3);
    assert!(response.error.is_none());
    for result in &response.results {
        assert_eq!((result.book_number, result.chapter_number), (43, 3));
        assert!(result.text.contains("world"));
    }
}

#[test]
fn test_reference_sort_is_canonical() {
    let (services, _store) = create_test_services();
    let mut opts = options(&["kjv", "web"]);
    opts.sort_by = SortBy::Reference;
    opts.limit = 100;

    let response = services.search.search("God", &opts).unwrap();
    let keys: Vec<_> = response
        .results
        .iter()
        .map(|r| (r.canonical_key(), r.version.clone()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn test_book_filter() {
    let (services, _store) = create_test_services();
    let mut opts = options(&["kjv"]);
    opts.books = vec![43];

    let response = services.search.search("God", &opts).unwrap();
    assert_eq!(response.total, 3);
    assert!(response.results.iter().all(|r| r.book_number == 43));
}

#[test]
fn test_boolean_mode() {
    let (services, _store) = create_test_services();
    let mut opts = options(&["kjv"]);
    opts.search_mode = SearchMode::Boolean;
    opts.limit = 100;

    let response = services.search.search("God AND NOT love", &opts).unwrap();
    assert_eq!(response.total, 5);
    for result in &response.results {
        assert!(result.text.contains("God"));
        assert!(!result.text.to_lowercase().contains("love"));
    }
}

#[test]
fn test_ngram_mode_matches_partial_words() {
    let (services, _store) = create_test_services();
    let mut opts = options(&["kjv", "web"]);
    opts.search_mode = SearchMode::Ngram;

    let response = services.search.search("shep", &opts).unwrap();
    assert_eq!(response.total, 2);
}

#[test]
fn test_regex_mode() {
    let (services, _store) = create_test_services();
    let mut opts = options(&["kjv"]);
    opts.search_mode = SearchMode::Regex;

    let response = services.search.search(r"\blight\b", &opts).unwrap();
    assert_eq!(response.total, 1);
    assert_eq!(response.results[0].reference_string, "Genesis 1:3");
    assert!(response.results[0]
        .highlighted_text
        .as_deref()
        .unwrap()
        .contains("<mark>light</mark>"));
}

#[test]
fn test_invalid_regex_is_reported() {
    let (services, _store) = create_test_services();
    let mut opts = options(&["kjv"]);
    opts.search_mode = SearchMode::Regex;
    opts.use_cache = true;

    let response = services.search.search("(unclosed", &opts).unwrap();
    assert!(response.results.is_empty());
    assert!(response.error.is_some());
    assert!(!response.error.unwrap().to_string().is_empty());

    // Not cached: a second call is computed again
    let again = services.search.search("(unclosed", &opts).unwrap();
    assert!(!again.cached);
}

#[test]
fn test_unavailable_version_is_excluded() {
    let (services, store) = create_test_services();
    store.set_unavailable("web", true);

    let response = services
        .search
        .search("shepherd", &options(&["kjv", "web"]))
        .unwrap();
    assert!(response.error.is_none());
    assert_eq!(response.total, 1);
    assert_eq!(response.results[0].version, "kjv");

    store.set_unavailable("kjv", true);
    let none_left = services
        .search
        .search("shepherd", &options(&["kjv", "web"]))
        .unwrap();
    assert_eq!(none_left.total, 0);
    assert!(none_left.error.is_none());
}

#[test]
fn test_repeat_search_is_cached_and_identical() {
    let (services, _store) = create_test_services();
    let opts = SearchOptions::for_versions(["kjv", "web"]);

    let first = services.search.search("love", &opts).unwrap();
    let second = services.search.search("love", &opts).unwrap();

    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(
        serde_json::to_string(&first.results).unwrap(),
        serde_json::to_string(&second.results).unwrap()
    );
    assert_eq!(first.total, second.total);
}

#[test]
fn test_invalid_input_is_an_error() {
    let (services, _store) = create_test_services();
    assert!(matches!(
        services.search.search("   ", &options(&["kjv"])),
        Err(VerselinkError::InvalidQuery(_))
    ));
    assert!(matches!(
        services.search.search("love", &options(&[])),
        Err(VerselinkError::InvalidQuery(_))
    ));
}
