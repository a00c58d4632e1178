//! Tests for the search CLI command
//!
//! Tests the search command handler with various scenarios:
//! - Valid queries with results across versions
//! - Empty results
//! - Book filters given by name or number
//! - Invalid regex patterns and queries

use crate::cli::test_helpers::create_cli_test_services;
use verselink::cli::commands::search::{execute, SearchArgs};
use verselink::cli::OutputFormat;
use verselink::{SearchMode, SortBy};

fn args(query: &str) -> SearchArgs {
    SearchArgs {
        query: query.to_string(),
        versions: vec![],
        books: vec![],
        mode: SearchMode::Natural,
        sort: SortBy::Relevance,
        limit: None,
        offset: 0,
        no_highlight: false,
        no_cache: false,
    }
}

/// Test search with valid query returning results
#[tokio::test]
async fn test_search_valid_query_human() {
    let (services, _temp) = create_cli_test_services();
    let result = execute(args("love"), &services, OutputFormat::Human).await;
    assert!(result.is_ok(), "Search should succeed: {:?}", result.err());
}

/// Test search across two versions in JSON format
#[tokio::test]
async fn test_search_multiple_versions_json() {
    let (services, _temp) = create_cli_test_services();
    let search = SearchArgs {
        versions: vec!["kjv".to_string(), "web".to_string()],
        sort: SortBy::Reference,
        limit: Some(2),
        ..args("God")
    };
    let result = execute(search, &services, OutputFormat::Json).await;
    assert!(result.is_ok(), "JSON search should succeed: {:?}", result.err());
}

/// Test search with no matches
#[tokio::test]
async fn test_search_empty_results() {
    let (services, _temp) = create_cli_test_services();
    let result = execute(args("zerubbabel"), &services, OutputFormat::Human).await;
    assert!(result.is_ok(), "Search with no results should succeed");
}

/// Test book filters by name and by number
#[tokio::test]
async fn test_search_book_filter() {
    let (services, _temp) = create_cli_test_services();
    let search = SearchArgs {
        books: vec!["John".to_string(), "1".to_string()],
        ..args("God")
    };
    assert!(execute(search, &services, OutputFormat::Human).await.is_ok());

    let unknown = SearchArgs {
        books: vec!["Hezekiah".to_string()],
        ..args("God")
    };
    let err = execute(unknown, &services, OutputFormat::Human)
        .await
        .expect_err("Unknown book should fail");
    assert!(err.to_string().contains("Unknown book"));

    let out_of_range = SearchArgs {
        books: vec!["67".to_string()],
        ..args("God")
    };
    assert!(execute(out_of_range, &services, OutputFormat::Human).await.is_err());
}

/// Test that an invalid regex is an error for humans but data for JSON
#[tokio::test]
async fn test_search_invalid_regex() {
    let (services, _temp) = create_cli_test_services();

    let human = SearchArgs {
        mode: SearchMode::Regex,
        ..args("(unclosed")
    };
    let err = execute(human, &services, OutputFormat::Human)
        .await
        .expect_err("Invalid pattern should fail");
    assert!(err.to_string().contains("Invalid pattern"));

    let json = SearchArgs {
        mode: SearchMode::Regex,
        ..args("(unclosed")
    };
    assert!(execute(json, &services, OutputFormat::Json).await.is_ok());
}

/// Test empty query
#[tokio::test]
async fn test_search_empty_query() {
    let (services, _temp) = create_cli_test_services();
    assert!(execute(args("   "), &services, OutputFormat::Human).await.is_err());
}
