//! Tests for the clear-cache and show-config CLI commands

use crate::cli::test_helpers::create_cli_test_services;
use verselink::cli::commands::cache::{self, CacheScope, ClearCacheArgs};
use verselink::cli::commands::config::{self, ConfigArgs};
use verselink::cli::OutputFormat;
use verselink::{PassageOptions, SearchOptions};

/// Test clearing only the search namespace
#[tokio::test]
async fn test_clear_search_scope() {
    let (services, _temp) = create_cli_test_services();
    let search = SearchOptions::for_versions(["kjv"]);
    let passage = PassageOptions::default();

    services.search.search("light", &search).unwrap();
    services.passages.get_passage("Gen 1:3", "kjv", &passage).unwrap();

    let args = ClearCacheArgs {
        scope: CacheScope::Search,
    };
    assert!(cache::execute(args, &services, OutputFormat::Json).await.is_ok());

    assert!(!services.search.search("light", &search).unwrap().cached);
    assert!(services.passages.get_passage("Gen 1:3", "kjv", &passage).unwrap().cached);
}

/// Test clearing everything
#[tokio::test]
async fn test_clear_all() {
    let (services, _temp) = create_cli_test_services();
    let passage = PassageOptions::default();
    services.passages.get_passage("Gen 1:3", "kjv", &passage).unwrap();

    let args = ClearCacheArgs {
        scope: CacheScope::All,
    };
    assert!(cache::execute(args, &services, OutputFormat::Human).await.is_ok());
    assert!(!services.passages.get_passage("Gen 1:3", "kjv", &passage).unwrap().cached);
}

/// Test show-config in both formats
#[tokio::test]
async fn test_show_config() {
    let (services, _temp) = create_cli_test_services();
    for format in [OutputFormat::Human, OutputFormat::Json] {
        assert!(config::execute(ConfigArgs { all: false }, &services, format).await.is_ok());
        assert!(config::execute(ConfigArgs { all: true }, &services, format).await.is_ok());
    }
}
