// Integration tests for the query cache as seen through the services

use crate::common::{memory_store, test_config};
use tempfile::TempDir;
use verselink::core::cache::{namespace_prefix, PASSAGE_NAMESPACE, SEARCH_NAMESPACE};
use verselink::core::config::{CacheBackendKind, Config};
use verselink::core::services::Services;
use verselink::core::types::{PassageOptions, SearchOptions};

fn file_config(root: &TempDir) -> Config {
    let mut config = test_config(root);
    config.cache.backend = CacheBackendKind::File;
    config
}

#[test]
fn test_file_cache_is_shared_between_processes() {
    let temp = TempDir::new().unwrap();
    let options = SearchOptions::for_versions(["kjv", "web"]);

    let first = Services::with_store(file_config(&temp), memory_store());
    assert_eq!(first.cache.backend_name(), "file");
    let computed = first.search.search("love", &options).unwrap();
    assert!(!computed.cached);

    // A second instance over the same directory sees the entry
    let second = Services::with_store(file_config(&temp), memory_store());
    let reused = second.search.search("love", &options).unwrap();
    assert!(reused.cached);
    assert_eq!(reused.total, computed.total);
}

#[test]
fn test_invalidating_search_namespace_keeps_passages() {
    let temp = TempDir::new().unwrap();
    let services = Services::with_store(file_config(&temp), memory_store());
    let search_options = SearchOptions::for_versions(["kjv"]);
    let passage_options = PassageOptions::default();

    services.search.search("God", &search_options).unwrap();
    services
        .passages
        .get_passage("John 3:16", "kjv", &passage_options)
        .unwrap();

    let removed = services
        .cache
        .invalidate_prefix(&namespace_prefix(SEARCH_NAMESPACE))
        .unwrap();
    assert_eq!(removed, 1);

    assert!(!services.search.search("God", &search_options).unwrap().cached);
    assert!(
        services
            .passages
            .get_passage("John 3:16", "kjv", &passage_options)
            .unwrap()
            .cached
    );

    services
        .cache
        .invalidate_prefix(&namespace_prefix(PASSAGE_NAMESPACE))
        .unwrap();
    assert!(
        !services
            .passages
            .get_passage("John 3:16", "kjv", &passage_options)
            .unwrap()
            .cached
    );
}

#[test]
fn test_zero_ttl_never_serves() {
    let temp = TempDir::new().unwrap();
    let mut config = test_config(&temp);
    config.cache.ttl_secs = 0;
    let services = Services::with_store(config, memory_store());
    let options = SearchOptions::for_versions(["kjv"]);

    services.search.search("love", &options).unwrap();
    assert!(!services.search.search("love", &options).unwrap().cached);
}

#[test]
fn test_disabled_cache() {
    let temp = TempDir::new().unwrap();
    let mut config = test_config(&temp);
    config.cache.backend = CacheBackendKind::None;
    let services = Services::with_store(config, memory_store());
    assert_eq!(services.cache.backend_name(), "none");

    let options = PassageOptions::default();
    services.passages.get_passage("Gen 1:1", "kjv", &options).unwrap();
    assert!(!services.passages.get_passage("Gen 1:1", "kjv", &options).unwrap().cached);
}

#[test]
fn test_highlight_setting_is_part_of_the_key() {
    let (services, _store) = crate::common::create_test_services();
    let highlighted = SearchOptions::for_versions(["kjv"]);
    let plain = SearchOptions {
        highlight: false,
        ..highlighted.clone()
    };

    services.search.search("shepherd", &highlighted).unwrap();
    let second = services.search.search("shepherd", &plain).unwrap();
    assert!(!second.cached);
    assert!(second.results[0].highlighted_text.is_none());
}
