// Integration tests for the Tantivy-backed verse store

use crate::common::{create_indexed_services, test_config, verses, KJV_TSV};
use tempfile::TempDir;
use verselink::core::services::Services;
use verselink::core::store::{TantivyVerseStore, VerseStore, SCHEMA_VERSION};
use verselink::core::types::{PassageOptions, SearchMode, SearchOptions};

fn uncached(versions: &[&str]) -> SearchOptions {
    SearchOptions {
        use_cache: false,
        ..SearchOptions::for_versions(versions.iter().copied())
    }
}

#[test]
fn test_installed_versions_after_import() {
    let temp = TempDir::new().unwrap();
    let services = create_indexed_services(&temp);

    let mut installed = services.store.installed_versions();
    installed.sort();
    assert_eq!(installed, vec!["kjv".to_string(), "web".to_string()]);

    let library = services.library.as_ref().expect("tantivy library");
    let metadata = library.version_metadata();
    assert_eq!(metadata.len(), 2);
    assert_eq!(metadata[0].version, "kjv");
    assert_eq!(metadata[0].verse_count, 12);
    assert_eq!(metadata[0].schema_version, SCHEMA_VERSION);
    assert_eq!(metadata[1].verse_count, 3);
}

#[test]
fn test_natural_search_across_indexed_versions() {
    let temp = TempDir::new().unwrap();
    let services = create_indexed_services(&temp);

    let response = services
        .search
        .search("shepherd", &uncached(&["kjv", "web"]))
        .unwrap();
    assert_eq!(response.total, 2);
    for result in &response.results {
        assert_eq!(result.canonical_key(), (19, 23, 1));
        assert!(result.relevance > 0.0);
    }
}

#[test]
fn test_ngram_search_on_index() {
    let temp = TempDir::new().unwrap();
    let services = create_indexed_services(&temp);

    let mut options = uncached(&["kjv"]);
    options.search_mode = SearchMode::Ngram;
    let response = services.search.search("pastur", &options).unwrap();
    assert_eq!(response.total, 1);
    assert_eq!(response.results[0].reference_string, "Psalms 23:2");
}

#[test]
fn test_book_filter_on_index() {
    let temp = TempDir::new().unwrap();
    let services = create_indexed_services(&temp);

    let mut options = uncached(&["kjv"]);
    options.books = vec![1];
    options.limit = 100;
    let response = services.search.search("God", &options).unwrap();
    assert_eq!(response.total, 3);
    assert!(response.results.iter().all(|r| r.book_number == 1));
}

#[test]
fn test_passage_from_index() {
    let temp = TempDir::new().unwrap();
    let services = create_indexed_services(&temp);

    let passage = services
        .passages
        .get_passage("Gen 1:1-3", "kjv", &PassageOptions::default())
        .unwrap();
    let numbers: Vec<u32> = passage.verses.iter().map(|v| v.verse).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert!(passage.text.starts_with("In the beginning"));
}

#[test]
fn test_index_survives_reopen() {
    let temp = TempDir::new().unwrap();
    {
        let services = create_indexed_services(&temp);
        assert!(services.store.is_version_installed("kjv"));
    }

    let reopened = Services::new(test_config(&temp)).unwrap();
    assert!(reopened.store.is_version_installed("kjv"));
    assert!(reopened.store.is_version_installed("web"));

    let verse = reopened
        .store
        .get_verse("kjv", 62, 4, 8)
        .unwrap()
        .expect("1 John 4:8");
    assert_eq!(verse.text, "He that loveth not knoweth not God; for God is love.");
}

#[test]
fn test_reimport_replaces_version() {
    let temp = TempDir::new().unwrap();
    let config = test_config(&temp);
    let library = TantivyVerseStore::open(&config.storage.index_dir).unwrap();

    library.import_version("kjv", &verses(KJV_TSV, "kjv")).unwrap();
    let short: Vec<_> = verses(KJV_TSV, "kjv").into_iter().take(2).collect();
    let metadata = library.import_version("kjv", &short).unwrap();

    assert_eq!(metadata.verse_count, 2);
    assert!(library.get_verse("kjv", 1, 1, 3).unwrap().is_none());
}

#[test]
fn test_rejects_unsafe_version_ids() {
    let temp = TempDir::new().unwrap();
    let library = TantivyVerseStore::open(temp.path()).unwrap();
    assert!(library.import_version("../escape", &[]).is_err());
    assert!(library.import_version("", &[]).is_err());
}
