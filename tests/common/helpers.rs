// Test helper functions

use super::fixtures::{verses, KJV_TSV, WEB_TSV};
use std::sync::Arc;
use tempfile::TempDir;
use verselink::core::config::{CacheBackendKind, Config};
use verselink::core::services::Services;
use verselink::core::store::{MemoryVerseStore, TantivyVerseStore};

/// Config rooted in a temporary directory with the memory cache
#[allow(dead_code)] // Used in integration tests
pub fn test_config(root: &TempDir) -> Config {
    let mut config = Config::default();
    config.storage.index_dir = root.path().join("versions");
    config.cache.dir = root.path().join("cache");
    config.cache.backend = CacheBackendKind::Memory;
    config
}

/// In-memory store loaded with the kjv and web fixtures
#[allow(dead_code)] // Used in integration tests
pub fn memory_store() -> Arc<MemoryVerseStore> {
    let store = Arc::new(MemoryVerseStore::new());
    store.insert_version("kjv", verses(KJV_TSV, "kjv"));
    store.insert_version("web", verses(WEB_TSV, "web"));
    store
}

/// Services over the in-memory fixture store
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services() -> (Services, Arc<MemoryVerseStore>) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_config(&temp_dir);
    // Keep temp dir alive for duration of test
    std::mem::forget(temp_dir);

    let store = memory_store();
    (Services::with_store(config, store.clone()), store)
}

/// Services over a Tantivy store with both fixtures imported
#[allow(dead_code)] // Used in integration tests
pub fn create_indexed_services(root: &TempDir) -> Services {
    let config = test_config(root);
    let library = TantivyVerseStore::open(&config.storage.index_dir).expect("open store");
    library
        .import_version("kjv", &verses(KJV_TSV, "kjv"))
        .expect("import kjv");
    library
        .import_version("web", &verses(WEB_TSV, "web"))
        .expect("import web");
    drop(library);

    Services::new(config).expect("services")
}
