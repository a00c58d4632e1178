//! CLI test helpers
//!
//! Provides utilities for testing CLI commands including:
//! - Services over a Tantivy store with the fixture versions imported
//! - Empty services for import tests
//! - Arc<Services> wrappers matching CLI execute() signatures

use crate::common::{create_indexed_services, test_config};
use std::sync::Arc;
use tempfile::TempDir;
use verselink::core::services::Services;

/// Services with kjv and web installed (matching CLI execute() signatures)
pub fn create_cli_test_services() -> (Arc<Services>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let services = Arc::new(create_indexed_services(&temp_dir));
    (services, temp_dir)
}

/// Services over an empty version directory
pub fn create_empty_cli_services() -> (Arc<Services>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let services = Services::new(test_config(&temp_dir)).expect("Failed to create services");
    (Arc::new(services), temp_dir)
}

/// Write an HTML page to scan
pub fn write_page(dir: &TempDir, name: &str, html: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, html).expect("Failed to write page");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use verselink::core::store::VerseStore;

    #[test]
    fn test_create_cli_test_services() {
        let (services, _temp) = create_cli_test_services();
        assert!(services.library.is_some());
        assert!(services.store.is_version_installed("kjv"));
    }

    #[test]
    fn test_create_empty_cli_services() {
        let (services, _temp) = create_empty_cli_services();
        assert!(services.store.installed_versions().is_empty());
    }
}
