//! Tests for the import-version and list-versions CLI commands

use crate::cli::test_helpers::{create_cli_test_services, create_empty_cli_services};
use crate::common::{VersionFiles, KJV_TSV};
use verselink::cli::commands::import::{self, ImportArgs};
use verselink::cli::commands::versions::{self, ListVersionsArgs};
use verselink::cli::OutputFormat;
use verselink::core::store::VerseStore;
use verselink::SearchOptions;

fn import_args(path: &std::path::Path) -> ImportArgs {
    ImportArgs {
        path: path.to_path_buf(),
        version: None,
        force: false,
        quiet: true,
    }
}

/// Test importing a directory of version files
#[tokio::test]
async fn test_import_directory() {
    let (services, _temp) = create_empty_cli_services();
    let files = VersionFiles::standard();

    let result = import::execute(import_args(files.path()), &services, OutputFormat::Json).await;
    assert!(result.is_ok(), "Import should succeed: {:?}", result.err());

    assert!(services.store.is_version_installed("kjv"));
    assert!(services.store.is_version_installed("web"));
    assert!(versions::execute(ListVersionsArgs {}, &services, OutputFormat::Human)
        .await
        .is_ok());
}

/// Test importing a single file under an explicit id
#[tokio::test]
async fn test_import_single_file_with_version() {
    let (services, _temp) = create_empty_cli_services();
    let files = VersionFiles::with_files(&[("bible.tsv", KJV_TSV)]);

    let args = ImportArgs {
        version: Some("KJV1611".to_string()),
        ..import_args(&files.files[0])
    };
    assert!(import::execute(args, &services, OutputFormat::Human).await.is_ok());
    assert!(services.store.is_version_installed("kjv1611"));
}

/// Test that reinstalling needs --force and clears cached searches
#[tokio::test]
async fn test_reimport_requires_force() {
    let (services, _temp) = create_cli_test_services();
    let files = VersionFiles::with_files(&[("kjv.tsv", "1\t1\t1\tIn the beginning.\n")]);

    let err = import::execute(import_args(&files.files[0]), &services, OutputFormat::Human)
        .await
        .expect_err("Existing version should be refused");
    assert!(err.to_string().contains("--force"));

    let options = SearchOptions::for_versions(["kjv"]);
    services.search.search("beginning", &options).unwrap();

    let forced = ImportArgs {
        force: true,
        ..import_args(&files.files[0])
    };
    assert!(import::execute(forced, &services, OutputFormat::Json).await.is_ok());

    let after = services.search.search("beginning", &options).unwrap();
    assert!(!after.cached);
    assert_eq!(after.total, 1);
    assert_eq!(after.results[0].text, "In the beginning.");
}

/// Test invalid inputs are rejected before anything is written
#[tokio::test]
async fn test_import_rejects_bad_input() {
    let (services, temp) = create_empty_cli_services();

    let missing = import::execute(
        import_args(&temp.path().join("nope.tsv")),
        &services,
        OutputFormat::Human,
    )
    .await;
    assert!(missing.is_err());

    let empty_dir = VersionFiles::with_files(&[("readme.txt", "not a version")]);
    let err = import::execute(import_args(empty_dir.path()), &services, OutputFormat::Human)
        .await
        .expect_err("Directory without .tsv files should fail");
    assert!(err.to_string().contains("No .tsv"));

    let bad_rows = VersionFiles::with_files(&[("bad.tsv", "Hezekiah\t1\t1\ttext\n")]);
    assert!(import::execute(import_args(&bad_rows.files[0]), &services, OutputFormat::Human)
        .await
        .is_err());
    assert!(!services.store.is_version_installed("bad"));
}

/// Test listing with nothing installed
#[tokio::test]
async fn test_list_versions_empty() {
    let (services, _temp) = create_empty_cli_services();
    assert!(versions::execute(ListVersionsArgs {}, &services, OutputFormat::Json)
        .await
        .is_ok());
}
