//! Tests for the scan CLI command

use crate::cli::test_helpers::{create_cli_test_services, write_page};
use crate::common::SAMPLE_PAGE;
use tempfile::TempDir;
use verselink::cli::commands::scan::{execute, ScanArgs};
use verselink::cli::OutputFormat;

fn args(input: std::path::PathBuf) -> ScanArgs {
    ScanArgs {
        input,
        version: None,
        language: None,
        whole_chapters: false,
        exclude: vec![],
        matches_only: false,
    }
}

/// Test linking a page with default settings
#[tokio::test]
async fn test_scan_page_human() {
    let (services, _temp) = create_cli_test_services();
    let pages = TempDir::new().unwrap();
    let page = write_page(&pages, "notes.html", SAMPLE_PAGE);

    let result = execute(args(page), &services, OutputFormat::Human).await;
    assert!(result.is_ok(), "Scan should succeed: {:?}", result.err());
}

/// Test listing matches only, with extra options
#[tokio::test]
async fn test_scan_matches_only_json() {
    let (services, _temp) = create_cli_test_services();
    let pages = TempDir::new().unwrap();
    let page = write_page(&pages, "psalm.html", "<p>Read Psalm 23 and <em>Gen 1:1</em></p>");

    let scan = ScanArgs {
        version: Some("web".to_string()),
        whole_chapters: true,
        exclude: vec!["em".to_string()],
        matches_only: true,
        ..args(page)
    };
    let result = execute(scan, &services, OutputFormat::Json).await;
    assert!(result.is_ok(), "Scan should succeed: {:?}", result.err());
}

/// Test a missing input file
#[tokio::test]
async fn test_scan_missing_file() {
    let (services, temp) = create_cli_test_services();
    let missing = temp.path().join("missing.html");

    let err = execute(args(missing), &services, OutputFormat::Human)
        .await
        .expect_err("Missing file should fail");
    assert!(err.to_string().contains("Cannot read"));
}
