//! Tests for the lookup and parse CLI commands

use crate::cli::test_helpers::create_cli_test_services;
use verselink::cli::commands::lookup::{self, LookupArgs};
use verselink::cli::commands::parse::{self, ParseArgs};
use verselink::cli::OutputFormat;
use verselink::PassageFormat;

fn lookup_args(reference: &str) -> LookupArgs {
    LookupArgs {
        reference: reference.to_string(),
        version: None,
        language: None,
        style: PassageFormat::Plain,
        no_cache: false,
    }
}

/// Test lookup of a verse range
#[tokio::test]
async fn test_lookup_range_human() {
    let (services, _temp) = create_cli_test_services();
    let result = lookup::execute(lookup_args("John 3:16-18"), &services, OutputFormat::Human).await;
    assert!(result.is_ok(), "Lookup should succeed: {:?}", result.err());
}

/// Test lookup with explicit version and numbered style in JSON
#[tokio::test]
async fn test_lookup_numbered_json() {
    let (services, _temp) = create_cli_test_services();
    let args = LookupArgs {
        version: Some("web".to_string()),
        style: PassageFormat::Numbered,
        ..lookup_args("Ps 23:1")
    };
    let result = lookup::execute(args, &services, OutputFormat::Json).await;
    assert!(result.is_ok(), "Lookup should succeed: {:?}", result.err());
}

/// Test lookup of a reference that does not parse
#[tokio::test]
async fn test_lookup_unparseable_reference() {
    let (services, _temp) = create_cli_test_services();
    let result = lookup::execute(lookup_args("nothing here"), &services, OutputFormat::Human).await;

    let err = result.expect_err("Lookup should fail");
    assert!(err.to_string().contains("Reference not found"));
}

/// Test lookup against a version that is not installed
#[tokio::test]
async fn test_lookup_missing_version() {
    let (services, _temp) = create_cli_test_services();
    let args = LookupArgs {
        version: Some("niv".to_string()),
        ..lookup_args("John 3:16")
    };
    let err = lookup::execute(args, &services, OutputFormat::Human)
        .await
        .expect_err("Lookup should fail");
    assert!(err.to_string().contains("niv"));
}

/// Test parse with English and Chinese input
#[tokio::test]
async fn test_parse_reference() {
    let (services, _temp) = create_cli_test_services();

    let english = ParseArgs {
        reference: "1 jn 4:8".to_string(),
        language: None,
    };
    assert!(parse::execute(english, &services, OutputFormat::Json).await.is_ok());

    let chinese = ParseArgs {
        reference: "约一 4:8".to_string(),
        language: Some("zh".to_string()),
    };
    assert!(parse::execute(chinese, &services, OutputFormat::Human).await.is_ok());
}

/// Test parse failure
#[tokio::test]
async fn test_parse_rejects_unknown_book() {
    let (services, _temp) = create_cli_test_services();
    let args = ParseArgs {
        reference: "Hezekiah 1:1".to_string(),
        language: None,
    };
    assert!(parse::execute(args, &services, OutputFormat::Human).await.is_err());
}
