//! List-versions command - show installed versions

use crate::cli::output::{colors, format_relative_time};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for list-versions
#[derive(Args, Debug)]
pub struct ListVersionsArgs {}

/// Version list item
#[derive(Debug, Serialize)]
pub struct VersionListItem {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verses: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imported_at: Option<String>,
}

/// Version list response
#[derive(Debug, Serialize)]
pub struct VersionListResponse {
    pub count: usize,
    pub versions: Vec<VersionListItem>,
}

/// Execute list-versions command
pub async fn execute(
    _args: ListVersionsArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let versions: Vec<VersionListItem> = match &services.library {
        Some(library) => library
            .version_metadata()
            .into_iter()
            .map(|m| VersionListItem {
                version: m.version,
                verses: Some(m.verse_count),
                imported_at: Some(m.imported_at.to_rfc3339()),
            })
            .collect(),
        None => services
            .store
            .installed_versions()
            .into_iter()
            .map(|version| VersionListItem {
                version,
                verses: None,
                imported_at: None,
            })
            .collect(),
    };

    let response = VersionListResponse {
        count: versions.len(),
        versions,
    };

    match format {
        OutputFormat::Human => {
            if response.versions.is_empty() {
                println!(
                    "No versions installed. Run '{}' to add one.",
                    colors::label("verselink import-version <file.tsv>")
                );
                return Ok(());
            }

            println!(
                "Installed versions ({}):\n",
                colors::number(&response.count.to_string())
            );
            for item in &response.versions {
                let verses = item
                    .verses
                    .map(|n| format!("{} verses", colors::number(&n.to_string())))
                    .unwrap_or_default();
                let imported = item
                    .imported_at
                    .as_deref()
                    .and_then(|ts| chrono::DateTime::parse_from_rfc3339(ts).ok())
                    .map(|ts| format_relative_time(&ts.with_timezone(&chrono::Utc)))
                    .unwrap_or_default();
                println!(
                    "  {:<10} {}  {}",
                    colors::version(&item.version),
                    verses,
                    colors::dim(&imported)
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
