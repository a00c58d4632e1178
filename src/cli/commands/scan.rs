//! Scan command - auto-link references in an HTML document

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::scanner::{Document, ScannerConfigPatch};
use clap::Args;
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// HTML file to scan ("-" reads stdin)
    pub input: PathBuf,

    /// Version written into the annotations
    #[arg(id = "bible_version", long = "bible-version", short = 'b')]
    pub version: Option<String>,

    /// Vocabulary language (en, zh)
    #[arg(long, short = 'l')]
    pub language: Option<String>,

    /// Also link chapter-only references ("Psalm 23")
    #[arg(long)]
    pub whole_chapters: bool,

    /// Extra exclusion selectors (can be specified multiple times)
    #[arg(long, short = 'x')]
    pub exclude: Vec<String>,

    /// List the matches instead of printing the annotated document
    #[arg(long)]
    pub matches_only: bool,
}

/// Scan output
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub matches: Vec<crate::scanner::ScannerMatch>,
    pub nodes_scanned: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

/// Execute the scan command
pub async fn execute(
    args: ScanArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let html = if args.input.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(&args.input)
            .map_err(|e| format!("Cannot read '{}': {e}", args.input.display()))?
    };

    let mut scanner = services.scanner();
    let mut exclusions = scanner.config().exclude_selectors.clone();
    exclusions.extend(args.exclude);
    scanner.update_config(ScannerConfigPatch {
        enabled: Some(true),
        default_version: args.version,
        language: args.language,
        exclude_selectors: Some(exclusions),
        link_whole_chapters: args.whole_chapters.then_some(true),
        ..ScannerConfigPatch::default()
    });

    let mut doc = Document::parse_html(&html);
    let root = doc.root();
    let report = scanner.scan(&mut doc, root);

    let response = ScanResponse {
        nodes_scanned: report.nodes_scanned,
        html: (!args.matches_only).then(|| doc.inner_html(root)),
        matches: report.matches,
    };

    match format {
        OutputFormat::Human => {
            if let Some(html) = &response.html {
                println!("{html}");
                eprintln!(
                    "{} {} reference(s)",
                    colors::success("Linked"),
                    colors::number(&response.matches.len().to_string())
                );
            } else if response.matches.is_empty() {
                println!("No references found");
            } else {
                for found in &response.matches {
                    println!(
                        "{} {}",
                        colors::reference(&found.reference),
                        colors::dim(&format!(
                            "(offset {}, length {})",
                            found.source_offset, found.source_length
                        ))
                    );
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
