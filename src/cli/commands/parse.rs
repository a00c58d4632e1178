//! Parse command - resolve a reference without touching any version

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the parse command
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Reference text, e.g. "1 Sam 1:1" or "约 3:16"
    pub reference: String,

    /// Vocabulary language (en, zh)
    #[arg(long, short = 'l')]
    pub language: Option<String>,
}

/// Parsed reference output
#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub input: String,
    pub canonical: String,
    pub book_number: u8,
    pub book_name: String,
    pub chapter: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verse_start: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verse_end: Option<u32>,
    pub language: String,
}

/// Execute the parse command
pub async fn execute(
    args: ParseArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let language = args
        .language
        .unwrap_or_else(|| services.config.search.default_language.clone());
    let parsed = services.parser.parse(&args.reference, &language)?;

    let response = ParseResponse {
        input: args.reference,
        canonical: parsed.to_string(),
        book_number: parsed.book_number(),
        book_name: parsed.book_name().to_string(),
        chapter: parsed.chapter(),
        verse_start: parsed.verse_start(),
        verse_end: parsed.verse_end(),
        language: parsed.language().to_string(),
    };

    match format {
        OutputFormat::Human => {
            println!("{}", colors::reference(&response.canonical));
            println!(
                "  book: {} ({})",
                response.book_name,
                colors::number(&response.book_number.to_string())
            );
            println!("  chapter: {}", colors::number(&response.chapter.to_string()));
            match (response.verse_start, response.verse_end) {
                (Some(start), Some(end)) => println!(
                    "  verses: {}-{}",
                    colors::number(&start.to_string()),
                    colors::number(&end.to_string())
                ),
                (Some(start), None) => {
                    println!("  verse: {}", colors::number(&start.to_string()))
                }
                _ => println!("  {}", colors::dim("whole chapter")),
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
