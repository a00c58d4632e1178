//! Search command - search installed versions

use crate::cli::output::{colors, style_highlights};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::{BookNumber, SearchMode, SearchOptions, SortBy};
use clap::Args;
use std::sync::Arc;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search text (natural words, boolean syntax, partial words or a regex)
    pub query: String,

    /// Versions to search (can be specified multiple times)
    #[arg(long = "bible-version", short = 'b')]
    pub versions: Vec<String>,

    /// Restrict to books, by name or number (can be specified multiple times)
    #[arg(long = "book")]
    pub books: Vec<String>,

    /// Query interpretation: natural, boolean, ngram or regex
    #[arg(long, short = 'm', default_value = "natural")]
    pub mode: SearchMode,

    /// Ordering: relevance or reference
    #[arg(long, default_value = "relevance")]
    pub sort: SortBy,

    /// Maximum number of results
    #[arg(long, short = 'k')]
    pub limit: Option<usize>,

    /// Results to skip
    #[arg(long, default_value = "0")]
    pub offset: usize,

    /// Do not mark matched terms
    #[arg(long)]
    pub no_highlight: bool,

    /// Bypass the search cache
    #[arg(long)]
    pub no_cache: bool,
}

/// Execute the search command
pub async fn execute(
    args: SearchArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = &services.config.search;
    let books = resolve_books(services, &args.books)?;

    let options = SearchOptions {
        versions: if args.versions.is_empty() {
            config.default_versions.clone()
        } else {
            args.versions
        },
        books,
        limit: args.limit.unwrap_or(config.default_limit),
        offset: args.offset,
        search_mode: args.mode,
        sort_by: args.sort,
        highlight: !args.no_highlight,
        use_cache: !args.no_cache,
    };

    let response = services.search.search(&args.query, &options)?;

    match format {
        OutputFormat::Human => {
            if let Some(error) = &response.error {
                return Err(error.to_string().into());
            }
            if response.results.is_empty() {
                println!("No results found for '{}'", colors::label(&args.query));
                return Ok(());
            }

            println!(
                "Showing {}-{} of {} result(s){}:\n",
                colors::number(&(options.offset + 1).to_string()),
                colors::number(&(options.offset + response.results.len()).to_string()),
                colors::number(&response.total.to_string()),
                if response.cached {
                    colors::dim(" (cached)").to_string()
                } else {
                    String::new()
                }
            );

            for (i, result) in response.results.iter().enumerate() {
                println!(
                    "[{}] {} {} {}",
                    colors::rank(&(options.offset + i + 1).to_string()),
                    colors::reference(&result.reference_string),
                    colors::version(&result.version.to_uppercase()),
                    colors::score(&format!("(score: {:.2})", result.relevance))
                );
                let text = match &result.highlighted_text {
                    Some(marked) => {
                        style_highlights(marked, &config.highlight_open, &config.highlight_close)
                    }
                    None => result.text.clone(),
                };
                println!("    {text}\n");
            }

            if response.has_more {
                println!(
                    "{}",
                    colors::dim(&format!(
                        "More results: --offset {}",
                        options.offset + response.results.len()
                    ))
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

/// Turn `--book` values (names, abbreviations or numbers) into book numbers
fn resolve_books(
    services: &Services,
    books: &[String],
) -> Result<Vec<BookNumber>, Box<dyn std::error::Error>> {
    let language = &services.config.search.default_language;
    books
        .iter()
        .map(|book| {
            let resolved = match book.trim().parse::<BookNumber>() {
                Ok(number) if (1..=66).contains(&number) => Some(number),
                Ok(_) => None,
                Err(_) => services
                    .parser
                    .resolver()
                    .resolve_book_abbreviation(book, language),
            };
            resolved.ok_or_else(|| format!("Unknown book: {book}"))
        })
        .collect::<Result<Vec<_>, String>>()
        .map_err(Into::into)
}
