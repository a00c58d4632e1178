//! Lookup command - fetch a passage by reference

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::{PassageFormat, PassageOptions};
use clap::Args;
use std::sync::Arc;

/// Arguments for the lookup command
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Reference, e.g. "John 3:16-18" or "Ps 23"
    pub reference: String,

    /// Version to read from (default: first configured search version)
    #[arg(id = "bible_version", long = "bible-version", short = 'b')]
    pub version: Option<String>,

    /// Language of the book name
    #[arg(long, short = 'l')]
    pub language: Option<String>,

    /// Rendering: plain, numbered or html
    #[arg(long, default_value = "plain")]
    pub style: PassageFormat,

    /// Bypass the passage cache
    #[arg(long)]
    pub no_cache: bool,
}

/// Execute the lookup command
pub async fn execute(
    args: LookupArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let version = args
        .version
        .unwrap_or_else(|| super::default_version(services));
    let options = PassageOptions {
        language: args
            .language
            .unwrap_or_else(|| services.config.search.default_language.clone()),
        format: args.style,
        use_cache: !args.no_cache,
    };

    let passage = services
        .passages
        .get_passage(&args.reference, &version, &options)
        .map_err(|e| {
            if e.is_not_found() {
                format!("Reference not found: {} ({e})", args.reference)
            } else {
                e.message()
            }
        })?;

    match format {
        OutputFormat::Human => {
            println!(
                "{} {}",
                colors::reference(&passage.reference.to_string()),
                colors::version(&format!("({})", passage.version.to_uppercase()))
            );
            println!("{}", passage.text);
            if passage.cached {
                println!("{}", colors::dim("(cached)"));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&passage)?);
        }
    }

    Ok(())
}
