//! Clear-cache command - administrative cache invalidation

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::cache::{namespace_prefix, KEY_PREFIX, PASSAGE_NAMESPACE, SEARCH_NAMESPACE};
use crate::core::services::Services;
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::sync::Arc;

/// Which cached entries to drop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CacheScope {
    /// Searches and passages
    #[default]
    All,
    /// Search pages only
    Search,
    /// Passages only
    Passage,
}

impl CacheScope {
    fn prefix(self) -> String {
        match self {
            CacheScope::All => format!("{KEY_PREFIX}:"),
            CacheScope::Search => namespace_prefix(SEARCH_NAMESPACE),
            CacheScope::Passage => namespace_prefix(PASSAGE_NAMESPACE),
        }
    }
}

/// Arguments for the clear-cache command
#[derive(Args, Debug)]
pub struct ClearCacheArgs {
    /// Entries to remove
    #[arg(long, value_enum, default_value = "all")]
    pub scope: CacheScope,
}

/// Clear-cache response
#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    pub backend: String,
    pub prefix: String,
    pub removed: usize,
}

/// Execute the clear-cache command
pub async fn execute(
    args: ClearCacheArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let prefix = args.scope.prefix();
    let removed = services.cache.invalidate_prefix(&prefix)?;

    let response = ClearCacheResponse {
        backend: services.cache.backend_name().to_string(),
        prefix,
        removed,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} cached entr{} ({} backend)",
                colors::success("Removed"),
                colors::number(&response.removed.to_string()),
                if response.removed == 1 { "y" } else { "ies" },
                response.backend
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
