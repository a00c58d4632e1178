//! Config command - show current configuration

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print the full effective configuration as TOML
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Configuration summary
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: String,
    pub versions_dir: String,
    pub cache_backend: String,
    pub cache_dir: String,
    pub cache_ttl_secs: u64,
    pub default_versions: Vec<String>,
    pub default_limit: usize,
    pub max_limit: usize,
    pub installed_versions: Vec<String>,
}

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = &services.config;

    if args.all {
        match format {
            OutputFormat::Human => println!("{}", toml::to_string_pretty(config.as_ref())?),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config.as_ref())?),
        }
        return Ok(());
    }

    let xdg = XdgDirs::new();
    let response = ConfigResponse {
        config_file: xdg.config_file().to_string_lossy().into_owned(),
        versions_dir: config.storage.index_dir.to_string_lossy().into_owned(),
        cache_backend: config.cache.backend.to_string(),
        cache_dir: config.cache.dir.to_string_lossy().into_owned(),
        cache_ttl_secs: config.cache.ttl_secs,
        default_versions: config.search.default_versions.clone(),
        default_limit: config.search.default_limit,
        max_limit: config.search.max_limit,
        installed_versions: services.store.installed_versions(),
    };

    match format {
        OutputFormat::Human => {
            println!("{}", colors::label("Configuration:"));
            println!("  config_file: {}", response.config_file);
            println!("  versions_dir: {}", response.versions_dir);
            println!("  cache:");
            println!("    backend: {}", response.cache_backend);
            println!("    dir: {}", response.cache_dir);
            println!("    ttl_secs: {}", response.cache_ttl_secs);
            println!("  search:");
            println!("    default_versions: {:?}", response.default_versions);
            println!("    default_limit: {}", response.default_limit);
            println!("    max_limit: {}", response.max_limit);
            println!("  installed: {:?}", response.installed_versions);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
