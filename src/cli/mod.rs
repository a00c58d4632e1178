//! CLI adapter for Verselink
//!
//! Exposes the search API (passage lookup, search, reference parsing),
//! the text scanner, and administration of installed versions and the
//! query cache. Depends on `core/` and `scanner/`; nothing depends on it.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!          +------------+------------+
//!          |                         |
//!          v                         v
//! +------------------+      +------------------+
//! |    scanner/      |----->|      cli/        |
//! | (auto-linking)   |      | (clap adapter)   |
//! +------------------+      +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// Verselink - Bible reference parsing and verse search
///
/// Look up passages by reference, search installed Bible versions,
/// and auto-link references found in HTML documents.
#[derive(Parser, Debug)]
#[command(name = "verselink")]
#[command(author = "Verselink Contributors")]
#[command(version)]
#[command(about = "Bible reference parsing and verse search", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true, env = "VERSELINK_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up a passage by reference ("John 3:16-18")
    Lookup(commands::LookupArgs),

    /// Parse a reference and print its canonical form
    Parse(commands::ParseArgs),

    /// Search one or more installed versions
    Search(commands::SearchArgs),

    /// Annotate references in an HTML document
    Scan(commands::ScanArgs),

    /// Import a version from a tab-separated verse file
    #[command(name = "import-version")]
    ImportVersion(commands::ImportArgs),

    /// List installed versions
    #[command(name = "list-versions")]
    ListVersions(commands::ListVersionsArgs),

    /// Remove cached searches and passages
    #[command(name = "clear-cache")]
    ClearCache(commands::ClearCacheArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  verselink completions bash > ~/.local/share/bash-completion/completions/verselink
    ///   zsh:   verselink completions zsh > ~/.zfunc/_verselink
    ///   fish:  verselink completions fish > ~/.config/fish/completions/verselink.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use crate::core::xdg::XdgDirs;
    use std::sync::Arc;

    // Handle completions command early (doesn't need services)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    // Initialize XDG directories
    let xdg = XdgDirs::new();
    xdg.ensure_dirs_exist()?;
    xdg.log_paths();

    // Load configuration
    let config = Config::load_with_xdg(&xdg)?;
    config.log_config();

    // Create services
    let services = Arc::new(Services::new(config)?);

    // Execute command
    match cli.command {
        Commands::Lookup(args) => commands::lookup::execute(args, &services, cli.format).await,
        Commands::Parse(args) => commands::parse::execute(args, &services, cli.format).await,
        Commands::Search(args) => commands::search::execute(args, &services, cli.format).await,
        Commands::Scan(args) => commands::scan::execute(args, &services, cli.format).await,
        Commands::ImportVersion(args) => {
            commands::import::execute(args, &services, cli.format).await
        }
        Commands::ListVersions(args) => {
            commands::versions::execute(args, &services, cli.format).await
        }
        Commands::ClearCache(args) => commands::cache::execute(args, &services, cli.format).await,
        Commands::ShowConfig(args) => commands::config::execute(args, &services, cli.format).await,
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
