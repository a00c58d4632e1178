//! Verselink CLI - command-line interface for Verselink
//!
//! Look up passages, search installed versions and auto-link
//! references in HTML from the shell.
//!
//! # Examples
//!
//! ```bash
//! # Install a version from a tab-separated verse file
//! verselink import-version kjv.tsv
//!
//! # Look up a passage
//! verselink lookup "John 3:16-18"
//!
//! # Search two versions
//! verselink search "love one another" -b kjv -b web
//!
//! # Link references in a page
//! verselink scan page.html > linked.html
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use verselink::cli::output::print_error;
use verselink::cli::{run, Cli};

/// Logs go to stderr so stdout stays parseable
fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_env("VERSELINK_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("verselink=warn"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
