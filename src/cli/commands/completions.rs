//! Completions command - shell completion scripts for `verselink`

use crate::cli::Cli;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

/// Arguments for the completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Render the completion script for a shell
pub fn render(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "verselink", out);
}

/// Execute the completions command
pub fn execute(args: CompletionsArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.output {
        Some(path) => {
            let mut file = File::create(&path)
                .map_err(|e| format!("Cannot write '{}': {e}", path.display()))?;
            render(args.shell, &mut file);
            tracing::info!(path = %path.display(), shell = %args.shell, "Wrote completion script");
        }
        None => render(args.shell, &mut io::stdout()),
    }
    Ok(())
}
