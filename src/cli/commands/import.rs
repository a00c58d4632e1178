//! Import command - build version indexes from verse files

use crate::cli::output::{colors, format_duration};
use crate::cli::OutputFormat;
use crate::core::cache::{namespace_prefix, PASSAGE_NAMESPACE, SEARCH_NAMESPACE};
use crate::core::services::Services;
use crate::core::store::{discover_version_files, read_verses_tsv, validate_version_id};
use clap::Args;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Arguments for the import-version command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// TSV file (book, chapter, verse, text) or a directory of `<version>.tsv` files
    pub path: PathBuf,

    /// Version id for a single file (default: the file name)
    #[arg(id = "bible_version", long = "bible-version", short = 'b')]
    pub version: Option<String>,

    /// Replace versions that are already installed
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// One imported version
#[derive(Debug, Serialize)]
pub struct ImportedVersion {
    pub version: String,
    pub source: String,
    pub verse_count: usize,
}

/// Import result response
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: Vec<ImportedVersion>,
    pub cache_entries_cleared: usize,
    pub duration_secs: f64,
}

/// Execute the import-version command
pub async fn execute(
    args: ImportArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let library = services
        .library
        .as_ref()
        .ok_or("Version import needs the on-disk version store")?;

    let sources = collect_sources(&args.path, args.version.as_deref())?;
    if sources.is_empty() {
        return Err(format!("No .tsv version files found in '{}'", args.path.display()).into());
    }

    // Validate everything before touching the store
    for (version, _) in &sources {
        validate_version_id(version)?;
        if services.store.is_version_installed(version) && !args.force {
            return Err(format!(
                "Version '{version}' is already installed. Use --force to replace it."
            )
            .into());
        }
    }

    let started = Instant::now();
    let mut imported = Vec::with_capacity(sources.len());
    for (version, path) in sources {
        if !args.quiet && format == OutputFormat::Human {
            eprintln!(
                "Importing {} from {}...",
                colors::version(&version),
                colors::dim(&path.display().to_string())
            );
        }

        let file = File::open(&path).map_err(|e| format!("Cannot open '{}': {e}", path.display()))?;
        let verses = read_verses_tsv(BufReader::new(file), &version)?;
        let metadata = library.import_version(&version, &verses)?;

        imported.push(ImportedVersion {
            version: metadata.version,
            source: path.to_string_lossy().into_owned(),
            verse_count: metadata.verse_count,
        });
    }

    // Cached pages may describe the old text
    let mut cache_entries_cleared = 0;
    for namespace in [SEARCH_NAMESPACE, PASSAGE_NAMESPACE] {
        match services.cache.invalidate_prefix(&namespace_prefix(namespace)) {
            Ok(removed) => cache_entries_cleared += removed,
            Err(e) => tracing::warn!(namespace = namespace, error = %e, "Cache invalidation failed"),
        }
    }

    let response = ImportResponse {
        imported,
        cache_entries_cleared,
        duration_secs: started.elapsed().as_secs_f64(),
    };

    match format {
        OutputFormat::Human => {
            for version in &response.imported {
                println!(
                    "{} {} ({} verses)",
                    colors::success("Imported"),
                    colors::version(&version.version),
                    colors::number(&version.verse_count.to_string())
                );
            }
            println!(
                "Done in {}",
                colors::number(&format_duration(response.duration_secs))
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

/// (version id, file) pairs to import
fn collect_sources(
    path: &Path,
    version: Option<&str>,
) -> Result<Vec<(String, PathBuf)>, Box<dyn std::error::Error>> {
    if path.is_dir() {
        if version.is_some() {
            return Err("--bible-version only applies to a single file".into());
        }
        return Ok(discover_version_files(path));
    }

    if !path.is_file() {
        return Err(format!(
            "Path '{}' does not exist. Pass a .tsv file or a directory of them.",
            path.display()
        )
        .into());
    }

    let version = match version {
        Some(version) => version.to_lowercase(),
        None => path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| format!("Cannot derive a version id from '{}'", path.display()))?,
    };
    Ok(vec![(version, path.to_path_buf())])
}
