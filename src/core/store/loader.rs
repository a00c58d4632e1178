//! Verse file loading for version imports.
//!
//! A version file is tab-separated text, one verse per line:
//!
//! ```text
//! # book  chapter  verse  text
//! 43	3	16	For God so loved the world, ...
//! John	3	17	For God sent not his Son ...
//! ```
//!
//! The book column is either a canonical number (1-66) or an English
//! book name/abbreviation. Blank lines and lines starting with `#`
//! are skipped.

use crate::core::error::StoreError;
use crate::core::grammar::{BookResolver, StaticBookTable};
use crate::core::types::{BookNumber, Verse, BOOK_COUNT};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Read every verse from a TSV source
///
/// # Arguments
///
/// * `reader` - Buffered TSV input
/// * `version` - Version id stamped on every verse
///
/// # Returns
///
/// Verses in file order, or `InvalidData` naming the first bad line
pub fn read_verses_tsv<R: BufRead>(reader: R, version: &str) -> Result<Vec<Verse>, StoreError> {
    let books = StaticBookTable::new();
    let mut verses = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.trim().is_empty() || trimmed.trim_start().starts_with('#') {
            continue;
        }

        let invalid = |message: String| StoreError::InvalidData {
            line: line_number,
            message,
        };

        let mut columns = trimmed.splitn(4, '\t');
        let (Some(book), Some(chapter), Some(verse), Some(text)) =
            (columns.next(), columns.next(), columns.next(), columns.next())
        else {
            return Err(invalid("expected 4 tab-separated columns".to_string()));
        };

        let book_number = parse_book(&books, book.trim())
            .ok_or_else(|| invalid(format!("unknown book '{}'", book.trim())))?;
        let chapter = parse_positive(chapter)
            .ok_or_else(|| invalid(format!("invalid chapter '{}'", chapter.trim())))?;
        let verse_number = parse_positive(verse)
            .ok_or_else(|| invalid(format!("invalid verse '{}'", verse.trim())))?;
        let text = text.trim();
        if text.is_empty() {
            return Err(invalid("empty verse text".to_string()));
        }

        verses.push(Verse {
            version: version.to_string(),
            book_number,
            chapter,
            verse: verse_number,
            text: text.to_string(),
        });
    }

    Ok(verses)
}

fn parse_book(books: &StaticBookTable, column: &str) -> Option<BookNumber> {
    match column.parse::<BookNumber>() {
        Ok(n) if (1..=BOOK_COUNT).contains(&n) => Some(n),
        Ok(_) => None,
        Err(_) => books.resolve_book_abbreviation(column, "en"),
    }
}

fn parse_positive(column: &str) -> Option<u32> {
    column.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

/// Find version files (`*.tsv`) below a directory
///
/// The version id is the file stem: `kjv.tsv` imports as `kjv`.
/// Hidden directories are skipped and walk errors are logged.
pub fn discover_version_files(root: &Path) -> Vec<(String, PathBuf)> {
    let mut found = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.path() == root || !is_hidden_dir(e))
    {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if !entry.file_type().is_file()
                    || path.extension().and_then(|e| e.to_str()) != Some("tsv")
                {
                    continue;
                }
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    found.push((stem.to_lowercase(), path.to_path_buf()));
                }
            }
            Err(e) => tracing::warn!("Walk error: {}", e),
        }
    }

    found.sort();
    found
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}
