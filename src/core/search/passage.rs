//! Passage retrieval.

use super::highlight::escape_html;
use crate::core::cache::{passage_key, QueryCache};
use crate::core::error::{Result, VerselinkError};
use crate::core::reference::ReferenceParser;
use crate::core::store::VerseStore;
use crate::core::types::{Passage, PassageFormat, PassageOptions, Verse};
use std::sync::Arc;

/// Resolves reference strings to rendered verse text
pub struct PassageService {
    store: Arc<dyn VerseStore>,
    parser: Arc<ReferenceParser>,
    cache: QueryCache,
}

impl PassageService {
    pub fn new(store: Arc<dyn VerseStore>, parser: Arc<ReferenceParser>, cache: QueryCache) -> Self {
        Self {
            store,
            parser,
            cache,
        }
    }

    /// Fetch and render a passage
    ///
    /// Fails with `Parse` for an unrecognised reference,
    /// `VersionNotInstalled`, or `PassageNotFound` when the version has
    /// no verses in the addressed range. All three are "not found"
    /// errors.
    pub fn get_passage(
        &self,
        reference: &str,
        version: &str,
        options: &PassageOptions,
    ) -> Result<Passage> {
        let parsed = self.parser.parse(reference, &options.language)?;

        if !self.store.is_version_installed(version) {
            return Err(VerselinkError::VersionNotInstalled(version.to_string()));
        }

        let key = passage_key(&parsed, version, options.format);
        if options.use_cache {
            if let Some(mut cached) = self.cache.get_json::<Passage>(&key) {
                cached.cached = true;
                return Ok(cached);
            }
        }

        let verses = self.store.get_verses(
            version,
            parsed.book_number(),
            parsed.chapter(),
            parsed.verse_range(),
        )?;
        if verses.is_empty() {
            return Err(VerselinkError::PassageNotFound(format!("{parsed} ({version})")));
        }

        let passage = Passage {
            text: render(&verses, options.format),
            reference: parsed,
            version: version.to_string(),
            verses,
            cached: false,
        };

        if options.use_cache {
            self.cache.set_json(&key, &passage);
        }
        Ok(passage)
    }
}

/// Render verses in the requested format
pub fn render(verses: &[Verse], format: PassageFormat) -> String {
    match format {
        PassageFormat::Plain => verses
            .iter()
            .map(|v| v.text.as_str())
            .collect::<Vec<_>>()
            .join(" "),
        PassageFormat::Numbered => verses
            .iter()
            .map(|v| format!("{} {}", v.verse, v.text))
            .collect::<Vec<_>>()
            .join(" "),
        PassageFormat::Html => {
            let body = verses
                .iter()
                .map(|v| format!("<sup>{}</sup> {}", v.verse, escape_html(&v.text)))
                .collect::<Vec<_>>()
                .join(" ");
            format!("<p class=\"verselink-passage\">{body}</p>")
        }
    }
}
