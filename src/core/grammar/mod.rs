//! Shared reference grammar.
//!
//! The reference parser and the text scanner both match references
//! through a `BookVocabulary`, so what counts as a valid reference is
//! defined once. Book aliases are tried longest first: "1 Samuel" is
//! preferred over "1 Sam", "Song of Solomon" over "Song". Latin
//! aliases match case-insensitively, CJK aliases exactly.

pub mod books;

use crate::core::types::BookNumber;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

pub use books::{normalize_language, StaticBookTable};

/// One spelling of a book name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookAlias {
    pub alias: String,
    pub book_number: BookNumber,
}

/// Abbreviation to canonical book lookup, supplied by the verse store
pub trait BookResolver: Send + Sync {
    /// Every known spelling for a language
    fn aliases(&self, language: &str) -> Vec<BookAlias>;

    /// Resolve a single token ("Gen", "1 Sam.", "约翰福音")
    fn resolve_book_abbreviation(&self, token: &str, language: &str) -> Option<BookNumber>;

    /// Display name of a book in a language
    fn book_name(&self, book: BookNumber, language: &str) -> Option<String>;
}

/// Normalised lookup key: lowercase, no dots, no whitespace
pub fn alias_key(token: &str) -> String {
    token
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .flat_map(char::to_lowercase)
        .collect()
}

/// True for Han, kana and Hangul characters
pub fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30FF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{AC00}'..='\u{D7AF}'
    )
}

// chapter, then optional :verse and -verse. Full-width colon and en/em
// dashes are accepted.
const LOCATOR: &str = r"\.?\s*(?P<chapter>\d{1,3})(?:\s*[:：]\s*(?P<verse_start>\d{1,3})(?:\s*[-‐–—]\s*(?P<verse_end>\d{1,3}))?)?";

static COLON_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d\s*[:：]\s*\d").unwrap());

/// A reference found in text, before it is turned into a `BibleReference`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceMatch {
    pub book_number: BookNumber,
    /// Book spelling exactly as it appeared
    pub book_text: String,
    pub chapter: u32,
    pub verse_start: Option<u32>,
    pub verse_end: Option<u32>,
    /// Byte offset of the match in the searched text
    pub start: usize,
    /// Byte offset one past the match
    pub end: usize,
}

/// Compiled book vocabulary for one language
#[derive(Debug)]
pub struct BookVocabulary {
    language: String,
    /// Normalised alias -> book
    index: HashMap<String, BookNumber>,
    /// Anchored whole-string grammar
    anchored: Regex,
    /// Unanchored grammar used for scanning
    scanning: Regex,
    /// Book alternation alone (prefilter)
    books_only: Regex,
}

impl BookVocabulary {
    /// Compile the vocabulary for a language from a resolver
    pub fn build(resolver: &dyn BookResolver, language: &str) -> Result<Self, regex::Error> {
        Self::from_aliases(language, resolver.aliases(language))
    }

    /// Compile a vocabulary from an explicit alias list
    pub fn from_aliases(language: &str, mut aliases: Vec<BookAlias>) -> Result<Self, regex::Error> {
        // Longest first so shorter aliases sharing a prefix cannot
        // shadow longer ones in the leftmost-first alternation.
        aliases.sort_by(|a, b| {
            b.alias
                .chars()
                .count()
                .cmp(&a.alias.chars().count())
                .then_with(|| a.alias.cmp(&b.alias))
        });

        let mut index = HashMap::with_capacity(aliases.len());
        let mut alternatives = Vec::with_capacity(aliases.len());
        for alias in &aliases {
            let key = alias_key(&alias.alias);
            if key.is_empty() || index.contains_key(&key) {
                continue;
            }
            index.insert(key, alias.book_number);
            alternatives.push(alias_pattern(&alias.alias));
        }

        let books = if alternatives.is_empty() {
            // Matches nothing
            r"[^\s\S]".to_string()
        } else {
            alternatives.join("|")
        };

        Ok(Self {
            language: language.to_string(),
            index,
            anchored: Regex::new(&format!(r"^(?P<book>{books}){LOCATOR}$"))?,
            scanning: Regex::new(&format!(r"(?P<book>{books}){LOCATOR}"))?,
            books_only: Regex::new(&format!("(?:{books})"))?,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Look up a book spelling
    pub fn resolve(&self, book_text: &str) -> Option<BookNumber> {
        self.index.get(&alias_key(book_text)).copied()
    }

    /// Match a whole (whitespace-normalised) string against the grammar
    pub fn match_exact(&self, text: &str) -> Option<ReferenceMatch> {
        let captures = self.anchored.captures(text)?;
        self.to_match(&captures)
    }

    /// Find non-overlapping references in free text, left to right.
    ///
    /// Latin book names must start at a word boundary, and a match
    /// that runs straight into further digits is rejected.
    pub fn find_all(&self, text: &str, require_verse: bool) -> Vec<ReferenceMatch> {
        let mut matches = Vec::new();
        let mut position = 0;

        while position <= text.len() {
            let Some(captures) = self.scanning.captures_at(text, position) else {
                break;
            };
            let Some(whole) = captures.get(0) else {
                break;
            };

            let accepted = self
                .to_match(&captures)
                .filter(|m| !require_verse || m.verse_start.is_some())
                .filter(|m| has_boundaries(text, m));

            match accepted {
                Some(found) => {
                    position = found.end;
                    matches.push(found);
                }
                None => {
                    // Retry one character further on
                    position = next_char_boundary(text, whole.start());
                }
            }
        }

        matches
    }

    /// Cheap check run before `find_all`.
    ///
    /// Text without a digit can never match. With verses required a
    /// `digit:digit` pair must be present, otherwise any book token.
    pub fn might_contain_reference(&self, text: &str, require_verse: bool) -> bool {
        if !text.bytes().any(|b| b.is_ascii_digit()) {
            return false;
        }
        if COLON_DIGITS.is_match(text) {
            return true;
        }
        !require_verse && self.books_only.is_match(text)
    }

    fn to_match(&self, captures: &regex::Captures<'_>) -> Option<ReferenceMatch> {
        let whole = captures.get(0)?;
        let book = captures.name("book")?;
        let number = |name: &str| -> Option<u32> {
            captures
                .name(name)
                .and_then(|m| m.as_str().parse::<u32>().ok())
        };

        Some(ReferenceMatch {
            book_number: self.resolve(book.as_str())?,
            book_text: book.as_str().to_string(),
            chapter: number("chapter")?,
            verse_start: number("verse_start"),
            verse_end: number("verse_end"),
            start: whole.start(),
            end: whole.end(),
        })
    }
}

/// Regex for one alias: words separated by whitespace, a leading
/// numeral optionally glued to the name ("1Sam").
fn alias_pattern(alias: &str) -> String {
    let words: Vec<&str> = alias.split_whitespace().collect();
    let mut pattern = String::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            let after_numeral = words[i - 1].chars().all(|c| c.is_ascii_digit());
            pattern.push_str(if after_numeral { r"\s*" } else { r"\s+" });
        }
        pattern.push_str(&regex::escape(word));
    }

    if alias.chars().any(is_cjk) {
        pattern
    } else {
        format!("(?i:{pattern})")
    }
}

fn has_boundaries(text: &str, found: &ReferenceMatch) -> bool {
    let before = text[..found.start].chars().next_back();
    let after = text[found.end..].chars().next();

    let book_is_cjk = found.book_text.chars().any(is_cjk);
    let clean_start = book_is_cjk || !before.is_some_and(char::is_alphanumeric);
    let clean_end = !after.is_some_and(|c| c.is_ascii_digit());
    clean_start && clean_end
}

fn next_char_boundary(text: &str, from: usize) -> usize {
    text[from..]
        .chars()
        .next()
        .map(|c| from + c.len_utf8())
        .unwrap_or(text.len() + 1)
}

/// Per-language vocabulary cache over one resolver
pub struct VocabularyRegistry {
    resolver: Arc<dyn BookResolver>,
    compiled: RwLock<HashMap<String, Arc<BookVocabulary>>>,
}

impl VocabularyRegistry {
    pub fn new(resolver: Arc<dyn BookResolver>) -> Self {
        Self {
            resolver,
            compiled: RwLock::new(HashMap::new()),
        }
    }

    pub fn resolver(&self) -> &Arc<dyn BookResolver> {
        &self.resolver
    }

    /// Vocabulary for a language, compiled on first use
    pub fn vocabulary(&self, language: &str) -> Result<Arc<BookVocabulary>, regex::Error> {
        let language = normalize_language(language);

        if let Ok(compiled) = self.compiled.read() {
            if let Some(vocabulary) = compiled.get(&language) {
                return Ok(Arc::clone(vocabulary));
            }
        }

        let vocabulary = Arc::new(BookVocabulary::build(self.resolver.as_ref(), &language)?);
        tracing::debug!(language = %language, "Compiled book vocabulary");

        if let Ok(mut compiled) = self.compiled.write() {
            compiled.insert(language, Arc::clone(&vocabulary));
        }
        Ok(vocabulary)
    }
}
