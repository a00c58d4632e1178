//! Tantivy-backed verse store.
//!
//! Each version lives in its own index directory under the store
//! root, next to a `version.json` metadata file. Natural and boolean
//! modes go through Tantivy's query parser over the word-tokenised
//! text field; ngram mode requires every character n-gram of the
//! query to be present in the n-gram field. Scores are BM25.

use super::{book_allowed, RawHit, RawSearchMode, VerseStore};
use crate::core::error::StoreError;
use crate::core::grammar::{BookAlias, BookResolver, StaticBookTable};
use crate::core::types::{BookNumber, Verse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tantivy::collector::TopDocs;
use tantivy::query::{AllQuery, BooleanQuery, Occur, Query, QueryParser, TermQuery};
use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, Value, INDEXED, STORED,
    TEXT,
};
use tantivy::tokenizer::{LowerCaser, NgramTokenizer, TextAnalyzer};
use tantivy::{doc, Index, IndexReader, IndexWriter, TantivyDocument, Term};

/// Current schema version
/// Version 1: text + book/chapter/verse
/// Version 2: Added text_ngram field for partial-word search
pub const SCHEMA_VERSION: u32 = 2;

const NGRAM_TOKENIZER: &str = "verse_ngram";
const METADATA_FILE: &str = "version.json";
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Metadata persisted next to each version index
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VersionMetadata {
    pub version: String,
    pub verse_count: usize,
    pub imported_at: DateTime<Utc>,
    pub schema_version: u32,
}

#[derive(Debug, Clone, Copy)]
struct VerseFields {
    book: Field,
    chapter: Field,
    verse: Field,
    text: Field,
    text_ngram: Field,
}

/// Create the Tantivy schema for verse indexing
///
/// Fields:
/// - book, chapter, verse: u64 (INDEXED | STORED)
/// - text: word-tokenised verse text (TEXT | STORED)
/// - text_ngram: 2-3 character n-grams of the text (indexed only)
fn create_schema() -> (Schema, VerseFields) {
    let mut builder = Schema::builder();

    let book = builder.add_u64_field("book", INDEXED | STORED);
    let chapter = builder.add_u64_field("chapter", INDEXED | STORED);
    let verse = builder.add_u64_field("verse", INDEXED | STORED);
    let text = builder.add_text_field("text", TEXT | STORED);

    let ngram_indexing = TextFieldIndexing::default()
        .set_tokenizer(NGRAM_TOKENIZER)
        .set_index_option(IndexRecordOption::WithFreqs);
    let text_ngram = builder.add_text_field(
        "text_ngram",
        TextOptions::default().set_indexing_options(ngram_indexing),
    );

    (
        builder.build(),
        VerseFields {
            book,
            chapter,
            verse,
            text,
            text_ngram,
        },
    )
}

fn ngram_analyzer() -> Result<TextAnalyzer, StoreError> {
    let tokenizer = NgramTokenizer::new(2, 3, false)
        .map_err(|e| StoreError::Index(format!("Failed to build ngram tokenizer: {e}")))?;
    Ok(TextAnalyzer::builder(tokenizer).filter(LowerCaser).build())
}

fn field(schema: &Schema, name: &str) -> Result<Field, StoreError> {
    schema
        .get_field(name)
        .map_err(|e| StoreError::Index(format!("Missing {name} field: {e}")))
}

/// One opened version index
struct VersionIndex {
    index: Index,
    reader: IndexReader,
    fields: VerseFields,
    metadata: VersionMetadata,
}

impl VersionIndex {
    fn open(dir: &Path, metadata: VersionMetadata) -> Result<Self, StoreError> {
        let index = Index::open_in_dir(dir)?;
        index.tokenizers().register(NGRAM_TOKENIZER, ngram_analyzer()?);

        let schema = index.schema();
        let fields = VerseFields {
            book: field(&schema, "book")?,
            chapter: field(&schema, "chapter")?,
            verse: field(&schema, "verse")?,
            text: field(&schema, "text")?,
            text_ngram: field(&schema, "text_ngram")?,
        };
        let reader = index.reader()?;

        Ok(Self {
            index,
            reader,
            fields,
            metadata,
        })
    }

    fn to_verse(&self, doc: &TantivyDocument) -> Verse {
        let number = |field: Field| doc.get_first(field).and_then(|v| v.as_u64()).unwrap_or(0);
        Verse {
            version: self.metadata.version.clone(),
            book_number: number(self.fields.book) as BookNumber,
            chapter: number(self.fields.chapter) as u32,
            verse: number(self.fields.verse) as u32,
            text: doc
                .get_first(self.fields.text)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
        }
    }

    fn term_query(&self, field: Field, value: u64) -> Box<dyn Query> {
        Box::new(TermQuery::new(
            Term::from_field_u64(field, value),
            IndexRecordOption::Basic,
        ))
    }

    /// Restrict a query to the given books (no-op for an empty filter)
    fn with_book_filter(&self, query: Box<dyn Query>, books: &[BookNumber]) -> Box<dyn Query> {
        if books.is_empty() {
            return query;
        }
        let any_book: Vec<(Occur, Box<dyn Query>)> = books
            .iter()
            .map(|&b| (Occur::Should, self.term_query(self.fields.book, u64::from(b))))
            .collect();
        Box::new(BooleanQuery::new(vec![
            (Occur::Must, query),
            (Occur::Must, Box::new(BooleanQuery::new(any_book))),
        ]))
    }

    /// Run a query returning every hit with its score
    fn collect(&self, query: &dyn Query) -> Result<Vec<(f32, Verse)>, StoreError> {
        let searcher = self.reader.searcher();
        let limit = (searcher.num_docs() as usize).max(1);
        let top_docs = searcher.search(query, &TopDocs::with_limit(limit))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address)?;
            hits.push((score, self.to_verse(&doc)));
        }
        Ok(hits)
    }

    fn ngram_query(&self, text: &str) -> Result<Option<Box<dyn Query>>, StoreError> {
        let mut analyzer = ngram_analyzer()?;
        let mut grams = BTreeSet::new();
        for word in text.split_whitespace() {
            let mut stream = analyzer.token_stream(word);
            stream.process(&mut |token| {
                grams.insert(token.text.clone());
            });
        }
        if grams.is_empty() {
            return Ok(None);
        }

        let clauses: Vec<(Occur, Box<dyn Query>)> = grams
            .iter()
            .map(|gram| {
                let query: Box<dyn Query> = Box::new(TermQuery::new(
                    Term::from_field_text(self.fields.text_ngram, gram),
                    IndexRecordOption::WithFreqs,
                ));
                (Occur::Must, query)
            })
            .collect();
        Ok(Some(Box::new(BooleanQuery::new(clauses))))
    }

    fn parsed_query(&self, text: &str, conjunction: bool) -> Box<dyn Query> {
        let mut parser = QueryParser::for_index(&self.index, vec![self.fields.text]);
        if conjunction {
            parser.set_conjunction_by_default();
        }
        let (query, errors) = parser.parse_query_lenient(text);
        if !errors.is_empty() {
            tracing::debug!(
                version = %self.metadata.version,
                errors = errors.len(),
                "Query parsed leniently"
            );
        }
        query
    }
}

/// Verse store with one Tantivy index per version
pub struct TantivyVerseStore {
    root: PathBuf,
    versions: RwLock<HashMap<String, Arc<VersionIndex>>>,
    books: Arc<dyn BookResolver>,
}

impl TantivyVerseStore {
    /// Open every version index found under `root`
    ///
    /// Directories that fail to open are logged and skipped so one
    /// damaged version does not take the others down.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        let mut versions = HashMap::new();
        for entry in fs::read_dir(&root)? {
            let dir = entry?.path();
            let metadata_path = dir.join(METADATA_FILE);
            if !dir.is_dir() || !metadata_path.exists() {
                continue;
            }

            match Self::read_metadata(&metadata_path)
                .and_then(|metadata| VersionIndex::open(&dir, metadata))
            {
                Ok(version) => {
                    tracing::debug!(
                        version = %version.metadata.version,
                        verses = version.metadata.verse_count,
                        "Opened version index"
                    );
                    versions.insert(version.metadata.version.clone(), Arc::new(version));
                }
                Err(e) => tracing::warn!("Skipping version index {:?}: {}", dir, e),
            }
        }

        Ok(Self {
            root,
            versions: RwLock::new(versions),
            books: Arc::new(StaticBookTable::new()),
        })
    }

    /// Replace the book resolver
    pub fn with_resolver(mut self, books: Arc<dyn BookResolver>) -> Self {
        self.books = books;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build (or rebuild) the index for a version
    pub fn import_version(
        &self,
        version: &str,
        verses: &[Verse],
    ) -> Result<VersionMetadata, StoreError> {
        validate_version_id(version)?;

        let dir = self.root.join(version);
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        fs::create_dir_all(&dir)?;

        let (schema, fields) = create_schema();
        let index = Index::create_in_dir(&dir, schema)?;
        index.tokenizers().register(NGRAM_TOKENIZER, ngram_analyzer()?);

        let mut writer: IndexWriter = index.writer(WRITER_HEAP_BYTES)?;
        for verse in verses {
            writer.add_document(doc!(
                fields.book => u64::from(verse.book_number),
                fields.chapter => u64::from(verse.chapter),
                fields.verse => u64::from(verse.verse),
                fields.text => verse.text.as_str(),
                fields.text_ngram => verse.text.as_str(),
            ))?;
        }
        writer.commit()?;

        let metadata = VersionMetadata {
            version: version.to_string(),
            verse_count: verses.len(),
            imported_at: Utc::now(),
            schema_version: SCHEMA_VERSION,
        };
        fs::write(
            dir.join(METADATA_FILE),
            serde_json::to_vec_pretty(&metadata).map_err(|e| StoreError::Index(e.to_string()))?,
        )?;

        let opened = Arc::new(VersionIndex::open(&dir, metadata.clone())?);
        if let Ok(mut versions) = self.versions.write() {
            versions.insert(version.to_string(), opened);
        }

        tracing::info!(version = %version, verses = verses.len(), "Imported version");
        Ok(metadata)
    }

    /// Metadata for every installed version, sorted by id
    pub fn version_metadata(&self) -> Vec<VersionMetadata> {
        let mut all: Vec<VersionMetadata> = self
            .versions
            .read()
            .map(|versions| versions.values().map(|v| v.metadata.clone()).collect())
            .unwrap_or_default();
        all.sort_by(|a, b| a.version.cmp(&b.version));
        all
    }

    fn read_metadata(path: &Path) -> Result<VersionMetadata, StoreError> {
        let bytes = fs::read(path)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Index(format!("Invalid metadata {path:?}: {e}")))
    }

    fn version(&self, version: &str) -> Result<Arc<VersionIndex>, StoreError> {
        self.versions
            .read()
            .map_err(|_| StoreError::Unavailable {
                version: version.to_string(),
                message: "store lock poisoned".to_string(),
            })?
            .get(version)
            .cloned()
            .ok_or_else(|| StoreError::Unavailable {
                version: version.to_string(),
                message: "not installed".to_string(),
            })
    }
}

/// Version ids become directory names: letters, digits, '-' and '_'
pub fn validate_version_id(version: &str) -> Result<(), StoreError> {
    let valid = !version.is_empty()
        && version.len() <= 32
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidVersion(version.to_string()))
    }
}

impl BookResolver for TantivyVerseStore {
    fn aliases(&self, language: &str) -> Vec<BookAlias> {
        self.books.aliases(language)
    }

    fn resolve_book_abbreviation(&self, token: &str, language: &str) -> Option<BookNumber> {
        self.books.resolve_book_abbreviation(token, language)
    }

    fn book_name(&self, book: BookNumber, language: &str) -> Option<String> {
        self.books.book_name(book, language)
    }
}

impl VerseStore for TantivyVerseStore {
    fn is_version_installed(&self, version: &str) -> bool {
        self.versions
            .read()
            .map(|versions| versions.contains_key(version))
            .unwrap_or(false)
    }

    fn installed_versions(&self) -> Vec<String> {
        self.version_metadata()
            .into_iter()
            .map(|metadata| metadata.version)
            .collect()
    }

    fn get_verse(
        &self,
        version: &str,
        book: BookNumber,
        chapter: u32,
        verse: u32,
    ) -> Result<Option<Verse>, StoreError> {
        let index = self.version(version)?;
        let query = BooleanQuery::new(vec![
            (Occur::Must, index.term_query(index.fields.book, u64::from(book))),
            (Occur::Must, index.term_query(index.fields.chapter, u64::from(chapter))),
            (Occur::Must, index.term_query(index.fields.verse, u64::from(verse))),
        ]);
        Ok(index.collect(&query)?.into_iter().next().map(|(_, v)| v))
    }

    fn get_verses(
        &self,
        version: &str,
        book: BookNumber,
        chapter: u32,
        range: Option<RangeInclusive<u32>>,
    ) -> Result<Vec<Verse>, StoreError> {
        let index = self.version(version)?;
        let query = BooleanQuery::new(vec![
            (Occur::Must, index.term_query(index.fields.book, u64::from(book))),
            (Occur::Must, index.term_query(index.fields.chapter, u64::from(chapter))),
        ]);

        let mut verses: Vec<Verse> = index
            .collect(&query)?
            .into_iter()
            .map(|(_, v)| v)
            .filter(|v| range.as_ref().map_or(true, |r| r.contains(&v.verse)))
            .collect();
        verses.sort_by_key(|v| v.verse);
        Ok(verses)
    }

    fn search_raw(
        &self,
        version: &str,
        text: &str,
        mode: RawSearchMode,
        book_filter: &[BookNumber],
    ) -> Result<Vec<RawHit>, StoreError> {
        let index = self.version(version)?;

        let ranked = |query: Box<dyn Query>| -> Result<Vec<RawHit>, StoreError> {
            let query = index.with_book_filter(query, book_filter);
            Ok(index
                .collect(query.as_ref())?
                .into_iter()
                .map(|(score, verse)| RawHit {
                    verse,
                    relevance: Some(f64::from(score)),
                })
                .collect())
        };

        match mode {
            RawSearchMode::Natural => ranked(index.parsed_query(text, false)),
            RawSearchMode::Boolean => ranked(index.parsed_query(text, true)),
            RawSearchMode::Ngram => match index.ngram_query(text)? {
                Some(query) => ranked(query),
                None => Ok(Vec::new()),
            },
            RawSearchMode::Substring | RawSearchMode::All => {
                let needle = text.trim().to_lowercase();
                let mut hits: Vec<RawHit> = index
                    .collect(&AllQuery)?
                    .into_iter()
                    .map(|(_, verse)| verse)
                    .filter(|v| book_allowed(book_filter, v.book_number))
                    .filter(|v| {
                        mode == RawSearchMode::All
                            || (!needle.is_empty() && v.text.to_lowercase().contains(&needle))
                    })
                    .map(RawHit::unranked)
                    .collect();
                hits.sort_by_key(|h| h.verse.canonical_key());
                Ok(hits)
            }
        }
    }
}
