//! Reference detection in text runs and in-place annotation.

use super::dom::{Document, NodeId};
use crate::core::grammar::{BookResolver, BookVocabulary};
use crate::core::reference::build_reference;
use crate::core::types::{BibleReference, BookNumber};
use serde::Serialize;

/// Class carried by every annotation span
pub const REFERENCE_CLASS: &str = "verselink-ref";

/// Attribute marking nodes the scanner produced
pub const MARKER_ATTR: &str = "data-verselink";

/// A reference found in a text run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScannerMatch {
    pub book_number: BookNumber,
    /// Canonical book name
    pub book_name: String,
    pub chapter: u32,
    pub verse_start: Option<u32>,
    pub verse_end: Option<u32>,
    /// Byte offset of the match within its text run
    pub source_offset: usize,
    /// Length of the match in bytes
    pub source_length: usize,
    /// Canonical reference string ("Romans 8:28")
    pub reference: String,
}

impl ScannerMatch {
    fn from_reference(reference: &BibleReference, start: usize, end: usize) -> Self {
        Self {
            book_number: reference.book_number(),
            book_name: reference.book_name().to_string(),
            chapter: reference.chapter(),
            verse_start: reference.verse_start(),
            verse_end: reference.verse_end(),
            source_offset: start,
            source_length: end - start,
            reference: reference.to_string(),
        }
    }
}

/// Find the references in one text run, left to right, non-overlapping
///
/// Runs that fail the cheap pre-filter never reach the full pattern.
pub fn find_matches(
    vocabulary: &BookVocabulary,
    resolver: &dyn BookResolver,
    text: &str,
    link_whole_chapters: bool,
) -> Vec<ScannerMatch> {
    let require_verse = !link_whole_chapters;
    if !vocabulary.might_contain_reference(text, require_verse) {
        return Vec::new();
    }

    vocabulary
        .find_all(text, require_verse)
        .iter()
        .filter_map(|found| {
            build_reference(vocabulary, resolver, found)
                .map(|reference| ScannerMatch::from_reference(&reference, found.start, found.end))
        })
        .collect()
}

/// Split a text node around its matches, wrapping each in a span.
///
/// Returns the created spans. The node is left alone when `matches`
/// is empty or it is not an attached text node.
pub fn annotate_text_node(
    doc: &mut Document,
    node: NodeId,
    matches: &[ScannerMatch],
    version: &str,
) -> Vec<NodeId> {
    if matches.is_empty() || doc.parent(node).is_none() {
        return Vec::new();
    }
    let Some(text) = doc.text(node).map(str::to_string) else {
        return Vec::new();
    };

    let mut replacements = Vec::with_capacity(matches.len() * 2 + 1);
    let mut spans = Vec::with_capacity(matches.len());
    let mut cursor = 0;

    for found in matches {
        let start = found.source_offset;
        let end = start + found.source_length;
        if start < cursor || end > text.len() {
            continue;
        }
        let (Some(before), Some(matched)) = (text.get(cursor..start), text.get(start..end)) else {
            continue;
        };

        if !before.is_empty() {
            replacements.push(doc.create_text(before));
        }

        let span = doc.create_element("span");
        doc.set_attribute(span, "class", REFERENCE_CLASS);
        doc.set_attribute(span, MARKER_ATTR, "1");
        doc.set_attribute(span, "data-reference", &found.reference);
        doc.set_attribute(span, "data-version", version);
        let label = doc.create_text(matched);
        doc.append_child(span, label);

        replacements.push(span);
        spans.push(span);
        cursor = end;
    }

    if spans.is_empty() {
        return spans;
    }
    if let Some(after) = text.get(cursor..).filter(|rest| !rest.is_empty()) {
        replacements.push(doc.create_text(after));
    }

    doc.replace_with(node, &replacements);
    spans
}
