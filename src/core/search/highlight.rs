//! Term highlighting.
//!
//! Each term is compiled to its own case-insensitive pattern. Spans
//! from all patterns are merged before wrapping, so overlapping terms
//! ("love", "loved") produce one marker pair instead of nested ones.

use regex::{Regex, RegexBuilder};
use std::ops::Range;

/// Highlight marker pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub open: String,
    pub close: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            open: "<mark>".to_string(),
            close: "</mark>".to_string(),
        }
    }
}

/// Compile one literal, case-insensitive pattern per term
pub fn term_patterns(terms: &[String]) -> Vec<Regex> {
    terms
        .iter()
        .filter(|t| !t.is_empty())
        .filter_map(|term| {
            RegexBuilder::new(&regex::escape(term))
                .case_insensitive(true)
                .build()
                .ok()
        })
        .collect()
}

/// Sorted, merged byte spans matched by any pattern
pub fn match_spans(text: &str, patterns: &[Regex]) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = patterns
        .iter()
        .flat_map(|p| p.find_iter(text).map(|m| m.range()))
        .filter(|r| !r.is_empty())
        .collect();
    spans.sort_by_key(|r| (r.start, r.end));

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Wrap every matched span in the markers
pub fn highlight(text: &str, patterns: &[Regex], markers: &Markers) -> String {
    let spans = match_spans(text, patterns);
    if spans.is_empty() {
        return text.to_string();
    }

    let extra = spans.len() * (markers.open.len() + markers.close.len());
    let mut out = String::with_capacity(text.len() + extra);
    let mut cursor = 0;
    for span in spans {
        out.push_str(&text[cursor..span.start]);
        out.push_str(&markers.open);
        out.push_str(&text[span.clone()]);
        out.push_str(&markers.close);
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Escape text for inclusion in HTML
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
