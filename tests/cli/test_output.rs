//! Tests for CLI output formatting helpers
//!
//! Tests the output formatting utilities:
//! - Duration formatting (ms, s, m)
//! - Relative time formatting (just now, minutes ago, hours ago, days ago)
//! - Highlight marker styling

use chrono::{Duration, Utc};
use verselink::cli::output::{format_duration, format_relative_time, style_highlights};

// =============================================================================
// format_duration tests
// =============================================================================

/// Test duration formatting with various times
#[test]
fn test_format_duration_various_times() {
    assert_eq!(format_duration(0.0), "0ms");
    assert_eq!(format_duration(0.25), "250ms");
    assert_eq!(format_duration(1.0), "1.00s");
    assert_eq!(format_duration(12.5), "12.50s");
    assert_eq!(format_duration(60.0), "1m 0.0s");
    assert_eq!(format_duration(95.5), "1m 35.5s");
}

// =============================================================================
// format_relative_time tests
// =============================================================================

/// Test relative time boundaries
#[test]
fn test_format_relative_time() {
    let now = Utc::now();
    assert_eq!(format_relative_time(&now), "just now");
    assert_eq!(format_relative_time(&(now - Duration::minutes(5))), "5m ago");
    assert_eq!(format_relative_time(&(now - Duration::hours(3))), "3h ago");
    assert_eq!(format_relative_time(&(now - Duration::days(2))), "2d ago");
    assert_eq!(
        format_relative_time(&(now + Duration::hours(1))),
        "in the future"
    );
}

// =============================================================================
// style_highlights tests
// =============================================================================

/// Test that markers are removed and surrounding text kept
#[test]
fn test_style_highlights_strips_markers() {
    colored::control::set_override(false);
    let styled = style_highlights("my <mark>shepherd</mark>; I", "<mark>", "</mark>");
    assert_eq!(styled, "my shepherd; I");
}

/// Test unbalanced and empty markers
#[test]
fn test_style_highlights_edge_cases() {
    colored::control::set_override(false);
    assert_eq!(
        style_highlights("open <mark>only", "<mark>", "</mark>"),
        "open <mark>only"
    );
    assert_eq!(style_highlights("plain", "", ""), "plain");
}
