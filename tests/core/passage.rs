// Integration tests for passage retrieval

use crate::common::create_test_services;
use verselink::core::error::VerselinkError;
use verselink::core::types::{PassageFormat, PassageOptions};

fn plain() -> PassageOptions {
    PassageOptions {
        use_cache: false,
        ..PassageOptions::default()
    }
}

#[test]
fn test_verse_range() {
    let (services, _store) = create_test_services();
    let passage = services
        .passages
        .get_passage("John 3:16-17", "kjv", &plain())
        .unwrap();

    assert_eq!(passage.reference.to_string(), "John 3:16-17");
    assert_eq!(passage.version, "kjv");
    let numbers: Vec<u32> = passage.verses.iter().map(|v| v.verse).collect();
    assert_eq!(numbers, vec![16, 17]);
    assert!(passage.text.starts_with("For God so loved the world"));
    assert!(passage.text.ends_with("might be saved."));
}

#[test]
fn test_whole_chapter_from_abbreviation() {
    let (services, _store) = create_test_services();
    let passage = services.passages.get_passage("Jn 3", "kjv", &plain()).unwrap();

    assert!(passage.reference.is_whole_chapter());
    assert_eq!(passage.reference.to_string(), "John 3");
    assert_eq!(passage.verses.len(), 3);
}

#[test]
fn test_single_verse_from_other_version() {
    let (services, _store) = create_test_services();
    let passage = services
        .passages
        .get_passage("Psalm 23:1", "web", &plain())
        .unwrap();
    assert_eq!(passage.reference.to_string(), "Psalms 23:1");
    assert_eq!(passage.text, "Yahweh is my shepherd: I shall lack nothing.");
}

#[test]
fn test_numbered_format() {
    let (services, _store) = create_test_services();
    let options = PassageOptions {
        format: PassageFormat::Numbered,
        ..plain()
    };
    let passage = services
        .passages
        .get_passage("Ps 23:1-2", "kjv", &options)
        .unwrap();
    assert!(passage.text.starts_with("1 The LORD is my shepherd"));
    assert!(passage.text.contains(" 2 He maketh me"));
}

#[test]
fn test_html_format_escapes_text() {
    let (services, store) = create_test_services();
    store.insert_version(
        "test",
        vec![verselink::Verse {
            version: "test".to_string(),
            book_number: 43,
            chapter: 1,
            verse: 1,
            text: "In the beginning was <the> Word & more".to_string(),
        }],
    );

    let options = PassageOptions {
        format: PassageFormat::Html,
        ..plain()
    };
    let passage = services
        .passages
        .get_passage("John 1:1", "test", &options)
        .unwrap();
    assert_eq!(
        passage.text,
        "<p class=\"verselink-passage\"><sup>1</sup> In the beginning was &lt;the&gt; Word &amp; more</p>"
    );
}

#[test]
fn test_chinese_reference() {
    let (services, _store) = create_test_services();
    let options = PassageOptions {
        language: "zh".to_string(),
        ..plain()
    };
    let passage = services
        .passages
        .get_passage("约 3:16", "kjv", &options)
        .unwrap();
    assert_eq!(passage.reference.book_number(), 43);
    assert_eq!(passage.reference.to_string(), "约翰福音 3:16");
    assert_eq!(passage.verses.len(), 1);
}

#[test]
fn test_not_found_variants() {
    let (services, _store) = create_test_services();

    let unparsed = services
        .passages
        .get_passage("hello world", "kjv", &plain())
        .unwrap_err();
    assert!(matches!(unparsed, VerselinkError::Parse(_)));
    assert!(unparsed.is_not_found());

    let missing_version = services
        .passages
        .get_passage("John 3:16", "niv", &plain())
        .unwrap_err();
    assert!(matches!(missing_version, VerselinkError::VersionNotInstalled(_)));
    assert!(missing_version.is_not_found());

    let missing_verses = services
        .passages
        .get_passage("John 4:1", "kjv", &plain())
        .unwrap_err();
    assert!(matches!(missing_verses, VerselinkError::PassageNotFound(_)));
    assert!(missing_verses.is_not_found());

    // web only carries John 3:16, not the rest of the range
    let partial = services
        .passages
        .get_passage("John 3:16-18", "web", &plain())
        .unwrap();
    assert_eq!(partial.verses.len(), 1);
}

#[test]
fn test_repeat_lookup_is_cached() {
    let (services, _store) = create_test_services();
    let options = PassageOptions::default();

    let first = services
        .passages
        .get_passage("Rom 8:28", "kjv", &options)
        .unwrap();
    let second = services
        .passages
        .get_passage("Romans 8:28", "kjv", &options)
        .unwrap();

    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(first.text, second.text);
    assert_eq!(first.reference, second.reference);
}
