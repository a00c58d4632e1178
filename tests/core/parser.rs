// Integration tests for reference parsing

use crate::common::create_test_services;
use verselink::core::error::ParseError;
use verselink::core::reference::format_reference;

#[test]
fn test_parse_range_scenario() {
    let (services, _store) = create_test_services();
    let parsed = services.parser.parse("John 3:16-18", "en").unwrap();

    assert_eq!(parsed.book_number(), 43);
    assert_eq!(parsed.chapter(), 3);
    assert_eq!(parsed.verse_start(), Some(16));
    assert_eq!(parsed.verse_end(), Some(18));
}

#[test]
fn test_canonical_form_is_fixpoint() {
    let (services, _store) = create_test_services();
    let inputs = [
        ("john 3:16", "John 3:16"),
        ("Jn 3:16-18", "John 3:16-18"),
        ("1 sam 1:1", "1 Samuel 1:1"),
        ("1Sam 1:1", "1 Samuel 1:1"),
        ("Ps 23", "Psalms 23"),
        ("Rom. 8:28", "Romans 8:28"),
        ("  Deut   6 : 5 ", "Deuteronomy 6:5"),
    ];

    for (input, canonical) in inputs {
        let parsed = services
            .parser
            .parse(input, "en")
            .unwrap_or_else(|e| panic!("{input}: {e}"));
        let formatted = format_reference(&parsed);
        assert_eq!(formatted, canonical, "{input}");

        let reparsed = services.parser.parse(&formatted, "en").unwrap();
        assert_eq!(reparsed, parsed, "{input} is not a fixpoint");
    }
}

#[test]
fn test_numbered_books_win_over_shorter_names() {
    let (services, _store) = create_test_services();

    let samuel = services.parser.parse("1 Samuel 1:1", "en").unwrap();
    assert_eq!(samuel.book_number(), 9);
    assert_eq!(samuel.book_name(), "1 Samuel");

    let epistle = services.parser.parse("1 John 4:8", "en").unwrap();
    assert_eq!(epistle.book_number(), 62);

    let gospel = services.parser.parse("John 4:8", "en").unwrap();
    assert_eq!(gospel.book_number(), 43);
}

#[test]
fn test_ranges_are_ordered() {
    let (services, _store) = create_test_services();
    for input in ["John 3:16-18", "Gen 1:1-3", "Ps 23:1-6"] {
        let parsed = services.parser.parse(input, "en").unwrap();
        assert!(parsed.verse_end().unwrap() >= parsed.verse_start().unwrap());
    }
    assert!(services.parser.try_parse("John 3:18-16", "en").is_none());
}

#[test]
fn test_failures_are_values() {
    let (services, _store) = create_test_services();

    assert!(matches!(
        services.parser.parse("Hezekiah 4:2", "en"),
        Err(ParseError::UnknownBook(_))
    ));
    assert!(matches!(
        services.parser.parse("hello world", "en"),
        Err(ParseError::NoMatch(_))
    ));
    assert!(services.parser.try_parse("", "en").is_none());
}

#[test]
fn test_chinese_vocabulary() {
    let (services, _store) = create_test_services();

    let parsed = services.parser.parse("约 3:16", "zh").unwrap();
    assert_eq!(parsed.book_number(), 43);
    assert_eq!(parsed.book_name(), "约翰福音");

    let epistle = services.parser.parse("约一 4:8", "zh").unwrap();
    assert_eq!(epistle.book_number(), 62);
}
