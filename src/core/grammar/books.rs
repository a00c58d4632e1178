//! Canonical book table.
//!
//! The default `BookResolver`: 66 books with English names and the
//! abbreviations in common use, plus Chinese (CUV) names and their
//! one- or two-character abbreviations.

use super::{alias_key, BookAlias, BookResolver};
use crate::core::types::BookNumber;
use std::collections::HashMap;

type BookRow = (BookNumber, &'static str, &'static [&'static str]);

/// English names and abbreviations. Numbered books are listed
/// without their numeral; variants are generated per numeral.
static ENGLISH: &[BookRow] = &[
    (1, "Genesis", &["Gen", "Ge", "Gn"]),
    (2, "Exodus", &["Exod", "Exo", "Ex"]),
    (3, "Leviticus", &["Lev", "Le", "Lv"]),
    (4, "Numbers", &["Num", "Nu", "Nm", "Nb"]),
    (5, "Deuteronomy", &["Deut", "Dt", "De"]),
    (6, "Joshua", &["Josh", "Jos", "Jsh"]),
    (7, "Judges", &["Judg", "Jdg", "Jg"]),
    (8, "Ruth", &["Rth", "Ru"]),
    (9, "1 Samuel", &["1 Sam", "1 Sa", "1 Sm"]),
    (10, "2 Samuel", &["2 Sam", "2 Sa", "2 Sm"]),
    (11, "1 Kings", &["1 Kgs", "1 Ki", "1 Kin"]),
    (12, "2 Kings", &["2 Kgs", "2 Ki", "2 Kin"]),
    (13, "1 Chronicles", &["1 Chron", "1 Chr", "1 Ch"]),
    (14, "2 Chronicles", &["2 Chron", "2 Chr", "2 Ch"]),
    (15, "Ezra", &["Ezr"]),
    (16, "Nehemiah", &["Neh", "Ne"]),
    (17, "Esther", &["Esth", "Est", "Es"]),
    (18, "Job", &["Jb"]),
    (19, "Psalms", &["Psalm", "Pslm", "Psa", "Psm", "Pss", "Ps"]),
    (20, "Proverbs", &["Prov", "Pro", "Prv", "Pr"]),
    (21, "Ecclesiastes", &["Eccles", "Eccl", "Ecc", "Qoh"]),
    (
        22,
        "Song of Solomon",
        &["Song of Songs", "Song", "Canticles", "SOS"],
    ),
    (23, "Isaiah", &["Isa", "Is"]),
    (24, "Jeremiah", &["Jer", "Je", "Jr"]),
    (25, "Lamentations", &["Lam", "La"]),
    (26, "Ezekiel", &["Ezek", "Eze", "Ezk"]),
    (27, "Daniel", &["Dan", "Da", "Dn"]),
    (28, "Hosea", &["Hos", "Ho"]),
    (29, "Joel", &["Jl"]),
    (30, "Amos", &["Am"]),
    (31, "Obadiah", &["Obad", "Ob"]),
    (32, "Jonah", &["Jnh", "Jon"]),
    (33, "Micah", &["Mic", "Mc"]),
    (34, "Nahum", &["Nah", "Na"]),
    (35, "Habakkuk", &["Hab", "Hb"]),
    (36, "Zephaniah", &["Zeph", "Zep", "Zp"]),
    (37, "Haggai", &["Hag", "Hg"]),
    (38, "Zechariah", &["Zech", "Zec", "Zc"]),
    (39, "Malachi", &["Mal", "Ml"]),
    (40, "Matthew", &["Matt", "Mt"]),
    (41, "Mark", &["Mrk", "Mk", "Mr"]),
    (42, "Luke", &["Luk", "Lk"]),
    (43, "John", &["Jhn", "Jn"]),
    (44, "Acts", &["Act", "Ac"]),
    (45, "Romans", &["Rom", "Ro", "Rm"]),
    (46, "1 Corinthians", &["1 Cor", "1 Co"]),
    (47, "2 Corinthians", &["2 Cor", "2 Co"]),
    (48, "Galatians", &["Gal", "Ga"]),
    (49, "Ephesians", &["Ephes", "Eph"]),
    (50, "Philippians", &["Phil", "Php", "Pp"]),
    (51, "Colossians", &["Col"]),
    (52, "1 Thessalonians", &["1 Thess", "1 Thes", "1 Th"]),
    (53, "2 Thessalonians", &["2 Thess", "2 Thes", "2 Th"]),
    (54, "1 Timothy", &["1 Tim", "1 Ti"]),
    (55, "2 Timothy", &["2 Tim", "2 Ti"]),
    (56, "Titus", &["Tit"]),
    (57, "Philemon", &["Philem", "Phm", "Pm"]),
    (58, "Hebrews", &["Heb"]),
    (59, "James", &["Jas", "Jm"]),
    (60, "1 Peter", &["1 Pet", "1 Pe", "1 Pt"]),
    (61, "2 Peter", &["2 Pet", "2 Pe", "2 Pt"]),
    (62, "1 John", &["1 Jhn", "1 Jn"]),
    (63, "2 John", &["2 Jhn", "2 Jn"]),
    (64, "3 John", &["3 Jhn", "3 Jn"]),
    (65, "Jude", &["Jud", "Jd"]),
    (66, "Revelation", &["Revelations", "Apocalypse", "Rev", "Re"]),
];

static CHINESE: &[BookRow] = &[
    (1, "创世记", &["创"]),
    (2, "出埃及记", &["出"]),
    (3, "利未记", &["利"]),
    (4, "民数记", &["民"]),
    (5, "申命记", &["申"]),
    (6, "约书亚记", &["书"]),
    (7, "士师记", &["士"]),
    (8, "路得记", &["得"]),
    (9, "撒母耳记上", &["撒上"]),
    (10, "撒母耳记下", &["撒下"]),
    (11, "列王纪上", &["王上"]),
    (12, "列王纪下", &["王下"]),
    (13, "历代志上", &["代上"]),
    (14, "历代志下", &["代下"]),
    (15, "以斯拉记", &["拉"]),
    (16, "尼希米记", &["尼"]),
    (17, "以斯帖记", &["斯"]),
    (18, "约伯记", &["伯"]),
    (19, "诗篇", &["诗"]),
    (20, "箴言", &["箴"]),
    (21, "传道书", &["传"]),
    (22, "雅歌", &["歌"]),
    (23, "以赛亚书", &["赛"]),
    (24, "耶利米书", &["耶"]),
    (25, "耶利米哀歌", &["哀"]),
    (26, "以西结书", &["结"]),
    (27, "但以理书", &["但"]),
    (28, "何西阿书", &["何"]),
    (29, "约珥书", &["珥"]),
    (30, "阿摩司书", &["摩"]),
    (31, "俄巴底亚书", &["俄"]),
    (32, "约拿书", &["拿"]),
    (33, "弥迦书", &["弥"]),
    (34, "那鸿书", &["鸿"]),
    (35, "哈巴谷书", &["哈"]),
    (36, "西番雅书", &["番"]),
    (37, "哈该书", &["该"]),
    (38, "撒迦利亚书", &["亚"]),
    (39, "玛拉基书", &["玛"]),
    (40, "马太福音", &["太"]),
    (41, "马可福音", &["可"]),
    (42, "路加福音", &["路"]),
    (43, "约翰福音", &["约"]),
    (44, "使徒行传", &["徒"]),
    (45, "罗马书", &["罗"]),
    (46, "哥林多前书", &["林前"]),
    (47, "哥林多后书", &["林后"]),
    (48, "加拉太书", &["加"]),
    (49, "以弗所书", &["弗"]),
    (50, "腓立比书", &["腓"]),
    (51, "歌罗西书", &["西"]),
    (52, "帖撒罗尼迦前书", &["帖前"]),
    (53, "帖撒罗尼迦后书", &["帖后"]),
    (54, "提摩太前书", &["提前"]),
    (55, "提摩太后书", &["提后"]),
    (56, "提多书", &["多"]),
    (57, "腓利门书", &["门"]),
    (58, "希伯来书", &["来"]),
    (59, "雅各书", &["雅"]),
    (60, "彼得前书", &["彼前"]),
    (61, "彼得后书", &["彼后"]),
    (62, "约翰一书", &["约一"]),
    (63, "约翰二书", &["约二"]),
    (64, "约翰三书", &["约三"]),
    (65, "犹大书", &["犹"]),
    (66, "启示录", &["启"]),
];

/// Roman and ordinal spellings of the numerals 1-3
const NUMERAL_VARIANTS: [(&str, &[&str]); 3] = [
    ("1", &["I", "First", "1st"]),
    ("2", &["II", "Second", "2nd"]),
    ("3", &["III", "Third", "3rd"]),
];

/// Language table entry with a lookup index over normalised aliases
struct LanguageTable {
    names: HashMap<BookNumber, String>,
    aliases: Vec<BookAlias>,
    index: HashMap<String, BookNumber>,
}

impl LanguageTable {
    fn build(rows: &[BookRow]) -> Self {
        let mut names = HashMap::new();
        let mut aliases = Vec::new();
        let mut index = HashMap::new();

        for &(number, name, abbreviations) in rows {
            names.insert(number, name.to_string());

            let mut spellings: Vec<String> = std::iter::once(name)
                .chain(abbreviations.iter().copied())
                .map(str::to_string)
                .collect();
            spellings.extend(numeral_variants(name));
            for abbreviation in abbreviations {
                spellings.extend(numeral_variants(abbreviation));
            }

            for spelling in spellings {
                let key = alias_key(&spelling);
                if index.contains_key(&key) {
                    continue;
                }
                index.insert(key, number);
                aliases.push(BookAlias {
                    alias: spelling,
                    book_number: number,
                });
            }
        }

        Self {
            names,
            aliases,
            index,
        }
    }
}

/// "1 Samuel" -> ["I Samuel", "First Samuel", "1st Samuel"]
fn numeral_variants(spelling: &str) -> Vec<String> {
    let Some((numeral, rest)) = spelling.split_once(' ') else {
        return Vec::new();
    };
    NUMERAL_VARIANTS
        .iter()
        .find(|(digit, _)| *digit == numeral)
        .map(|(_, variants)| {
            variants
                .iter()
                .map(|variant| format!("{variant} {rest}"))
                .collect()
        })
        .unwrap_or_default()
}

/// Built-in resolver over the English and Chinese tables
pub struct StaticBookTable {
    english: LanguageTable,
    chinese: LanguageTable,
}

impl StaticBookTable {
    pub fn new() -> Self {
        Self {
            english: LanguageTable::build(ENGLISH),
            chinese: LanguageTable::build(CHINESE),
        }
    }

    /// Languages with a dedicated table
    pub fn languages() -> &'static [&'static str] {
        &["en", "zh"]
    }

    fn table(&self, language: &str) -> &LanguageTable {
        match normalize_language(language).as_str() {
            "zh" => &self.chinese,
            _ => &self.english,
        }
    }
}

impl Default for StaticBookTable {
    fn default() -> Self {
        Self::new()
    }
}

impl BookResolver for StaticBookTable {
    fn aliases(&self, language: &str) -> Vec<BookAlias> {
        self.table(language).aliases.clone()
    }

    fn resolve_book_abbreviation(&self, token: &str, language: &str) -> Option<BookNumber> {
        self.table(language).index.get(&alias_key(token)).copied()
    }

    fn book_name(&self, book: BookNumber, language: &str) -> Option<String> {
        self.table(language).names.get(&book).cloned()
    }
}

/// "zh-CN" / "zh_Hans" -> "zh", "EN" -> "en"
pub fn normalize_language(language: &str) -> String {
    language
        .split(['-', '_'])
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_book_has_a_name() {
        let table = StaticBookTable::new();
        for book in 1..=66 {
            assert!(table.book_name(book, "en").is_some(), "missing en {book}");
            assert!(table.book_name(book, "zh").is_some(), "missing zh {book}");
        }
        assert_eq!(table.book_name(67, "en"), None);
    }

    #[test]
    fn test_resolve_abbreviations() {
        let table = StaticBookTable::new();
        assert_eq!(table.resolve_book_abbreviation("Gen", "en"), Some(1));
        assert_eq!(table.resolve_book_abbreviation("gen.", "en"), Some(1));
        assert_eq!(table.resolve_book_abbreviation("1 Sam", "en"), Some(9));
        assert_eq!(table.resolve_book_abbreviation("1Sam", "en"), Some(9));
        assert_eq!(table.resolve_book_abbreviation("II Kings", "en"), Some(12));
        assert_eq!(table.resolve_book_abbreviation("First John", "en"), Some(62));
        assert_eq!(table.resolve_book_abbreviation("约翰福音", "zh"), Some(43));
        assert_eq!(table.resolve_book_abbreviation("林前", "zh-CN"), Some(46));
        assert_eq!(table.resolve_book_abbreviation("Hezekiah", "en"), None);
    }

    #[test]
    fn test_unknown_language_uses_english() {
        let table = StaticBookTable::new();
        assert_eq!(table.book_name(43, "xx"), Some("John".to_string()));
    }

    #[test]
    fn test_numeral_variants() {
        assert_eq!(
            numeral_variants("2 Tim"),
            vec!["II Tim", "Second Tim", "2nd Tim"]
        );
        assert!(numeral_variants("Song of Solomon").is_empty());
    }

    #[test]
    fn test_normalize_language() {
        assert_eq!(normalize_language("zh-Hans"), "zh");
        assert_eq!(normalize_language("EN_us"), "en");
    }
}
