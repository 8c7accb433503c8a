//! The fixed canon of 66 books, in reading order, together with the
//! lookups the rest of the crate needs: book by name (in the active
//! locale), book by id, and the external code used for chapter links.
//!
//! A `Canon` value is a locale-bound view over the static table. Scripture
//! strings are always written and matched using the names of a single
//! locale, so every component that produces or parses references takes a
//! `Canon` explicitly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::*;

/// Total number of chapters in the Old Testament.
pub const OT_CHAPTERS: u32 = 929;
/// Total number of chapters in the New Testament.
pub const NT_CHAPTERS: u32 = 260;

/// Which half of the canon a book belongs to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Testament {
    #[serde(rename = "OT")]
    Old,
    #[serde(rename = "NT")]
    New,
}

impl Testament {
    /// Total canonical chapters in this testament.
    pub fn chapters(self) -> u32 {
        match self {
            Testament::Old => OT_CHAPTERS,
            Testament::New => NT_CHAPTERS,
        }
    }
}

impl fmt::Display for Testament {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Testament::Old => write!(f, "OT"),
            Testament::New => write!(f, "NT"),
        }
    }
}

/// The language book names are written in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[serde(rename = "en")]
    #[default]
    English,
    #[serde(rename = "zh-TW")]
    TraditionalChinese,
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Locale> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "zh-tw" | "zh" | "zh_tw" => Ok(Locale::TraditionalChinese),
            other => Err(ErrorKind::Config(format!("unknown locale '{}'", other)).into()),
        }
    }
}

/// A single book of the canon. Books are immutable and only ever
/// handed out as `&'static Book` references into `BOOKS`.
#[derive(Debug, PartialEq, Eq)]
pub struct Book {
    id: &'static str,
    code: &'static str,
    testament: Testament,
    chapters: u32,
    en: &'static str,
    zh: &'static str,
}

impl Book {
    /// The short id used as the key for statistics ("Gen").
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// The external book code used in chapter links ("GEN").
    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn testament(&self) -> Testament {
        self.testament
    }

    /// The number of chapters in the book.
    pub fn chapters(&self) -> u32 {
        self.chapters
    }

    /// The book's name in the given locale.
    pub fn name(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::English => self.en,
            Locale::TraditionalChinese => self.zh,
        }
    }
}

macro_rules! book {
    ($id:expr, $code:expr, $t:ident, $ch:expr, $en:expr, $zh:expr) => {
        Book {
            id: $id,
            code: $code,
            testament: Testament::$t,
            chapters: $ch,
            en: $en,
            zh: $zh,
        }
    };
}

/// All 66 books in canonical order.
pub static BOOKS: [Book; 66] = [
    book!("Gen", "GEN", Old, 50, "Genesis", "創世記"),
    book!("Exo", "EXO", Old, 40, "Exodus", "出埃及記"),
    book!("Lev", "LEV", Old, 27, "Leviticus", "利未記"),
    book!("Num", "NUM", Old, 36, "Numbers", "民數記"),
    book!("Deu", "DEU", Old, 34, "Deuteronomy", "申命記"),
    book!("Jos", "JOS", Old, 24, "Joshua", "約書亞記"),
    book!("Jdg", "JDG", Old, 21, "Judges", "士師記"),
    book!("Rut", "RUT", Old, 4, "Ruth", "路得記"),
    book!("1Sa", "1SA", Old, 31, "1 Samuel", "撒母耳記上"),
    book!("2Sa", "2SA", Old, 24, "2 Samuel", "撒母耳記下"),
    book!("1Ki", "1KI", Old, 22, "1 Kings", "列王紀上"),
    book!("2Ki", "2KI", Old, 25, "2 Kings", "列王紀下"),
    book!("1Ch", "1CH", Old, 29, "1 Chronicles", "歷代志上"),
    book!("2Ch", "2CH", Old, 36, "2 Chronicles", "歷代志下"),
    book!("Ezr", "EZR", Old, 10, "Ezra", "以斯拉記"),
    book!("Neh", "NEH", Old, 13, "Nehemiah", "尼希米記"),
    book!("Est", "EST", Old, 10, "Esther", "以斯帖記"),
    book!("Job", "JOB", Old, 42, "Job", "約伯記"),
    book!("Psa", "PSA", Old, 150, "Psalms", "詩篇"),
    book!("Pro", "PRO", Old, 31, "Proverbs", "箴言"),
    book!("Ecc", "ECC", Old, 12, "Ecclesiastes", "傳道書"),
    book!("Son", "SNG", Old, 8, "Song of Solomon", "雅歌"),
    book!("Isa", "ISA", Old, 66, "Isaiah", "以賽亞書"),
    book!("Jer", "JER", Old, 52, "Jeremiah", "耶利米書"),
    book!("Lam", "LAM", Old, 5, "Lamentations", "耶利米哀歌"),
    book!("Eze", "EZK", Old, 48, "Ezekiel", "以西結書"),
    book!("Dan", "DAN", Old, 12, "Daniel", "但以理書"),
    book!("Hos", "HOS", Old, 14, "Hosea", "何西阿書"),
    book!("Joe", "JOL", Old, 3, "Joel", "約珥書"),
    book!("Amo", "AMO", Old, 9, "Amos", "阿摩司書"),
    book!("Oba", "OBA", Old, 1, "Obadiah", "俄巴底亞書"),
    book!("Jon", "JON", Old, 4, "Jonah", "約拿書"),
    book!("Mic", "MIC", Old, 7, "Micah", "彌迦書"),
    book!("Nah", "NAM", Old, 3, "Nahum", "那鴻書"),
    book!("Hab", "HAB", Old, 3, "Habakkuk", "哈巴谷書"),
    book!("Zep", "ZEP", Old, 3, "Zephaniah", "西番雅書"),
    book!("Hag", "HAG", Old, 2, "Haggai", "哈該書"),
    book!("Zec", "ZEC", Old, 14, "Zechariah", "撒迦利亞書"),
    book!("Mal", "MAL", Old, 4, "Malachi", "瑪拉基書"),
    book!("Mat", "MAT", New, 28, "Matthew", "馬太福音"),
    book!("Mar", "MRK", New, 16, "Mark", "馬可福音"),
    book!("Luk", "LUK", New, 24, "Luke", "路加福音"),
    book!("Joh", "JHN", New, 21, "John", "約翰福音"),
    book!("Act", "ACT", New, 28, "Acts", "使徒行傳"),
    book!("Rom", "ROM", New, 16, "Romans", "羅馬書"),
    book!("1Co", "1CO", New, 16, "1 Corinthians", "哥林多前書"),
    book!("2Co", "2CO", New, 13, "2 Corinthians", "哥林多後書"),
    book!("Gal", "GAL", New, 6, "Galatians", "加拉太書"),
    book!("Eph", "EPH", New, 6, "Ephesians", "以弗所書"),
    book!("Phi", "PHP", New, 4, "Philippians", "腓立比書"),
    book!("Col", "COL", New, 4, "Colossians", "歌羅西書"),
    book!("1Th", "1TH", New, 5, "1 Thessalonians", "帖撒羅尼迦前書"),
    book!("2Th", "2TH", New, 3, "2 Thessalonians", "帖撒羅尼迦後書"),
    book!("1Ti", "1TI", New, 6, "1 Timothy", "提摩太前書"),
    book!("2Ti", "2TI", New, 4, "2 Timothy", "提摩太後書"),
    book!("Tit", "TIT", New, 3, "Titus", "提多書"),
    book!("Phm", "PHM", New, 1, "Philemon", "腓利門書"),
    book!("Heb", "HEB", New, 13, "Hebrews", "希伯來書"),
    book!("Jam", "JAS", New, 5, "James", "雅各書"),
    book!("1Pe", "1PE", New, 5, "1 Peter", "彼得前書"),
    book!("2Pe", "2PE", New, 3, "2 Peter", "彼得後書"),
    book!("1Jo", "1JN", New, 5, "1 John", "約翰一書"),
    book!("2Jo", "2JN", New, 1, "2 John", "約翰二書"),
    book!("3Jo", "3JN", New, 1, "3 John", "約翰三書"),
    book!("Jud", "JUD", New, 1, "Jude", "猶大書"),
    book!("Rev", "REV", New, 22, "Revelation", "啟示錄"),
];

/// A traditional grouping of books within one testament, e.g. the
/// Pentateuch. Used for section-level progress reporting.
#[derive(Debug)]
pub struct Section {
    testament: Testament,
    en: &'static str,
    zh: &'static str,
    /// Range of indices into `BOOKS`.
    first: usize,
    last: usize,
}

impl Section {
    pub fn testament(&self) -> Testament {
        self.testament
    }

    pub fn name(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::English => self.en,
            Locale::TraditionalChinese => self.zh,
        }
    }

    /// The books of the section, in canonical order.
    pub fn books(&self) -> &'static [Book] {
        &BOOKS[self.first..=self.last]
    }
}

/// The ten sections, covering every book exactly once.
pub static SECTIONS: [Section; 10] = [
    Section { testament: Testament::Old, en: "Pentateuch", zh: "摩西五經", first: 0, last: 4 },
    Section { testament: Testament::Old, en: "History", zh: "歷史書", first: 5, last: 16 },
    Section { testament: Testament::Old, en: "Poetry & Wisdom", zh: "詩歌智慧書", first: 17, last: 21 },
    Section { testament: Testament::Old, en: "Major Prophets", zh: "大先知書", first: 22, last: 26 },
    Section { testament: Testament::Old, en: "Minor Prophets", zh: "小先知書", first: 27, last: 38 },
    Section { testament: Testament::New, en: "Gospels", zh: "福音書", first: 39, last: 42 },
    Section { testament: Testament::New, en: "Acts", zh: "歷史書", first: 43, last: 43 },
    Section { testament: Testament::New, en: "Pauline Epistles", zh: "保羅書信", first: 44, last: 56 },
    Section { testament: Testament::New, en: "General Epistles", zh: "通用書信", first: 57, last: 64 },
    Section { testament: Testament::New, en: "Prophecy", zh: "預言書", first: 65, last: 65 },
];

/// A view of the canon with book names in a fixed locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Canon {
    locale: Locale,
}

impl Canon {
    pub fn new(locale: Locale) -> Canon {
        Canon { locale: locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// All books in canonical order.
    pub fn books(&self) -> &'static [Book] {
        &BOOKS
    }

    /// The name of a book in this canon's locale.
    pub fn name(&self, book: &Book) -> &'static str {
        book.name(self.locale)
    }

    /// Finds a book by its exact name in this canon's locale.
    pub fn find(&self, name: &str) -> Option<&'static Book> {
        BOOKS.iter().find(|b| b.name(self.locale) == name)
    }

    /// Finds a book by id (case-insensitive) or by name in any locale.
    pub fn lookup(&self, key: &str) -> Option<&'static Book> {
        let key = key.trim();
        self.find(key).or_else(|| {
            BOOKS.iter().find(|b| {
                b.id.eq_ignore_ascii_case(key) || b.en.eq_ignore_ascii_case(key) || b.zh == key
            })
        })
    }

    /// The external link code for a book name, if the name is known.
    pub fn code_for(&self, name: &str) -> Option<&'static str> {
        self.find(name.trim()).map(Book::code)
    }

    /// The books of one testament, in canonical order.
    pub fn testament(&self, testament: Testament) -> impl Iterator<Item = &'static Book> {
        BOOKS.iter().filter(move |b| b.testament == testament)
    }

    /// Parses a book selection.
    ///
    /// `OT`, `NT` and `ALL` select whole collections; anything else is a
    /// comma separated list of ids or names, kept in the order given.
    /// Repeated books are only selected once.
    pub fn parse_selection(&self, selection: &str) -> Result<Vec<&'static Book>> {
        match selection.trim().to_ascii_uppercase().as_str() {
            "OT" => return Ok(self.testament(Testament::Old).collect()),
            "NT" => return Ok(self.testament(Testament::New).collect()),
            "ALL" => return Ok(BOOKS.iter().collect()),
            _ => {}
        }

        let mut books: Vec<&'static Book> = Vec::new();
        for part in selection.split(|c| c == ',' || c == '，') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let book = self.lookup(part).ok_or_else(|| Error::from_kind(ErrorKind::UnknownBook(part.into())))?;
            if !books.contains(&book) {
                books.push(book);
            }
        }
        Ok(books)
    }
}
