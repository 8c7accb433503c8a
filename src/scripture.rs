//! Text handling for scripture references.
//!
//! The atomic unit everywhere is a canonical reference, `"<Book> <Chapter>"`,
//! and a reading is a comma separated list of them. This module provides
//! the two directions between free text and that form: `expand_ranges`
//! turns shorthand like `"Psalms 1~3"` into single-chapter references, and
//! `group_references` collapses a list back into compact display groups.
//!
//! Both are deliberately lenient: tokens that do not look like references
//! pass through untouched instead of producing an error.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::canon::Canon;
use crate::link::{self, LinkConfig};

/// Ranges spanning this many chapters or more are left unexpanded.
const MAX_RANGE_SPAN: u64 = 150;

/// `<book> <start>~<end>` (or `-`), anchored at the end of the token. The
/// book may not end in a colon, so verse ranges like `23:1-6` are not
/// mistaken for chapter ranges.
static RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?[^\d:])\s*(\d+)\s*[~-]\s*(\d+)$").expect("valid range regex"));

/// A book name (ending in a non-digit) followed by a chapter token, which
/// may carry further annotation such as a verse range.
static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?\D)\s*(\d+.*)$").expect("valid reference regex"));

fn is_separator(c: char) -> bool {
    c == ',' || c == '，'
}

/// Splits a reading into its trimmed, non-empty reference tokens.
pub fn split_references(text: &str) -> Vec<&str> {
    text.split(is_separator).map(str::trim).filter(|s| !s.is_empty()).collect()
}

/// Splits one reference token into book name and chapter part.
///
/// Tokens without a chapter come back whole as the book name, with an
/// empty chapter part.
pub fn split_chapter(token: &str) -> (&str, &str) {
    let token = token.trim();
    match REFERENCE.captures(token) {
        Some(caps) => {
            let book = caps.get(1).map_or("", |m| m.as_str()).trim();
            let chapter = caps.get(2).map_or("", |m| m.as_str()).trim();
            (book, chapter)
        }
        None => (token, ""),
    }
}

/// Expands chapter ranges in free text into single-chapter references.
///
/// `"Psalms 1~3, Proverbs 2"` becomes
/// `"Psalms 1, Psalms 2, Psalms 3, Proverbs 2"`. Reversed ranges, and ranges
/// spanning 150 chapters or more, are kept as written.
pub fn expand_ranges(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut parts: Vec<String> = Vec::new();
    for part in text.split(is_separator).map(str::trim) {
        match expand_range(part) {
            Some(expanded) => parts.extend(expanded),
            None => parts.push(part.to_owned()),
        }
    }
    parts.join(", ")
}

fn expand_range(part: &str) -> Option<Vec<String>> {
    let caps = RANGE.captures(part)?;
    let book = caps.get(1)?.as_str().trim();
    let start: u64 = caps.get(2)?.as_str().parse().ok()?;
    let end: u64 = caps.get(3)?.as_str().parse().ok()?;

    if start > end || end - start >= MAX_RANGE_SPAN {
        return None;
    }
    Some((start..=end).map(|ch| format!("{} {}", book, ch)).collect())
}

/// One compacted run of consecutive references to the same book.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DisplayGroup {
    /// `"Book N"` or `"Book N~M"`.
    pub display: String,
    /// Always the first chapter of the group, `"Book N"`.
    pub link_query: String,
}

impl DisplayGroup {
    /// The external link for the first chapter of this group.
    pub fn link(&self, canon: &Canon, config: &LinkConfig) -> String {
        link::chapter_link(&self.link_query, canon, config)
    }
}

/// The group currently being accumulated.
struct Run<'a> {
    book: &'a str,
    first: &'a str,
    last: &'a str,
}

fn with_chapter(book: &str, chapter: &str) -> String {
    if chapter.is_empty() {
        book.to_owned()
    } else {
        format!("{} {}", book, chapter)
    }
}

impl<'a> Run<'a> {
    fn close(self) -> DisplayGroup {
        let display = if self.first == self.last || self.last.is_empty() {
            with_chapter(self.book, self.first)
        } else if self.first.is_empty() {
            with_chapter(self.book, self.last)
        } else {
            format!("{} {}~{}", self.book, self.first, self.last)
        };
        DisplayGroup {
            display: display,
            link_query: with_chapter(self.book, self.first),
        }
    }
}

/// Collapses a reading into display groups.
///
/// Adjacent references to the same book are merged; a group ends as soon
/// as the book changes. Separate runs of one book stay separate groups,
/// since reference order is what marks day boundaries in combined readings.
pub fn group_references(text: &str) -> Vec<DisplayGroup> {
    let mut groups = Vec::new();
    let mut run: Option<Run> = None;

    for token in split_references(text) {
        let (book, chapter) = split_chapter(token);
        if let Some(r) = run.as_mut() {
            if r.book == book {
                r.last = chapter;
                continue;
            }
        }
        let next = Run {
            book: book,
            first: chapter,
            last: chapter,
        };
        if let Some(done) = run.replace(next) {
            groups.push(done.close());
        }
    }

    if let Some(done) = run {
        groups.push(done.close());
    }
    groups
}

/// A single-line title for a reading: its display groups joined by `", "`.
pub fn smart_title(text: &str) -> String {
    group_references(text).into_iter().map(|g| g.display).collect::<Vec<_>>().join(", ")
}
