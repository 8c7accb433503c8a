//! Reading statistics derived from the log of completed entries.
//!
//! Volumes are estimated from each entry's scripture text rather than
//! tracked chapter by chapter: a book counts when its name appears in the
//! text, and the remainder decides how many chapters it contributes.
//! The estimate can overcount when one book's name is contained in
//! another's (in English, "John" within "1 John").

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::canon::{Book, Canon, Section, Testament};
use crate::plan::Entry;

/// Number of days covered by the trend, ending today.
pub const TREND_DAYS: u64 = 30;

/// Leading integer of a string, after leading whitespace.
fn leading_int(s: &str) -> Option<i64> {
    let digits: String = s.trim_start().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Estimates how many chapters of each book a scripture string covers.
///
/// For every book named in the text, the text with the name removed is
/// read as a `start-end` range, else a comma separated list (one chapter
/// per part), else a single chapter number. Text consisting of nothing
/// but the book name counts the whole book. Anything else contributes
/// nothing.
pub fn parse_volume(scripture: &str, canon: &Canon) -> Vec<(&'static Book, u32)> {
    canon
        .books()
        .iter()
        .filter_map(|book| {
            let name = canon.name(book);
            if !scripture.contains(name) {
                return None;
            }
            let rest = scripture.replacen(name, "", 1);
            let rest = rest.trim();

            let count = if rest.contains('-') {
                let mut bounds = rest.split('-').map(leading_int);
                match (bounds.next().and_then(|b| b), bounds.next().and_then(|b| b)) {
                    (Some(start), Some(end)) => end - start + 1,
                    _ => 0,
                }
            } else if rest.contains(',') {
                rest.split(',').count() as i64
            } else if leading_int(rest).is_some() {
                1
            } else if scripture.trim() == name {
                i64::from(book.chapters())
            } else {
                0
            };

            if count > 0 {
                Some((book, count.min(i64::from(u32::MAX)) as u32))
            } else {
                None
            }
        })
        .collect()
}

/// Chapters completed on one day of the trend.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    /// `MM/dd`.
    pub label: String,
    pub chapters: u32,
}

/// Display tier for how many times a book has been read through.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HeatTier {
    Unread,
    Partial,
    Once,
    Twice,
    Many,
}

impl HeatTier {
    pub fn for_times_read(times: f64) -> HeatTier {
        if times <= 0.0 {
            HeatTier::Unread
        } else if times < 1.0 {
            HeatTier::Partial
        } else if times < 2.0 {
            HeatTier::Once
        } else if times < 3.0 {
            HeatTier::Twice
        } else {
            HeatTier::Many
        }
    }
}

/// Progress through one section of the canon. Re-reads do not count:
/// each book contributes at most its own chapter count.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionProgress {
    pub completed: u32,
    pub total: u32,
    pub percentage: u32,
}

/// Aggregate reading statistics.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    /// Chapters read per book id; every book is present.
    pub book_stats: BTreeMap<&'static str, u32>,
    /// Passes through the Old Testament (may exceed 1.0).
    pub ot_progress: f64,
    /// Passes through the New Testament (may exceed 1.0).
    pub nt_progress: f64,
    /// The last 30 days, oldest first.
    pub trend: Vec<TrendPoint>,
}

impl StatsSnapshot {
    /// Chapters read of a book.
    pub fn read(&self, book: &Book) -> u32 {
        self.book_stats.get(book.id()).cloned().unwrap_or(0)
    }

    /// How many times the book has been read through.
    pub fn times_read(&self, book: &Book) -> f64 {
        f64::from(self.read(book)) / f64::from(book.chapters())
    }

    pub fn heat(&self, book: &Book) -> HeatTier {
        HeatTier::for_times_read(self.times_read(book))
    }

    pub fn section_progress(&self, section: &Section) -> SectionProgress {
        let (completed, total) = section
            .books()
            .iter()
            .fold((0, 0), |(c, t), b| (c + self.read(b).min(b.chapters()), t + b.chapters()));
        SectionProgress {
            completed: completed,
            total: total,
            percentage: if total == 0 {
                0
            } else {
                (f64::from(completed) * 100.0 / f64::from(total)).round() as u32
            },
        }
    }

    /// Total chapters read across the trend window.
    pub fn trend_total(&self) -> u32 {
        self.trend.iter().fold(0u32, |total, p| total.saturating_add(p.chapters))
    }
}

/// Aggregates completed entries into a snapshot as of `today`.
///
/// Uncompleted entries are ignored. Entries outside the trend window
/// still count towards the book totals and testament progress.
pub fn aggregate<'a, I: IntoIterator<Item = &'a Entry>>(entries: I, canon: &Canon, today: NaiveDate) -> StatsSnapshot {
    let mut book_stats: BTreeMap<&'static str, u32> = canon.books().iter().map(|b| (b.id(), 0)).collect();
    let mut testament_totals = [0u64; 2];

    let window: Vec<NaiveDate> = (0..TREND_DAYS)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .collect();
    let mut daily = vec![0u32; window.len()];

    for entry in entries.into_iter().filter(|e| e.is_completed()) {
        let volume = parse_volume(entry.scripture(), canon);
        let mut total = 0u32;
        for &(book, count) in &volume {
            let read = book_stats.entry(book.id()).or_insert(0);
            *read = read.saturating_add(count);
            let slot = match book.testament() {
                Testament::Old => 0,
                Testament::New => 1,
            };
            testament_totals[slot] += u64::from(count);
            total = total.saturating_add(count);
        }

        if let Some(i) = window.iter().position(|&d| d == entry.date()) {
            daily[i] = daily[i].saturating_add(total);
        }
    }

    StatsSnapshot {
        book_stats: book_stats,
        ot_progress: testament_totals[0] as f64 / f64::from(Testament::Old.chapters()),
        nt_progress: testament_totals[1] as f64 / f64::from(Testament::New.chapters()),
        trend: window
            .into_iter()
            .zip(daily)
            .map(|(date, chapters)| TrendPoint {
                date: date,
                label: date.format("%m/%d").to_string(),
                chapters: chapters,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::{Locale, SECTIONS};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn done(day: &str, scripture: &str) -> Entry {
        let mut e = Entry::new(1, date(day), scripture, "t");
        e.set_completed(true);
        e
    }

    fn volume(scripture: &str) -> Vec<(&'static str, u32)> {
        parse_volume(scripture, &Canon::default()).into_iter().map(|(b, n)| (b.id(), n)).collect()
    }

    #[test]
    fn volume_rules() {
        assert_eq!(volume("Genesis 1-3"), vec![("Gen", 3)]);
        assert_eq!(volume("Genesis 1, Genesis 2"), vec![("Gen", 2)]);
        assert_eq!(volume("Exodus 4"), vec![("Exo", 1)]);
        assert_eq!(volume("Ruth"), vec![("Rut", 4)]);
        assert_eq!(volume("Ruth three"), vec![]);
        assert_eq!(volume("Genesis 5-2"), vec![]);
        assert_eq!(volume("nothing here"), vec![]);
    }

    #[test]
    fn volume_overcounts_contained_names() {
        assert_eq!(volume("1 John 2"), vec![("Joh", 1), ("1Jo", 1)]);
    }

    #[test]
    fn volume_in_chinese() {
        let canon = Canon::new(Locale::TraditionalChinese);
        let v: Vec<(&str, u32)> = parse_volume("詩篇 1-3", &canon).into_iter().map(|(b, n)| (b.id(), n)).collect();
        assert_eq!(v, vec![("Psa", 3)]);
    }

    #[test]
    fn aggregates_completed_entries() {
        let today = date("2025-06-30");
        let mut skipped = Entry::new(1, today, "Mark 1", "t");
        skipped.set_completed(false);
        let entries = vec![done("2025-06-30", "Genesis 1-3"), done("2024-01-01", "Mark 1"), skipped];

        let stats = aggregate(&entries, &Canon::default(), today);
        assert_eq!(stats.book_stats["Gen"], 3);
        assert_eq!(stats.book_stats["Mar"], 1);
        assert_eq!(stats.book_stats["Rev"], 0);
        assert_eq!(stats.book_stats.len(), 66);
        assert!((stats.ot_progress - 3.0 / 929.0).abs() < 1e-12);
        assert!((stats.nt_progress - 1.0 / 260.0).abs() < 1e-12);

        assert_eq!(stats.trend.len(), 30);
        assert_eq!(stats.trend[0].date, date("2025-06-01"));
        assert_eq!(stats.trend[29].label, "06/30");
        assert_eq!(stats.trend[29].chapters, 3);
        assert_eq!(stats.trend_total(), 3);
    }

    #[test]
    fn aggregation_is_additive() {
        let canon = Canon::default();
        let today = date("2025-06-30");
        let a = vec![done("2025-06-29", "Psalms 1, Psalms 2"), done("2025-06-01", "Ruth")];
        let b = vec![done("2025-06-29", "Psalms 3-5"), done("2025-05-01", "Jude 1")];

        let sa = aggregate(&a, &canon, today);
        let sb = aggregate(&b, &canon, today);
        let union: Vec<Entry> = a.iter().chain(b.iter()).cloned().collect();
        let su = aggregate(&union, &canon, today);

        for book in canon.books() {
            assert_eq!(su.read(book), sa.read(book) + sb.read(book));
        }
        assert_eq!(su.trend_total(), sa.trend_total() + sb.trend_total());
    }

    #[test]
    fn huge_ranges_saturate() {
        let entries = vec![done("2025-01-01", "Genesis 1-4000000000"), done("2025-01-01", "Genesis 1-4000000000")];
        let stats = aggregate(&entries, &Canon::default(), date("2025-01-01"));
        assert_eq!(stats.book_stats["Gen"], u32::MAX);
        assert_eq!(stats.trend_total(), u32::MAX);

        let spread = vec![done("2025-01-01", "Genesis 1-4000000000"), done("2025-01-02", "Exodus 1-4000000000")];
        assert_eq!(aggregate(&spread, &Canon::default(), date("2025-01-02")).trend_total(), u32::MAX);
        assert!(stats.ot_progress > 1.0);
    }

    #[test]
    fn heat_and_sections() {
        let canon = Canon::default();
        let entries = vec![done("2025-01-01", "Ruth"), done("2025-01-02", "Ruth"), done("2025-01-03", "Jonah 1")];
        let stats = aggregate(&entries, &canon, date("2025-01-03"));
        let ruth = canon.find("Ruth").unwrap();
        let jonah = canon.find("Jonah").unwrap();
        assert_eq!(stats.times_read(ruth), 2.0);
        assert_eq!(stats.heat(ruth), HeatTier::Twice);
        assert_eq!(stats.heat(jonah), HeatTier::Partial);
        assert_eq!(stats.heat(canon.find("Genesis").unwrap()), HeatTier::Unread);

        let history = &SECTIONS[1];
        let progress = stats.section_progress(history);
        assert_eq!(progress.completed, 4);
        assert_eq!(progress.total, history.books().iter().map(|b| b.chapters()).sum::<u32>());
    }
}
