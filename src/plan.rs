//! This module provides the `Plan` and `Entry` types, the persisted form of
//! a reading schedule, along with completion tracking and the tabular text
//! format plans can be imported from and exported to (via `from_text` and
//! `to_text`).

use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::slice;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::*;
use crate::schedule::{self, TrackSchedule};
use crate::scripture::{self, DisplayGroup};

/// A single day's reading within one track of a plan.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Entry {
    /// 1-based day number within the entry's track.
    day: u32,
    date: NaiveDate,
    /// Comma separated canonical references.
    scripture: String,
    /// The name of the track the entry belongs to.
    theme: String,
    #[serde(default, rename = "is_completed")]
    completed: bool,
    /// References individually marked as read.
    #[serde(default)]
    completed_chapters: Vec<String>,
}

impl Entry {
    /// Returns a new, uncompleted entry.
    pub fn new(day: u32, date: NaiveDate, scripture: &str, theme: &str) -> Entry {
        Entry {
            day: day,
            date: date,
            scripture: scripture.into(),
            theme: theme.into(),
            completed: false,
            completed_chapters: Vec::new(),
        }
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn scripture(&self) -> &str {
        &self.scripture
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn completed_chapters(&self) -> &[String] {
        &self.completed_chapters
    }

    /// The individual references making up the reading.
    pub fn references(&self) -> Vec<&str> {
        scripture::split_references(&self.scripture)
    }

    /// The reading collapsed into display groups.
    pub fn groups(&self) -> Vec<DisplayGroup> {
        scripture::group_references(&self.scripture)
    }

    /// A compact one-line title for the reading.
    pub fn title(&self) -> String {
        scripture::smart_title(&self.scripture)
    }

    /// Marks the entry completed (every reference read) or not (none read).
    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
        self.completed_chapters = if completed {
            self.references().into_iter().map(String::from).collect()
        } else {
            Vec::new()
        };
    }

    /// Flips the completion state, returning the new state.
    pub fn toggle_completed(&mut self) -> bool {
        let completed = !self.completed;
        self.set_completed(completed);
        completed
    }

    /// Flips whether a single reference has been read, returning whether it
    /// is now marked. This does not change the entry's overall completion.
    pub fn toggle_chapter(&mut self, reference: &str) -> bool {
        let reference = reference.trim();
        match self.completed_chapters.iter().position(|c| c == reference) {
            Some(i) => {
                self.completed_chapters.remove(i);
                false
            }
            None => {
                self.completed_chapters.push(reference.to_owned());
                true
            }
        }
    }

    /// `(read, total)` counts of the entry's references.
    pub fn chapter_progress(&self) -> (usize, usize) {
        (self.completed_chapters.len(), self.references().len())
    }
}

/// How the readings scheduled on a given date stand.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    /// Nothing is scheduled.
    Empty,
    Completed,
    Pending,
}

/// Completed versus total entries.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    /// Rounded; 0 for an empty set of entries.
    pub percentage: u32,
}

impl Progress {
    pub fn of<'a, I: IntoIterator<Item = &'a Entry>>(entries: I) -> Progress {
        let (completed, total) = entries.into_iter().fold((0, 0), |(c, t), e| (c + e.is_completed() as usize, t + 1));
        let percentage = if total == 0 {
            0
        } else {
            (completed as f64 * 100.0 / total as f64).round() as u32
        };
        Progress {
            completed: completed,
            total: total,
            percentage: percentage,
        }
    }
}

/// A date cell from a spreadsheet row.
#[derive(Debug, Clone, PartialEq)]
pub enum DateCell {
    /// Spreadsheet serial day number (days since 1899-12-30).
    Serial(f64),
    Text(String),
}

impl DateCell {
    /// Resolves the cell to a date, falling back to `today` when it cannot
    /// be interpreted.
    pub fn resolve(&self, today: NaiveDate) -> NaiveDate {
        let resolved = match *self {
            DateCell::Serial(serial) => from_serial(serial),
            DateCell::Text(ref text) => {
                let text = text.trim();
                match text.parse::<f64>() {
                    Ok(serial) => from_serial(serial),
                    Err(_) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                        .or_else(|_| NaiveDate::parse_from_str(text, "%Y/%m/%d"))
                        .ok(),
                }
            }
        };
        resolved.unwrap_or_else(|| {
            warn!(cell = ?self, "could not parse date, using {}", today);
            today
        })
    }
}

fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(Days::new(serial.floor() as u64))
}

/// One already-parsed row of tabular import input.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub day: Option<u32>,
    pub date: Option<DateCell>,
    pub scripture: String,
    pub theme: Option<String>,
}

impl ImportRow {
    fn into_entry(self, default_theme: &str, today: NaiveDate) -> Entry {
        let date = self.date.map_or(today, |d| d.resolve(today));
        let theme = self.theme.filter(|t| !t.trim().is_empty());
        Entry::new(
            self.day.unwrap_or(1),
            date,
            &scripture::expand_ranges(&self.scripture),
            theme.as_ref().map_or(default_theme, |t| t.trim()),
        )
    }
}

/// Column positions in tabular text input.
struct Columns {
    day: Option<usize>,
    date: Option<usize>,
    scripture: usize,
    theme: Option<usize>,
}

impl Columns {
    /// `Day`, `Date`, `Scripture`, `Theme`, in that order.
    fn positional() -> Columns {
        Columns {
            day: Some(0),
            date: Some(1),
            scripture: 2,
            theme: Some(3),
        }
    }

    /// Recognizes a header line, returning its column layout.
    fn from_header(cells: &[&str]) -> Option<Columns> {
        let find = |names: &[&str]| cells.iter().position(|c| names.iter().any(|n| c.eq_ignore_ascii_case(n)));
        let scripture = find(&["scripture", "經文"])?;
        Some(Columns {
            day: find(&["day"]),
            date: find(&["date"]),
            scripture: scripture,
            theme: find(&["theme"]),
        })
    }

    fn row(&self, cells: &[&str]) -> ImportRow {
        let cell = |i: Option<usize>| i.and_then(|i| cells.get(i)).map(|c| c.trim()).filter(|c| !c.is_empty());
        ImportRow {
            day: cell(self.day).and_then(|d| d.parse().ok()),
            date: cell(self.date).map(|d| match d.parse::<f64>() {
                Ok(serial) => DateCell::Serial(serial),
                Err(_) => DateCell::Text(d.to_owned()),
            }),
            scripture: cell(Some(self.scripture)).unwrap_or("").to_owned(),
            theme: cell(self.theme).map(String::from),
        }
    }
}

fn split_cells(line: &str) -> Vec<&str> {
    if line.contains('\t') {
        line.split('\t').map(str::trim).collect()
    } else {
        line.split('|').map(str::trim).collect()
    }
}

/// A reading plan: a named set of entries across one or more tracks.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Plan {
    name: String,
    start_date: NaiveDate,
    /// Whether the plan was created to catch up on overdue readings.
    #[serde(default)]
    catch_up: bool,
    entries: Vec<Entry>,
}

impl Plan {
    /// Constructs a plan from a list of entries.
    pub fn from_entries(name: &str, start_date: NaiveDate, entries: Vec<Entry>) -> Plan {
        Plan {
            name: name.to_owned(),
            start_date: start_date,
            catch_up: false,
            entries: entries,
        }
    }

    /// Constructs a plan from generated track schedules. Tracks are stored
    /// one after the other, never interleaved.
    pub fn from_schedules(name: &str, start_date: NaiveDate, schedules: Vec<TrackSchedule>) -> Plan {
        let entries = schedules.into_iter().flat_map(|s| s.entries).collect();
        Plan::from_entries(name, start_date, entries)
    }

    /// Builds a catch-up plan spreading the given overdue readings (which
    /// were due on `due`) over `start..=end`.
    pub fn catch_up(due: NaiveDate, overdue: &[&Entry], start: NaiveDate, end: NaiveDate) -> Result<Plan> {
        let label = due.format("%m/%d");
        let scriptures: Vec<&str> = overdue.iter().map(|e| e.scripture()).collect();
        let entries = schedule::catch_up(&scriptures, start, end, &format!("Catch-up {}", label))?;
        let mut plan = Plan::from_entries(&format!("Catch-up ({})", label), start, entries);
        plan.catch_up = true;
        Ok(plan)
    }

    /// Constructs a plan from already-parsed tabular rows. Range shorthand
    /// in the scripture column is expanded, rows without a usable date are
    /// placed on `today`, and rows without a theme take the plan's name.
    pub fn import(name: &str, rows: Vec<ImportRow>, today: NaiveDate) -> Result<Plan> {
        if rows.is_empty() {
            return Err(ErrorKind::TextFormat("cannot construct an empty plan".into()).into());
        }
        let entries: Vec<Entry> = rows.into_iter().map(|r| r.into_entry(name, today)).collect();
        let start = entries.iter().map(Entry::date).min().unwrap_or(today);
        Ok(Plan::from_entries(name, start, entries))
    }

    /// Attempts to construct a plan from tabular plain text input.
    ///
    /// Each non-blank line is a row of tab separated (or, failing that,
    /// `|` separated) cells: day, date, scripture and an optional theme.
    /// A first line naming the columns (`Day`, `Date`, `Scripture`,
    /// `Theme`) may give them in any order. Lines starting with `#` are
    /// ignored.
    pub fn from_text<T: Read>(name: &str, input: T, today: NaiveDate) -> Result<Plan> {
        let r = BufReader::new(input);
        let mut columns: Option<Columns> = None;
        let mut rows = Vec::new();

        for (n, l) in r.lines().enumerate() {
            let l = l.chain_err(|| ErrorKind::Io("could not read line".into()))?;
            let l = l.trim();
            if l.is_empty() || l.starts_with('#') {
                continue;
            }

            let cells = split_cells(l);
            if columns.is_none() {
                if let Some(header) = Columns::from_header(&cells) {
                    columns = Some(header);
                    continue;
                }
            }
            let row = columns.get_or_insert_with(Columns::positional).row(&cells);
            if row.scripture.is_empty() {
                return Err(ErrorKind::TextFormat(format!("row on line {} has no scripture", n + 1)).into());
            }
            rows.push(row);
        }

        Plan::import(name, rows, today)
    }

    /// Writes the plan in the tabular text format documented on `from_text`.
    pub fn to_text<T: Write>(&self, output: T) -> Result<()> {
        let mut w = BufWriter::new(output);

        writeln!(w, "Day\tDate\tScripture\tTheme").chain_err(|| ErrorKind::Io("could not write to text output".into()))?;
        for e in self.entries() {
            writeln!(w, "{}\t{}\t{}\t{}", e.day, e.date, e.scripture, e.theme)
                .chain_err(|| ErrorKind::Io("could not write to text output".into()))?;
        }
        w.flush().chain_err(|| ErrorKind::Io("could not write to text output".into()))
    }

    /// Returns the name of the plan.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn is_catch_up(&self) -> bool {
        self.catch_up
    }

    /// Returns the number of entries in the plan.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over entries in the plan, of type `&Entry`.
    pub fn entries(&self) -> slice::Iter<Entry> {
        self.entries.iter()
    }

    /// The distinct track names, in the order they first appear.
    pub fn themes(&self) -> Vec<&str> {
        let mut themes: Vec<&str> = Vec::new();
        for e in self.entries() {
            if !themes.contains(&e.theme()) {
                themes.push(e.theme());
            }
        }
        themes
    }

    /// Finds the entry for a given day, optionally restricted to one track.
    ///
    /// Several entries can share a day (catch-up plans wrap around their
    /// window, imported rows without a day all land on day 1). `nth` picks
    /// one of them, counting from 1 in plan order; without it, more than
    /// one match is an `AmbiguousEntry` error.
    pub fn entry_mut(&mut self, theme: Option<&str>, day: u32, nth: Option<usize>) -> Result<&mut Entry> {
        let matches: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|&(_, e)| e.day == day && theme.map_or(true, |t| e.theme == t))
            .map(|(i, _)| i)
            .collect();

        let index = match (nth, matches.len()) {
            (_, 0) => return Err(ErrorKind::NoSuchEntry(format!("day {}", day)).into()),
            (None, 1) => matches[0],
            (None, count) => return Err(ErrorKind::AmbiguousEntry(day, count).into()),
            (Some(n), _) => match n.checked_sub(1).and_then(|i| matches.get(i)) {
                Some(&i) => i,
                None => return Err(ErrorKind::NoSuchEntry(format!("day {} #{}", day, n)).into()),
            },
        };
        Ok(&mut self.entries[index])
    }

    /// The entries scheduled on a date.
    pub fn entries_on(&self, date: NaiveDate) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(move |e| e.date == date)
    }

    /// The uncompleted entries scheduled on a date.
    pub fn overdue_on(&self, date: NaiveDate) -> Vec<&Entry> {
        self.entries_on(date).filter(|e| !e.completed).collect()
    }

    pub fn day_status(&self, date: NaiveDate) -> DayStatus {
        day_status(self.entries_on(date))
    }

    /// Marks every entry on a date completed, returning how many changed.
    pub fn mark_all_done(&mut self, date: NaiveDate) -> usize {
        let mut changed = 0;
        for e in self.entries.iter_mut().filter(|e| e.date == date && !e.completed) {
            e.set_completed(true);
            changed += 1;
        }
        changed
    }

    pub fn progress(&self) -> Progress {
        Progress::of(self.entries())
    }

    /// Deletes every entry of a track, returning how many were removed.
    pub fn remove_theme(&mut self, theme: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.theme != theme);
        before - self.entries.len()
    }
}

/// The status of a day given all the entries scheduled on it.
pub fn day_status<'a, I: IntoIterator<Item = &'a Entry>>(entries: I) -> DayStatus {
    let mut status = DayStatus::Empty;
    for e in entries {
        if !e.is_completed() {
            return DayStatus::Pending;
        }
        status = DayStatus::Completed;
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> Plan {
        let d = date("2025-01-01");
        let next = date("2025-01-02");
        Plan::from_entries(
            "sample",
            d,
            vec![
                Entry::new(1, d, "Ruth 1, Ruth 2", "OT"),
                Entry::new(1, d, "Mark 1", "NT"),
                Entry::new(2, next, "Ruth 3, Ruth 4", "OT"),
                Entry::new(2, next, "Mark 2", "NT"),
            ],
        )
    }

    #[test]
    fn completion_fills_chapters() {
        let mut e = Entry::new(1, date("2025-01-01"), "Ruth 1, Ruth 2", "OT");
        assert!(e.toggle_completed());
        assert_eq!(e.completed_chapters(), &["Ruth 1".to_owned(), "Ruth 2".to_owned()][..]);
        assert!(!e.toggle_completed());
        assert!(e.completed_chapters().is_empty());
    }

    #[test]
    fn chapter_toggles_leave_completion_alone() {
        let mut e = Entry::new(1, date("2025-01-01"), "Ruth 1, Ruth 2", "OT");
        assert!(e.toggle_chapter("Ruth 2"));
        assert_eq!(e.chapter_progress(), (1, 2));
        assert!(!e.is_completed());
        assert!(!e.toggle_chapter(" Ruth 2 "));
        assert_eq!(e.chapter_progress(), (0, 2));
    }

    #[test]
    fn day_statuses() {
        let mut plan = sample();
        let d = date("2025-01-01");
        assert_eq!(plan.day_status(date("2024-12-31")), DayStatus::Empty);
        assert_eq!(plan.day_status(d), DayStatus::Pending);
        plan.entry_mut(Some("NT"), 1, None).unwrap().set_completed(true);
        assert_eq!(plan.overdue_on(d).len(), 1);
        assert_eq!(plan.mark_all_done(d), 1);
        assert_eq!(plan.mark_all_done(d), 0);
        assert_eq!(plan.day_status(d), DayStatus::Completed);
        assert_eq!(
            plan.progress(),
            Progress {
                completed: 2,
                total: 4,
                percentage: 50,
            }
        );
        assert_eq!(Progress::of(Vec::<Entry>::new().iter()).percentage, 0);
    }

    #[test]
    fn removing_a_track() {
        let mut plan = sample();
        assert_eq!(plan.themes(), vec!["OT", "NT"]);
        assert_eq!(plan.remove_theme("OT"), 2);
        assert_eq!(plan.themes(), vec!["NT"]);
        assert_eq!(plan.remove_theme("OT"), 0);
    }

    #[test]
    fn catch_up_plan() {
        let plan = sample();
        let overdue = plan.overdue_on(date("2025-01-01"));
        let catch_up = Plan::catch_up(date("2025-01-01"), &overdue, date("2025-01-05"), date("2025-01-05")).unwrap();
        assert!(catch_up.is_catch_up());
        assert_eq!(catch_up.name(), "Catch-up (01/01)");
        let entries: Vec<&Entry> = catch_up.entries().collect();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.day() == 1 && e.date() == date("2025-01-05")));
        assert_eq!(entries[0].theme(), "Catch-up 01/01");
    }

    #[test]
    fn serial_dates() {
        let today = date("2000-01-01");
        assert_eq!(DateCell::Serial(45707.0).resolve(today), date("2025-02-19"));
        assert_eq!(DateCell::Serial(45707.75).resolve(today), date("2025-02-19"));
        assert_eq!(DateCell::Text("2026/02/20".into()).resolve(today), date("2026-02-20"));
        assert_eq!(DateCell::Text("someday".into()).resolve(today), today);
    }

    #[test]
    fn reads_tabular_text() {
        let text = "Day\tDate\tScripture\n\
                    1\t2026-02-19\tGenesis 1~2\n\
                    \n\
                    # skipped\n\
                    2\t2026-02-20\tGenesis 3, Matthew 1\n\
                    3\t\tPsalms 1\n";
        let plan = Plan::from_text("import", text.as_bytes(), date("2026-03-01")).unwrap();
        let entries: Vec<&Entry> = plan.entries().collect();
        assert_eq!(plan.start_date(), date("2026-02-19"));
        assert_eq!(entries[0].scripture(), "Genesis 1, Genesis 2");
        assert_eq!(entries[1].day(), 2);
        assert_eq!(entries[2].date(), date("2026-03-01"));
        assert_eq!(entries[2].theme(), "import");
    }

    #[test]
    fn header_may_reorder_columns() {
        let text = "經文 | Date\nRuth 1-4 | 2026-02-19\n";
        let plan = Plan::from_text("x", text.as_bytes(), date("2026-03-01")).unwrap();
        let e = plan.entries().next().unwrap();
        assert_eq!(e.day(), 1);
        assert_eq!(e.date(), date("2026-02-19"));
        assert_eq!(e.scripture(), "Ruth 1, Ruth 2, Ruth 3, Ruth 4");
    }

    #[test]
    fn rejects_bad_text() {
        let today = date("2026-03-01");
        assert!(Plan::from_text("x", "".as_bytes(), today).is_err());
        assert!(Plan::from_text("x", "Day\tDate\tScripture\n".as_bytes(), today).is_err());
        match Plan::from_text("x", "1\t2026-01-01\t\n".as_bytes(), today) {
            Err(Error(ErrorKind::TextFormat(msg), _)) => assert!(msg.contains("line 1")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn catch_up_days_are_addressable() {
        let d = date("2025-01-01");
        let overdue = vec![
            Entry::new(1, d, "Ruth 1", "Ruth"),
            Entry::new(2, d, "Ruth 2", "Ruth"),
            Entry::new(3, d, "Ruth 3", "Ruth"),
        ];
        let refs: Vec<&Entry> = overdue.iter().collect();
        let mut plan = Plan::catch_up(d, &refs, date("2025-01-02"), date("2025-01-03")).unwrap();
        let days: Vec<u32> = plan.entries().map(Entry::day).collect();
        assert_eq!(days, vec![1, 2, 1]);

        match plan.entry_mut(None, 1, None) {
            Err(Error(ErrorKind::AmbiguousEntry(day, count), _)) => assert_eq!((day, count), (1, 2)),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(plan.entry_mut(None, 1, Some(2)).unwrap().toggle_completed());
        let third = plan.entries().nth(2).unwrap();
        assert_eq!(third.scripture(), "Ruth 3");
        assert!(third.is_completed());
        assert!(!plan.entries().next().unwrap().is_completed());

        assert_eq!(plan.entry_mut(None, 2, None).unwrap().scripture(), "Ruth 2");
        match plan.entry_mut(None, 1, Some(3)) {
            Err(Error(ErrorKind::NoSuchEntry(_), _)) => {}
            other => panic!("unexpected: {:?}", other),
        }
        match plan.entry_mut(Some("Other"), 1, None) {
            Err(Error(ErrorKind::NoSuchEntry(_), _)) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn text_round_trip() {
        let plan = sample();
        let mut out = Vec::new();
        plan.to_text(&mut out).unwrap();
        let back = Plan::from_text("sample", &out[..], date("2030-01-01")).unwrap();
        assert_eq!(back, plan);
    }
}
