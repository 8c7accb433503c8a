//! The day-pacing scheduler.
//!
//! Each `Track` is an ordered selection of books read at a fixed number
//! of chapters per day. Generation walks every chapter of every selected
//! book in order and cuts the stream into daily readings of `pace`
//! chapters; a final shorter reading holds whatever is left over. Tracks
//! are scheduled independently, each with its own day counter starting
//! at 1 on the start date.

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::canon::{Book, Canon};
use crate::errors::*;
use crate::plan::Entry;

/// A named reading line: books in reading order and a daily pace.
#[derive(Debug, Clone)]
pub struct Track {
    name: String,
    books: Vec<&'static Book>,
    pace: u32,
}

impl Track {
    /// Creates a track, rejecting empty selections and paces below one.
    pub fn new(name: &str, books: Vec<&'static Book>, pace: i64) -> Result<Track> {
        if books.is_empty() {
            return Err(ErrorKind::EmptyTrack(name.into()).into());
        }
        if pace < 1 || pace > i64::from(u32::MAX) {
            return Err(ErrorKind::InvalidPace(name.into(), pace).into());
        }
        Ok(Track {
            name: name.to_owned(),
            books: books,
            pace: pace as u32,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn books(&self) -> &[&'static Book] {
        &self.books
    }

    /// Chapters per day.
    pub fn pace(&self) -> u32 {
        self.pace
    }

    /// Total chapters across all selected books.
    pub fn total_chapters(&self) -> u32 {
        self.books.iter().map(|b| b.chapters()).sum()
    }

    /// Number of daily readings the track will produce.
    pub fn day_count(&self) -> u32 {
        let total = self.total_chapters();
        total / self.pace + if total % self.pace == 0 { 0 } else { 1 }
    }
}

/// The readings generated for one track.
#[derive(Debug, Clone)]
pub struct TrackSchedule {
    pub theme: String,
    pub entries: Vec<Entry>,
}

/// Scheduling state threaded through the chapter stream of one track.
struct Cursor {
    day: u32,
    date: NaiveDate,
    buffer: Vec<String>,
    entries: Vec<Entry>,
}

impl Cursor {
    fn new(start: NaiveDate) -> Cursor {
        Cursor {
            day: 1,
            date: start,
            buffer: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Emits the buffered references as one day's reading and advances
    /// to the next day.
    fn flush(&mut self, theme: &str) {
        let scripture = self.buffer.join(", ");
        self.buffer.clear();
        self.entries.push(Entry::new(self.day, self.date, &scripture, theme));
        self.day += 1;
        self.date = self.date.succ_opt().unwrap_or(self.date);
    }

    fn finish(mut self, theme: &str) -> Vec<Entry> {
        if !self.buffer.is_empty() {
            self.flush(theme);
        }
        self.entries
    }
}

fn schedule_track(canon: &Canon, start: NaiveDate, track: &Track) -> Vec<Entry> {
    let pace = track.pace as usize;
    track
        .books
        .iter()
        .flat_map(|&book| (1..=book.chapters()).map(move |ch| format!("{} {}", canon.name(book), ch)))
        .fold(Cursor::new(start), |mut cursor, reference| {
            cursor.buffer.push(reference);
            if cursor.buffer.len() == pace {
                cursor.flush(&track.name);
            }
            cursor
        })
        .finish(&track.name)
}

/// Generates the readings for every track, starting on `start`.
///
/// Either every track is scheduled or, if any track's readings would run
/// past the last representable date, none are.
pub fn generate(canon: &Canon, start: NaiveDate, tracks: &[Track]) -> Result<Vec<TrackSchedule>> {
    for track in tracks {
        if start.checked_add_days(Days::new(u64::from(track.day_count()))).is_none() {
            return Err(ErrorKind::InvalidDate(format!("{} + {} days", start, track.day_count())).into());
        }
    }

    Ok(tracks
        .iter()
        .map(|track| {
            let entries = schedule_track(canon, start, track);
            debug!(
                track = track.name(),
                pace = track.pace(),
                chapters = track.total_chapters(),
                days = entries.len(),
                "scheduled track"
            );
            TrackSchedule {
                theme: track.name.clone(),
                entries: entries,
            }
        })
        .collect())
}

/// Spreads already known readings over the days from `start` to `end`
/// inclusive, assigning them round-robin: reading `i` lands on day
/// `i % days + 1`.
pub fn catch_up<S: AsRef<str>>(scriptures: &[S], start: NaiveDate, end: NaiveDate, theme: &str) -> Result<Vec<Entry>> {
    if end < start {
        return Err(ErrorKind::InvalidWindow(start.to_string(), end.to_string()).into());
    }
    let days = (end - start).num_days() as u64 + 1;

    Ok(scriptures
        .iter()
        .enumerate()
        .map(|(i, scripture)| {
            let slot = i as u64 % days;
            let date = start.checked_add_days(Days::new(slot)).unwrap_or(end);
            Entry::new(slot as u32 + 1, date, scripture.as_ref(), theme)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::scripture::split_references;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn track(selection: &str, pace: i64) -> Track {
        let canon = Canon::default();
        Track::new(selection, canon.parse_selection(selection).unwrap(), pace).unwrap()
    }

    #[test]
    fn paces_ruth_over_two_days() {
        let schedules = generate(&Canon::default(), date("2025-01-01"), &[track("Ruth", 2)]).unwrap();
        let entries = &schedules[0].entries;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].day(), 1);
        assert_eq!(entries[0].date(), date("2025-01-01"));
        assert_eq!(entries[0].scripture(), "Ruth 1, Ruth 2");
        assert_eq!(entries[1].day(), 2);
        assert_eq!(entries[1].date(), date("2025-01-02"));
        assert_eq!(entries[1].scripture(), "Ruth 3, Ruth 4");
        assert!(entries.iter().all(|e| !e.is_completed() && e.theme() == "Ruth"));
    }

    #[test]
    fn keeps_leftover_day_short() {
        let t = track("Jonah, Obadiah", 3);
        assert_eq!(t.day_count(), 2);
        let schedules = generate(&Canon::default(), date("2025-03-10"), &[t]).unwrap();
        let scriptures: Vec<&str> = schedules[0].entries.iter().map(|e| e.scripture()).collect();
        assert_eq!(scriptures, vec!["Jonah 1, Jonah 2, Jonah 3", "Jonah 4, Obadiah 1"]);
    }

    #[test]
    fn partitions_every_chapter_once() {
        let canon = Canon::default();
        for &pace in &[1, 2, 7, 13, 200] {
            let t = track("Mark, Genesis, Jude, Psalms", pace);
            let schedules = generate(&canon, date("2024-02-27"), &[t.clone()]).unwrap();
            let entries = &schedules[0].entries;

            let scheduled: Vec<String> = entries
                .iter()
                .flat_map(|e| split_references(e.scripture()).into_iter().map(String::from).collect::<Vec<_>>())
                .collect();
            let expected: Vec<String> = t
                .books()
                .iter()
                .flat_map(|b| (1..=b.chapters()).map(move |ch| format!("{} {}", canon.name(b), ch)))
                .collect();
            assert_eq!(scheduled, expected);
            assert_eq!(entries.len() as u32, t.day_count());

            for (i, e) in entries.iter().enumerate() {
                assert_eq!(e.day(), i as u32 + 1);
                assert_eq!(e.date(), date("2024-02-27") + chrono::Duration::days(i as i64));
                let n = e.references().len() as u32;
                if i + 1 < entries.len() {
                    assert_eq!(n, pace as u32);
                } else {
                    assert!(n >= 1 && n <= pace as u32);
                }
            }
        }
    }

    #[test]
    fn tracks_are_independent() {
        let canon = Canon::default();
        let gospels = Track::new("Gospels", canon.parse_selection("Mat, Mar, Luk, Joh").unwrap(), 1).unwrap();
        let schedules = generate(&canon, date("2025-01-01"), &[track("OT", 3), gospels]).unwrap();
        assert_eq!(schedules.len(), 2);
        assert_eq!(schedules[0].entries.len(), 310);
        assert_eq!(schedules[0].entries[0].scripture(), "Genesis 1, Genesis 2, Genesis 3");
        assert_eq!(schedules[1].entries[0].day(), 1);
        assert_eq!(schedules[1].entries[0].date(), date("2025-01-01"));
        assert_eq!(schedules[1].entries[0].scripture(), "Matthew 1");
        assert_eq!(schedules[1].entries.len(), 89);
        assert_eq!(schedules[1].theme, "Gospels");
    }

    #[test]
    fn rejects_invalid_tracks() {
        match Track::new("Empty", Vec::new(), 1) {
            Err(Error(ErrorKind::EmptyTrack(name), _)) => assert_eq!(name, "Empty"),
            other => panic!("unexpected: {:?}", other),
        }
        let books = Canon::default().parse_selection("Ruth").unwrap();
        match Track::new("Slow", books, 0) {
            Err(Error(ErrorKind::InvalidPace(_, pace), _)) => assert_eq!(pace, 0),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn catch_up_round_robin() {
        let overdue = vec!["Genesis 1", "Genesis 2", "Genesis 3", "Mark 1", "Mark 2"];
        let entries = catch_up(&overdue, date("2025-05-01"), date("2025-05-02"), "Catch-up 04/30").unwrap();
        let placed: Vec<(u32, NaiveDate, &str)> = entries.iter().map(|e| (e.day(), e.date(), e.scripture())).collect();
        assert_eq!(
            placed,
            vec![
                (1, date("2025-05-01"), "Genesis 1"),
                (2, date("2025-05-02"), "Genesis 2"),
                (1, date("2025-05-01"), "Genesis 3"),
                (2, date("2025-05-02"), "Mark 1"),
                (1, date("2025-05-01"), "Mark 2"),
            ]
        );
        assert!(entries.iter().all(|e| e.theme() == "Catch-up 04/30"));
    }

    #[test]
    fn catch_up_rejects_reversed_window() {
        let result = catch_up(&["Ruth 1"], date("2025-05-02"), date("2025-05-01"), "x");
        match result {
            Err(Error(ErrorKind::InvalidWindow(..), _)) => {}
            other => panic!("unexpected: {:?}", other),
        }
        assert!(catch_up::<&str>(&[], date("2025-05-01"), date("2025-05-01"), "x").unwrap().is_empty());
    }
}
