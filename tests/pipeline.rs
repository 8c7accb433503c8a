//! End-to-end use of the library: generating a plan, storing it, reading
//! through it, catching up and summarizing.

extern crate chrono;
extern crate scripture_flow;
extern crate tempfile;

use chrono::NaiveDate;

use scripture_flow::files::Store;
use scripture_flow::plan::DayStatus;
use scripture_flow::{schedule, stats, Canon, Plan, Track};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn ruth_plan(canon: &Canon) -> Plan {
    let track = Track::new("Ruth", canon.parse_selection("Rut").unwrap(), 2).unwrap();
    let schedules = schedule::generate(canon, date("2025-01-01"), &[track]).unwrap();
    Plan::from_schedules("Ruth", date("2025-01-01"), schedules)
}

#[test]
fn generate_store_read_and_summarize() {
    let canon = Canon::default();
    let tmp = tempfile::tempdir().unwrap();
    let store = Store::at(tmp.path().join("plans"));

    let mut plan = ruth_plan(&canon);
    assert_eq!(plan.len(), 2);
    store.add_plan(&plan).unwrap();
    assert_eq!(store.read_plan("Ruth").unwrap(), plan);

    // Read the first day, leave the second behind
    assert_eq!(plan.mark_all_done(date("2025-01-01")), 1);
    assert_eq!(plan.day_status(date("2025-01-01")), DayStatus::Completed);
    assert_eq!(plan.day_status(date("2025-01-02")), DayStatus::Pending);
    store.overwrite_plan(&plan).unwrap();

    let overdue = plan.overdue_on(date("2025-01-02"));
    let catch_up = Plan::catch_up(date("2025-01-02"), &overdue, date("2025-01-03"), date("2025-01-04")).unwrap();
    assert!(catch_up.is_catch_up());
    assert_eq!(catch_up.name(), "Catch-up (01/02)");
    assert_eq!(catch_up.len(), 1);
    let moved = catch_up.entries().next().unwrap();
    assert_eq!(moved.scripture(), "Ruth 3, Ruth 4");
    assert_eq!(moved.date(), date("2025-01-03"));
    assert_eq!(moved.theme(), "Catch-up 01/02");
    store.add_plan(&catch_up).unwrap();

    let plans = store.all_plans().unwrap();
    assert_eq!(plans.len(), 2);

    let snapshot = stats::aggregate(plans.iter().flat_map(|p| p.entries()), &canon, date("2025-01-02"));
    let ruth = canon.find("Ruth").unwrap();
    assert_eq!(snapshot.read(ruth), 2);
    assert_eq!(snapshot.times_read(ruth), 0.5);
    assert_eq!(snapshot.trend_total(), 2);
    assert_eq!(snapshot.trend[28].label, "01/01");
    assert_eq!(snapshot.trend[28].chapters, 2);
}

#[test]
fn text_export_and_import() {
    let canon = Canon::default();
    let plan = ruth_plan(&canon);

    let mut out = Vec::new();
    plan.to_text(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Day\tDate\tScripture\tTheme\n"));

    let back = Plan::from_text("Copy", text.as_bytes(), date("2030-01-01")).unwrap();
    assert_eq!(back.name(), "Copy");
    assert_eq!(back.start_date(), date("2025-01-01"));
    let pairs: Vec<(u32, &str, &str)> = back.entries().map(|e| (e.day(), e.scripture(), e.theme())).collect();
    assert_eq!(pairs, vec![(1, "Ruth 1, Ruth 2", "Ruth"), (2, "Ruth 3, Ruth 4", "Ruth")]);
}

#[test]
fn imports_spreadsheet_rows() {
    let text = "1\t45658\tPsalms 1~3\n2|not a date|Proverbs 1\n";
    let plan = Plan::from_text("Wisdom", text.as_bytes(), date("2025-03-01")).unwrap();
    let entries: Vec<_> = plan.entries().collect();

    assert_eq!(entries[0].date(), date("2025-01-01"));
    assert_eq!(entries[0].scripture(), "Psalms 1, Psalms 2, Psalms 3");
    assert_eq!(entries[0].theme(), "Wisdom");
    assert_eq!(entries[0].title(), "Psalms 1~3");
    assert_eq!(entries[1].day(), 2);
    assert_eq!(entries[1].date(), date("2025-03-01"));
}
