//! Personal scripture reading schedules: generating day-by-day plans from
//! a selection of books and a daily pace, tracking completion, and
//! summarizing progress.

// For `error_chain!`
#![recursion_limit = "1024"]

#[macro_use]
extern crate error_chain;

pub mod errors {
    error_chain! {
        errors {
            /// The user's data directory could not be found or deduced.
            CannotLocateConfig {
                description("cannot locate config directory")
            }
            /// The data directory does not exist (has not been created yet).
            NoConfigDirectory {
                description("config directory does not exist")
            }
            /// The specified plan does not exist (includes the name of the plan).
            PlanDoesNotExist(name: String) {
                description("plan does not exist")
                display("plan '{}' does not exist", name)
            }
            /// The specified plan already exists (includes the name of the plan).
            PlanAlreadyExists(name: String) {
                description("plan already exists")
                display("plan '{}' already exists", name)
            }
            /// Another plan is already stored under the file the name maps to.
            PlanNameConflict(name: String, existing: String) {
                description("plan name conflicts with a stored plan")
                display("plan '{}' would be stored in the same file as plan '{}'", name, existing)
            }
            /// No entry of a plan matches the given day.
            NoSuchEntry(t: String) {
                description("no such entry")
                display("no reading for {}", t)
            }
            /// Several entries of a plan share the given day.
            AmbiguousEntry(day: u32, count: usize) {
                description("ambiguous entry")
                display("day {} has {} readings to choose from", day, count)
            }
            /// Indicates an error in UTF8 format (probably a filename).
            Utf8(t: String) {
                description("utf8 error")
                display("utf8 error: {}", t)
            }
            /// An error in the tabular plan text format.
            TextFormat(t: String) {
                description("text format error")
                display("text format error: {}", t)
            }
            /// An IO error (usually caused by `std::io::Error`).
            Io(t: String) {
                description("io error")
                display("{}", t)
            }
            /// A JSON error (usually caused by `serde_json::Error`).
            Json(t: String) {
                description("json error")
                display("{}", t)
            }
            /// The configuration file could not be read or parsed.
            Config(t: String) {
                description("config error")
                display("config error: {}", t)
            }
            /// A track was submitted without any books selected.
            EmptyTrack(name: String) {
                description("track has no books selected")
                display("track '{}' has no books selected", name)
            }
            /// A track was submitted with a pace below one chapter per day.
            InvalidPace(name: String, pace: i64) {
                description("invalid pace")
                display("track '{}' has invalid pace {} (must be at least 1)", name, pace)
            }
            /// A catch-up window whose end lies before its start.
            InvalidWindow(start: String, end: String) {
                description("invalid date window")
                display("end date {} is earlier than start date {}", end, start)
            }
            /// A book name or id that is not part of the canon.
            UnknownBook(name: String) {
                description("unknown book")
                display("unknown book '{}'", name)
            }
            /// A date argument that could not be parsed.
            InvalidDate(t: String) {
                description("invalid date")
                display("invalid date '{}' (expected YYYY-MM-DD)", t)
            }
        }
    }
}

pub use crate::errors::*;

pub mod canon;
pub mod config;
pub mod files;
pub mod link;
pub mod logging;
pub mod plan;
pub mod schedule;
pub mod scripture;
pub mod stats;

pub use crate::canon::{Book, Canon, Locale, Testament};
pub use crate::plan::{Entry, Plan};
pub use crate::schedule::Track;
pub use crate::scripture::DisplayGroup;
pub use crate::stats::StatsSnapshot;
