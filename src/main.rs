extern crate scripture_flow;

extern crate ansi_term;
extern crate chrono;
extern crate clap;
#[macro_use]
extern crate error_chain;
extern crate serde_json;

use std::fs::File;
use std::path::Path;

use ansi_term::{Colour, Style};
use chrono::{Local, NaiveDate};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

use scripture_flow::canon::{Canon, Testament, SECTIONS};
use scripture_flow::config::Config;
use scripture_flow::errors::*;
use scripture_flow::files::Store;
use scripture_flow::plan::{self, DayStatus, Progress};
use scripture_flow::schedule::{self, Track};
use scripture_flow::{logging, stats, Plan};

/// Describes all the styles that can be used in printing text.
/// Mostly just good for disabling custom formatting.
#[derive(Debug, Clone)]
struct StyleSet {
    /// Normal text
    normal: Style,
    /// Title text
    title: Style,
    /// Description (or label) text
    description: Style,
    /// Completed readings
    done: Style,
    /// Error text
    error: Style,
}

impl StyleSet {
    /// Preset for the --no-ansi option (no style)
    fn no_ansi() -> StyleSet {
        StyleSet {
            normal: Style::new(),
            title: Style::new(),
            description: Style::new(),
            done: Style::new(),
            error: Style::new(),
        }
    }

    /// Preset for the normal "fancy" style
    fn fancy() -> StyleSet {
        StyleSet {
            normal: Style::new(),
            title: Colour::White.bold(),
            description: Style::new().italic(),
            done: Colour::Green.normal(),
            error: Colour::Red.normal(),
        }
    }
}

/// Returns styled text (using a format string syntax)
macro_rules! style {
    ($style:expr, $($arg:tt)*) => {
        {{
            $style.paint(format!( $($arg)*) )
        }}
    }
}

/// Prints a line of text in the given style
macro_rules! styleln {
    ($style:expr, $($arg:tt)*) => {
        println!("{}", style!($style, $($arg)*))
    }
}

/// Everything a subcommand needs besides its arguments.
struct Context {
    style: StyleSet,
    config: Config,
    canon: Canon,
    store: Store,
}

fn date_arg(name: &'static str, help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(name)
        .long(name)
        .value_name("DATE")
        .help(help)
        .takes_value(true)
}

fn plan_arg(help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name("PLAN").help(help).required(true)
}

fn nth_arg() -> Arg<'static, 'static> {
    Arg::with_name("nth")
        .short("N")
        .long("nth")
        .value_name("N")
        .help("Which of several readings on the same day, counting from 1")
        .takes_value(true)
}

fn theme_arg() -> Arg<'static, 'static> {
    Arg::with_name("theme")
        .short("t")
        .long("theme")
        .value_name("TRACK")
        .help("The track the day belongs to (needed when the plan has several)")
        .takes_value(true)
}

pub fn main() {
    let matches = App::new("scripture-flow")
        .version("0.1.0")
        .author("Ian Johnson <ianprime0509@gmail.com>")
        .about("A personal scripture reading schedule manager")
        .setting(AppSettings::ColoredHelp)
        .arg(Arg::with_name("no-ansi")
            .help("Disables fancy text output")
            .short("n")
            .long("no-ansi"))
        .arg(Arg::with_name("verbose")
            .help("Logs what the program is doing to stderr")
            .short("v")
            .long("verbose"))
        .subcommand(SubCommand::with_name("generate")
            .about("Generates a reading plan from books and a daily pace")
            .arg(Arg::with_name("NAME")
                .help("The name of the new plan")
                .required(true))
            .arg(date_arg("start", "The first day of the plan (default: today)"))
            .arg(Arg::with_name("track")
                .short("t")
                .long("track")
                .value_name("NAME:BOOKS[:PACE]")
                .help("Adds a reading track; may be given several times")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1))
            .arg(Arg::with_name("books")
                .short("b")
                .long("books")
                .value_name("BOOKS")
                .help("Books for a single track: OT, NT, ALL or a comma separated list")
                .takes_value(true)
                .conflicts_with("track")
                .required_unless("track"))
            .arg(Arg::with_name("pace")
                .short("p")
                .long("pace")
                .value_name("PACE")
                .help("Chapters per day for --books")
                .takes_value(true))
            .after_help("Each track is scheduled on its own, starting at day 1 on the start date. \
                         Books are read in the order given, and each day gets PACE chapters; the \
                         last day of a track holds whatever is left over. For example: \
                         `scripture-flow generate Year -t 'Law:Gen,Exo,Lev,Num,Deu:3' -t 'Gospels:Mat,Mar,Luk,Joh'`"))
        .subcommand(SubCommand::with_name("import")
            .about("Imports a reading plan from a tabular text file")
            .arg(Arg::with_name("FILENAME")
                .help("The filename of the plan to import")
                .required(true))
            .arg(Arg::with_name("name")
                .short("n")
                .long("name")
                .value_name("NAME")
                .help("The name of the plan after importing")
                .takes_value(true))
            .after_help("The expected input format has one reading per line, with tab (or '|') \
                         separated columns: day, date and scripture, optionally followed by a \
                         track name. A header line naming the columns may reorder them. Dates may \
                         be written as YYYY-MM-DD or as spreadsheet serial numbers, and ranges such \
                         as 'Psalms 1~3' are expanded. If no name is provided for the plan, the \
                         filename (without the extension) will be used as the name."))
        .subcommand(SubCommand::with_name("export")
            .about("Exports a reading plan to a tabular text file")
            .arg(plan_arg("The name of the plan to export"))
            .arg(Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("OUTPUT")
                .help("The output filename")
                .takes_value(true))
            .after_help("If no output filename is specified, the filename will be '(name of \
                         plan) + .plan'."))
        .subcommand(SubCommand::with_name("list").about("Lists all reading plans and their progress"))
        .subcommand(SubCommand::with_name("today")
            .about("Shows the readings scheduled for a day across all plans")
            .arg(date_arg("date", "The day to show (default: today)"))
            .arg(Arg::with_name("links")
                .short("l")
                .long("links")
                .help("Shows a link for each group of chapters")))
        .subcommand(SubCommand::with_name("check")
            .about("Marks a day of a plan as read, or unread if it already is")
            .arg(plan_arg("The plan to change"))
            .arg(Arg::with_name("DAY").help("The day number").required(true))
            .arg(theme_arg())
            .arg(nth_arg()))
        .subcommand(SubCommand::with_name("chapter")
            .about("Marks a single chapter of a day as read, or unread if it already is")
            .arg(plan_arg("The plan to change"))
            .arg(Arg::with_name("DAY").help("The day number").required(true))
            .arg(Arg::with_name("REFERENCE")
                .help("The chapter, e.g. 'Genesis 3'")
                .required(true))
            .arg(theme_arg())
            .arg(nth_arg()))
        .subcommand(SubCommand::with_name("done")
            .about("Marks every reading scheduled for a day as read")
            .arg(date_arg("date", "The day to mark (default: today)")))
        .subcommand(SubCommand::with_name("catch-up")
            .about("Spreads a day's unread readings over a range of days in a new plan")
            .arg(date_arg("date", "The day whose unread readings to move (default: today)"))
            .arg(date_arg("from", "The first day of the catch-up window").required(true))
            .arg(date_arg("to", "The last day of the catch-up window").required(true)))
        .subcommand(SubCommand::with_name("stats")
            .about("Shows reading statistics over all completed readings")
            .arg(date_arg("date", "The last day of the trend (default: today)"))
            .arg(Arg::with_name("json")
                .long("json")
                .help("Prints the statistics as JSON")))
        .subcommand(SubCommand::with_name("remove")
            .about("Removes a reading plan")
            .arg(plan_arg("The name of the plan to remove")))
        .subcommand(SubCommand::with_name("remove-track")
            .about("Removes every reading of one track from a plan")
            .arg(plan_arg("The plan to change"))
            .arg(Arg::with_name("TRACK").help("The track name").required(true)))
        .subcommand(SubCommand::with_name("books")
            .about("Lists the books of the canon")
            .arg(Arg::with_name("TESTAMENT")
                .help("Only list one testament")
                .possible_values(&["OT", "NT"])))
        .subcommand(SubCommand::with_name("config").about("Prints the effective configuration"))
        .after_help("scripture-flow keeps personal scripture reading plans. To get started, use \
                     `scripture-flow generate` to create a plan, then `scripture-flow today` to \
                     see what to read.")
        .get_matches();

    // Whether we should disable the fancy ANSI terminal text
    let no_ansi = matches.is_present("no-ansi");
    // The style to use
    let style_set = if no_ansi {
        StyleSet::no_ansi()
    } else {
        StyleSet::fancy()
    };

    // Handle errors nicely
    if let Err(ref e) = run(&matches, style_set.clone()) {
        styleln!(style_set.error, "Error: {}", e);

        for e in e.iter().skip(1) {
            styleln!(style_set.error, "Caused by: {}", e);
        }

        if let Some(backtrace) = e.backtrace() {
            styleln!(style_set.error, "Backtrace: {:?}", backtrace);
        }

        std::process::exit(1);
    }
}

/// The main program logic.
/// Each subcommand should do its own printing, except for errors, which are returned.
fn run(m: &ArgMatches, style: StyleSet) -> Result<()> {
    if let Err(e) = logging::init(m.is_present("verbose")) {
        styleln!(style.error, "Warning: {}", e);
    }

    let config = Config::load_default().chain_err(|| "could not load configuration")?;
    let ctx = Context {
        style: style,
        canon: config.canon(),
        config: config,
        store: Store::open()?,
    };

    // Run the appropriate subcommand
    match m.subcommand() {
        ("generate", Some(sub_m)) => generate(sub_m, &ctx),
        ("import", Some(sub_m)) => import(sub_m, &ctx),
        ("export", Some(sub_m)) => export(sub_m, &ctx),
        ("list", Some(_)) => list(&ctx),
        ("today", Some(sub_m)) => today(sub_m, &ctx),
        ("check", Some(sub_m)) => check(sub_m, &ctx),
        ("chapter", Some(sub_m)) => chapter(sub_m, &ctx),
        ("done", Some(sub_m)) => done(sub_m, &ctx),
        ("catch-up", Some(sub_m)) => catch_up(sub_m, &ctx),
        ("stats", Some(sub_m)) => show_stats(sub_m, &ctx),
        ("remove", Some(sub_m)) => remove(sub_m, &ctx),
        ("remove-track", Some(sub_m)) => remove_track(sub_m, &ctx),
        ("books", Some(sub_m)) => books(sub_m, &ctx),
        ("config", Some(_)) => show_config(&ctx),
        _ => list(&ctx),
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses an optional date argument, defaulting to today.
fn date_value(m: &ArgMatches, name: &str) -> Result<NaiveDate> {
    match m.value_of(name) {
        None => Ok(local_today()),
        Some(s) if s.eq_ignore_ascii_case("today") => Ok(local_today()),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").chain_err(|| ErrorKind::InvalidDate(s.into())),
    }
}

fn day_value(m: &ArgMatches) -> Result<u32> {
    // We can unwrap this because the argument is required
    m.value_of("DAY").unwrap().parse().chain_err(|| "invalid day number")
}

/// Parses a `NAME:BOOKS[:PACE]` track argument.
fn parse_track(arg: &str, ctx: &Context) -> Result<Track> {
    let mut parts: Vec<&str> = arg.split(':').map(str::trim).collect();
    let pace = if parts.len() > 2 {
        let last = parts.pop().unwrap_or_default();
        last.parse().chain_err(|| format!("invalid pace in track '{}'", arg))?
    } else {
        i64::from(ctx.config.default_pace)
    };
    if parts.len() != 2 {
        bail!("track '{}' should look like NAME:BOOKS[:PACE]", arg);
    }
    let books = ctx.canon.parse_selection(parts[1])?;
    Track::new(parts[0], books, pace)
}

/// The `generate` subcommand logic.
fn generate(m: &ArgMatches, ctx: &Context) -> Result<()> {
    let name = m.value_of("NAME").unwrap();
    let start = date_value(m, "start")?;

    let tracks = match m.values_of("track") {
        Some(args) => args.map(|a| parse_track(a, ctx)).collect::<Result<Vec<_>>>()?,
        None => {
            let books = ctx.canon.parse_selection(m.value_of("books").unwrap_or("ALL"))?;
            let pace = match m.value_of("pace") {
                Some(p) => p.parse().chain_err(|| "invalid numeric argument to `--pace`")?,
                None => i64::from(ctx.config.default_pace),
            };
            vec![Track::new(&ctx.config.default_track, books, pace)?]
        }
    };

    let schedules = schedule::generate(&ctx.canon, start, &tracks).chain_err(|| "could not generate plan")?;
    for s in &schedules {
        styleln!(ctx.style.normal,
                 "{} {}",
                 style!(ctx.style.title, "{}", s.theme),
                 style!(ctx.style.description, "({} days)", s.entries.len()));
    }

    let plan = Plan::from_schedules(name, start, schedules);
    ctx.store.add_plan(&plan).chain_err(|| "could not add plan")?;
    styleln!(ctx.style.normal, "Added plan {} starting {}", name, start);
    Ok(())
}

/// The `import` subcommand logic.
fn import(m: &ArgMatches, ctx: &Context) -> Result<()> {
    let filename = Path::new(m.value_of("FILENAME").unwrap());

    // Get the name of the plan; either provided explicitly or
    // deduced from the file name
    let name = match m.value_of("name") {
        Some(n) => n,
        None => match filename.file_stem() {
            Some(n) => n.to_str().ok_or_else(|| Error::from_kind(ErrorKind::Utf8("invalid utf8 in filename".into())))?,
            None => bail!("could not deduce plan name from filename '{}'", filename.display()),
        },
    };

    // Try to open the file and parse a plan from it
    let f = File::open(&filename).chain_err(|| ErrorKind::Io(format!("could not open file {}", filename.display())))?;
    let plan = Plan::from_text(name, &f, local_today()).chain_err(|| "could not parse plan")?;

    ctx.store.add_plan(&plan).chain_err(|| "could not add plan")?;
    styleln!(ctx.style.normal, "Imported plan {} ({} readings)", name, plan.len());
    Ok(())
}

/// The `export` subcommand logic.
fn export(m: &ArgMatches, ctx: &Context) -> Result<()> {
    let name = m.value_of("PLAN").unwrap();
    let plan = ctx.store.read_plan(name).chain_err(|| "could not read plan")?;

    // Construct default output filename if we don't have one provided
    let output = match m.value_of("output") {
        Some(o) => o.to_owned(),
        None => plan.name().replace('/', "-") + ".plan",
    };

    // Open the output file for writing, with an error if it already exists
    let path = Path::new(&output);
    if path.exists() {
        bail!("output file '{}' already exists; will not overwrite", output);
    }
    let file = File::create(path).chain_err(|| ErrorKind::Io("could not open output file".into()))?;

    plan.to_text(file).chain_err(|| "could not write to output file")?;
    styleln!(ctx.style.normal, "Wrote plan '{}' to '{}'", plan.name(), output);
    Ok(())
}

fn all_plans(ctx: &Context) -> Result<Vec<Plan>> {
    ctx.store.all_plans().chain_err(|| "could not read plans")
}

fn progress_text(p: &Progress) -> String {
    format!("{}/{} readings, {}%", p.completed, p.total, p.percentage)
}

/// The `list` subcommand logic
fn list(ctx: &Context) -> Result<()> {
    let plans = all_plans(ctx)?;

    // If there are no plans, say so
    if plans.is_empty() {
        styleln!(ctx.style.normal,
                 "No plans yet; you can create one by running `scripture-flow generate` (use \
                  `scripture-flow help generate` for more information)");
        return Ok(());
    }

    for plan in &plans {
        println!("{} {}",
                 style!(ctx.style.title, "{}", plan.name()),
                 style!(ctx.style.normal, "(from {}, {})", plan.start_date(), progress_text(&plan.progress())));
        for theme in plan.themes() {
            let progress = Progress::of(plan.entries().filter(|e| e.theme() == theme));
            styleln!(ctx.style.description, "    {}: {}", theme, progress_text(&progress));
        }
    }
    Ok(())
}

/// The `today` subcommand logic
fn today(m: &ArgMatches, ctx: &Context) -> Result<()> {
    let date = date_value(m, "date")?;
    let links = m.is_present("links");
    let plans = all_plans(ctx)?;

    let todays: Vec<(&Plan, &scripture_flow::Entry)> = plans.iter().flat_map(|p| p.entries_on(date).map(move |e| (p, e))).collect();
    if todays.is_empty() {
        styleln!(ctx.style.normal, "Nothing is scheduled for {}", date);
        return Ok(());
    }

    let progress = Progress::of(todays.iter().map(|&(_, e)| e));
    styleln!(ctx.style.title, "{} ({})", date, progress_text(&progress));
    for (plan, entry) in todays {
        let (read, total) = entry.chapter_progress();
        let mark = if entry.is_completed() { "[x]" } else { "[ ]" };
        let line_style = if entry.is_completed() { ctx.style.done } else { ctx.style.normal };
        let detail = if total > 1 { format!(" ({}/{})", read, total) } else { String::new() };
        println!("{} {} {}",
                 style!(line_style, "{} {}", mark, entry.title()),
                 style!(ctx.style.description, "{} / {} day {}", plan.name(), entry.theme(), entry.day()),
                 detail);
        if links {
            for group in entry.groups() {
                styleln!(ctx.style.description, "      {}: {}", group.display, group.link(&ctx.canon, &ctx.config.link));
            }
        }
    }
    Ok(())
}

/// Finds the entry a `check` or `chapter` command refers to.
fn find_entry<'a>(plan: &'a mut Plan, m: &ArgMatches) -> Result<&'a mut scripture_flow::Entry> {
    let day = day_value(m)?;
    let theme = m.value_of("theme");
    let nth = match m.value_of("nth") {
        Some(n) => Some(n.parse().chain_err(|| "invalid numeric argument to `--nth`")?),
        None => None,
    };
    let name = plan.name().to_owned();
    plan.entry_mut(theme, day, nth).chain_err(|| match nth {
        None => format!("in plan '{}' (choose a track with --theme or a reading with --nth)", name),
        Some(_) => format!("in plan '{}'", name),
    })
}

/// The `check` subcommand logic
fn check(m: &ArgMatches, ctx: &Context) -> Result<()> {
    let name = m.value_of("PLAN").unwrap();
    let mut plan = ctx.store.read_plan(name).chain_err(|| "could not read plan")?;

    let (completed, title) = {
        let entry = find_entry(&mut plan, m)?;
        (entry.toggle_completed(), entry.title())
    };

    ctx.store.overwrite_plan(&plan).chain_err(|| "could not overwrite plan")?;
    if completed {
        styleln!(ctx.style.done, "Marked {} as read", title);
    } else {
        styleln!(ctx.style.normal, "Marked {} as unread", title);
    }
    Ok(())
}

/// The `chapter` subcommand logic
fn chapter(m: &ArgMatches, ctx: &Context) -> Result<()> {
    let name = m.value_of("PLAN").unwrap();
    let reference = m.value_of("REFERENCE").unwrap();
    let mut plan = ctx.store.read_plan(name).chain_err(|| "could not read plan")?;

    let (marked, read, total) = {
        let entry = find_entry(&mut plan, m)?;
        if !entry.references().contains(&reference.trim()) {
            bail!("'{}' is not part of the reading '{}'", reference, entry.title());
        }
        let marked = entry.toggle_chapter(reference);
        let (read, total) = entry.chapter_progress();
        (marked, read, total)
    };

    ctx.store.overwrite_plan(&plan).chain_err(|| "could not overwrite plan")?;
    styleln!(ctx.style.normal,
             "{} {} ({}/{} chapters read)",
             if marked { "Read" } else { "Unread" },
             reference,
             read,
             total);
    Ok(())
}

/// The `done` subcommand logic
fn done(m: &ArgMatches, ctx: &Context) -> Result<()> {
    let date = date_value(m, "date")?;
    let mut changed = 0;

    for mut plan in all_plans(ctx)? {
        let n = plan.mark_all_done(date);
        if n > 0 {
            ctx.store.overwrite_plan(&plan).chain_err(|| "could not overwrite plan")?;
            changed += n;
        }
    }

    match changed {
        0 => styleln!(ctx.style.normal, "Nothing left to read on {}", date),
        1 => styleln!(ctx.style.done, "Marked 1 reading on {} as read", date),
        n => styleln!(ctx.style.done, "Marked {} readings on {} as read", n, date),
    }
    Ok(())
}

/// The `catch-up` subcommand logic
fn catch_up(m: &ArgMatches, ctx: &Context) -> Result<()> {
    let due = date_value(m, "date")?;
    let from = date_value(m, "from")?;
    let to = date_value(m, "to")?;

    let plans = all_plans(ctx)?;
    let overdue: Vec<&scripture_flow::Entry> = plans.iter().flat_map(|p| p.overdue_on(due)).collect();
    if overdue.is_empty() {
        styleln!(ctx.style.normal, "Nothing unread on {}", due);
        return Ok(());
    }

    let plan = Plan::catch_up(due, &overdue, from, to)?;
    ctx.store.add_plan(&plan).chain_err(|| "could not add plan")?;
    styleln!(ctx.style.normal,
             "Added plan {} with {} readings from {} to {}",
             plan.name(),
             plan.len(),
             from,
             to);
    Ok(())
}

/// The `stats` subcommand logic
fn show_stats(m: &ArgMatches, ctx: &Context) -> Result<()> {
    let date = date_value(m, "date")?;
    let plans = all_plans(ctx)?;
    let snapshot = stats::aggregate(plans.iter().flat_map(|p| p.entries()), &ctx.canon, date);

    if m.is_present("json") {
        let json = serde_json::to_string_pretty(&snapshot).chain_err(|| ErrorKind::Json("could not serialize statistics".into()))?;
        println!("{}", json);
        return Ok(());
    }

    styleln!(ctx.style.title, "Old Testament: {:.1}%", snapshot.ot_progress * 100.0);
    styleln!(ctx.style.title, "New Testament: {:.1}%", snapshot.nt_progress * 100.0);
    println!();
    for section in SECTIONS.iter() {
        let p = snapshot.section_progress(section);
        styleln!(ctx.style.normal,
                 "{:24} {:>4}/{:<4} {:>3}%",
                 section.name(ctx.canon.locale()),
                 p.completed,
                 p.total,
                 p.percentage);
        let read: Vec<String> = section
            .books()
            .iter()
            .filter(|b| snapshot.read(b) > 0)
            .map(|b| format!("{} x{:.1}", ctx.canon.name(b), snapshot.times_read(b)))
            .collect();
        if !read.is_empty() {
            styleln!(ctx.style.description, "    {}", read.join(", "));
        }
    }
    println!();
    styleln!(ctx.style.title, "Last 30 days: {} chapters", snapshot.trend_total());
    for point in snapshot.trend.iter().filter(|p| p.chapters > 0) {
        styleln!(ctx.style.normal, "    {} {}", point.label, "#".repeat(point.chapters as usize));
    }
    Ok(())
}

/// The `remove` subcommand logic
fn remove(m: &ArgMatches, ctx: &Context) -> Result<()> {
    let name = m.value_of("PLAN").unwrap();

    ctx.store.remove_plan(name).chain_err(|| "could not remove plan")?;

    styleln!(ctx.style.normal, "Removed plan {}", name);
    Ok(())
}

/// The `remove-track` subcommand logic
fn remove_track(m: &ArgMatches, ctx: &Context) -> Result<()> {
    let name = m.value_of("PLAN").unwrap();
    let track = m.value_of("TRACK").unwrap();
    let mut plan = ctx.store.read_plan(name).chain_err(|| "could not read plan")?;

    match plan.remove_theme(track) {
        0 => bail!("plan '{}' has no track '{}'", name, track),
        n => {
            ctx.store.overwrite_plan(&plan).chain_err(|| "could not overwrite plan")?;
            styleln!(ctx.style.normal, "Removed {} readings of track {} from {}", n, track, name);
        }
    }
    Ok(())
}

/// The `books` subcommand logic
fn books(m: &ArgMatches, ctx: &Context) -> Result<()> {
    let only = match m.value_of("TESTAMENT") {
        Some("OT") => Some(Testament::Old),
        Some("NT") => Some(Testament::New),
        _ => None,
    };
    for book in ctx.canon.books().iter().filter(|b| only.map_or(true, |t| b.testament() == t)) {
        println!("{} {} {}",
                 style!(ctx.style.description, "{:4}", book.id()),
                 style!(ctx.style.title, "{}", ctx.canon.name(book)),
                 style!(ctx.style.normal, "({} chapters)", book.chapters()));
    }
    Ok(())
}

/// The `config` subcommand logic
fn show_config(ctx: &Context) -> Result<()> {
    print!("{}", ctx.config.to_toml()?);
    // The status of today, as a quick sanity check of the store location
    let plans = all_plans(ctx)?;
    let status = plan::day_status(plans.iter().flat_map(|p| p.entries_on(local_today())));
    let status = match status {
        DayStatus::Empty => "nothing scheduled",
        DayStatus::Completed => "all read",
        DayStatus::Pending => "readings pending",
    };
    styleln!(ctx.style.description, "# plans: {} ({} today)", ctx.store.dir().display(), status);
    Ok(())
}
