//! This module provides the plan store: a directory of plan files, by
//! default located with the `app_dirs` crate, which will return a path
//! based on the operating system (Windows, OS X, or Linux).
//!
//! All plan files are stored in the plans directory with the extension
//! `.plan.json`. Files with a different extension will not be recognized,
//! e.g. by the `plans` iterator. The file stem is derived from the plan's
//! name with path separators replaced, so names like `Catch-up (01/05)`
//! are safe to store.

use std::fs::{self, File, ReadDir};
use std::iter::Iterator;
use std::path::{Path, PathBuf};

use app_dirs::{self, AppDataType, AppDirsError, AppInfo};
use tracing::{debug, warn};

use crate::errors::*;
use crate::plan::Plan;

/// The information for app_dirs
const APP_INFO: AppInfo = AppInfo {
    name: "scripture-flow",
    author: "Ian Johnson",
};

const EXTENSION: &str = "plan.json";

fn app_dir(t: AppDataType, path: &str) -> Result<PathBuf> {
    match app_dirs::get_app_dir(t, &APP_INFO, path) {
        Ok(p) => Ok(p),
        Err(AppDirsError::NotSupported) => Err(ErrorKind::CannotLocateConfig.into()),
        Err(AppDirsError::Io(e)) => Err(e).chain_err(|| ErrorKind::Io("could not find data directory".into())),
        // This should properly be a panic, since there really isn't any way
        // this can happen (unless `app_dirs` changes in a breaking way).
        Err(AppDirsError::InvalidAppInfo) => panic!("invalid app info"),
    }
}

/// Returns the default location of the plans directory if possible.
pub fn plans_dir() -> Result<PathBuf> {
    app_dir(AppDataType::UserData, "plans")
}

/// Returns the default location of the configuration file if possible.
pub fn config_path() -> Result<PathBuf> {
    app_dir(AppDataType::UserConfig, "config.toml")
}

/// The file stem used to store a plan with the given name.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '-',
            c => c,
        })
        .collect()
}

/// An iterator over all the plans in the plan directory.
///
/// The iterator returns items of type `Result<Plan, Error>`
/// because there may be errors in reading a plan or errors
/// in the format itself.
pub struct Plans {
    /// The underlying `ReadDir` iterator
    read_dir: ReadDir,
}

impl Iterator for Plans {
    type Item = Result<Plan>;

    fn next(&mut self) -> Option<Result<Plan>> {
        loop {
            let entry = self.read_dir.next()?;
            let path = match entry.chain_err(|| ErrorKind::Io("could not read directory item".into())) {
                Ok(e) => e.path(),
                Err(e) => return Some(Err(e)),
            };

            // Make sure we skip over things that aren't files or
            // don't have the proper extension ('.plan.json')
            let path_str = match path.to_str() {
                Some(s) => s.to_owned(),
                None => return Some(Err(ErrorKind::Utf8("path is not valid utf8".into()).into())),
            };
            if !path.is_file() || !path_str.ends_with(".plan.json") {
                continue;
            }
            return Some(read_file(&path));
        }
    }
}

fn read_file(path: &Path) -> Result<Plan> {
    let f = File::open(path).chain_err(|| ErrorKind::Io(format!("could not open file '{}'", path.display())))?;
    serde_json::from_reader(f).chain_err(|| ErrorKind::Json(format!("json error in file '{}'", path.display())))
}

fn write_file(path: &Path, p: &Plan) -> Result<()> {
    let mut f = File::create(path).chain_err(|| ErrorKind::Io(format!("could not create file '{}'", path.display())))?;
    serde_json::to_writer_pretty(&mut f, p).chain_err(|| ErrorKind::Json("could not serialize plan to json".into()))
}

/// A directory of plan files.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// A store in the default plans directory.
    pub fn open() -> Result<Store> {
        Ok(Store::at(plans_dir()?))
    }

    /// A store in the given directory, which is created on first write.
    pub fn at<P: Into<PathBuf>>(dir: P) -> Store {
        Store { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        let mut filename = self.dir.clone();
        filename.push(format!("{}.{}", file_stem(name), EXTENSION));
        filename
    }

    /// Returns the plans directory, ensuring that it actually exists (the
    /// directory will be created if it does not).
    fn dir_ensure(&self) -> Result<&Path> {
        if !self.dir.is_dir() {
            debug!(dir = %self.dir.display(), "creating plans directory");
            fs::create_dir_all(&self.dir).chain_err(|| ErrorKind::Io("could not create plans directory".into()))?;
        }
        Ok(&self.dir)
    }

    /// Returns the plans directory, returning an error if it doesn't exist.
    fn dir_must_exist(&self) -> Result<&Path> {
        if !self.dir.is_dir() {
            Err(ErrorKind::NoConfigDirectory.into())
        } else {
            Ok(&self.dir)
        }
    }

    /// Returns an iterator over the plans in the store if possible, or an
    /// error if this cannot be done.
    pub fn plans(&self) -> Result<Plans> {
        let dir = self.dir_must_exist()?;

        Ok(Plans { read_dir: fs::read_dir(dir).chain_err(|| ErrorKind::Io("could not read from plans directory".into()))? })
    }

    /// Reads every plan in the store, skipping (and logging) any that
    /// cannot be read. A store that has not been created yet is empty.
    pub fn all_plans(&self) -> Result<Vec<Plan>> {
        let plans = match self.plans() {
            Ok(p) => p,
            Err(Error(ErrorKind::NoConfigDirectory, _)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        Ok(plans
            .filter_map(|p| match p {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable plan");
                    None
                }
            })
            .collect())
    }

    /// The plan stored in the file `name` maps to, if there is one. Names
    /// differing only in characters replaced by `file_stem` share a file,
    /// so the stored plan may carry a different name.
    fn stored(&self, name: &str) -> Result<Option<(PathBuf, Plan)>> {
        let filename = self.path_for(name);
        if !filename.exists() {
            return Ok(None);
        }
        let plan = read_file(&filename)?;
        Ok(Some((filename, plan)))
    }

    /// Reads the plan with the given name.
    pub fn read_plan(&self, name: &str) -> Result<Plan> {
        self.dir_must_exist()?;

        match self.stored(name)? {
            Some((_, plan)) if plan.name() == name => Ok(plan),
            _ => Err(ErrorKind::PlanDoesNotExist(name.into()).into()),
        }
    }

    /// Writes the given plan to the store, or will return an error if the
    /// plan (or another whose name maps to the same file) already exists
    /// there.
    pub fn add_plan(&self, p: &Plan) -> Result<()> {
        self.dir_ensure()?;

        match self.stored(p.name())? {
            Some((_, existing)) if existing.name() == p.name() => {
                Err(ErrorKind::PlanAlreadyExists(p.name().into()).into())
            }
            Some((_, existing)) => Err(ErrorKind::PlanNameConflict(p.name().into(), existing.name().into()).into()),
            None => {
                debug!(plan = p.name(), entries = p.len(), "adding plan");
                write_file(&self.path_for(p.name()), p)
            }
        }
    }

    /// Writes the given plan to the store, overwriting it if it already
    /// exists. A different plan sharing the file is never overwritten.
    pub fn overwrite_plan(&self, p: &Plan) -> Result<()> {
        self.dir_ensure()?;

        match self.stored(p.name())? {
            Some((_, existing)) if existing.name() != p.name() => {
                Err(ErrorKind::PlanNameConflict(p.name().into(), existing.name().into()).into())
            }
            _ => write_file(&self.path_for(p.name()), p),
        }
    }

    /// Attempts to remove the plan with the given name, returning an error
    /// if it doesn't exist.
    pub fn remove_plan(&self, name: &str) -> Result<()> {
        self.dir_must_exist()?;

        match self.stored(name)? {
            Some((filename, plan)) if plan.name() == name => {
                fs::remove_file(&filename).chain_err(|| ErrorKind::Io("could not remove plan file".into()))
            }
            _ => Err(ErrorKind::PlanDoesNotExist(name.to_owned()).into()),
        }
    }
}
