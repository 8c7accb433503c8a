//! Logging setup for the command line tool.
//!
//! Installs a global `tracing` subscriber writing to stderr, so log lines
//! never mix with command output. The filter is read from
//! `SCRIPTURE_FLOW_LOG` (in `EnvFilter` syntax) and otherwise defaults to
//! `warn`, or `debug` when verbose output is requested.

use std::io;
use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

use crate::errors::*;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "SCRIPTURE_FLOW_LOG";

static INSTALLED: OnceLock<()> = OnceLock::new();

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "scripture_flow=debug"
    } else {
        "warn"
    }
}

/// Initializes logging. Subsequent calls are no-ops.
pub fn init(verbose: bool) -> Result<()> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| Error::from(format!("could not install log subscriber: {}", e)))?;

    let _ = INSTALLED.set(());
    Ok(())
}
