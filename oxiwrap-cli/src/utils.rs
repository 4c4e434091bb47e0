//! Utility functions for the CLI.

use oxiwrap_core::Format;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "OXIWRAP_LOG";

/// Exit code after an unexpected internal error.
pub const INTERNAL_ERROR: i32 = 2;

/// Environment variables worth including in a bug report.
const REPORTED_ENV: &[&str] = &["LANG", "LC_ALL", "LC_CTYPE", "PATH", "SHELL", LOG_ENV];

/// Parse a `--format`/`--compression` value.
pub fn parse_format(value: &str) -> Result<Format, String> {
    value.parse::<Format>().map_err(|e| e.to_string())
}

/// Default log filter for a verbosity level.
pub fn log_filter(verbosity: i8) -> &'static str {
    match verbosity {
        i8::MIN..=-1 => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the stderr subscriber. `OXIWRAP_LOG` wins over the verbosity.
pub fn init_logging(verbosity: i8) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(log_filter(verbosity)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Render the diagnostic shown when the program panics.
pub fn bug_report(message: &str) -> String {
    let mut report = String::new();
    report.push_str("********** Oops, oxiwrap hit an internal error **********\n");
    report.push_str("Please report this bug with the information below.\n\n");
    report.push_str(&format!("Version: oxiwrap {}\n", env!("CARGO_PKG_VERSION")));
    report.push_str(&format!(
        "Time: {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S %z")
    ));
    report.push_str(&format!(
        "Platform: {} {}\n",
        std::env::consts::OS,
        std::env::consts::ARCH
    ));
    report.push_str(&format!("Message: {message}\n"));
    report.push_str("Environment:\n");
    for name in REPORTED_ENV {
        if let Ok(value) = std::env::var(name) {
            report.push_str(&format!("  {name}={value}\n"));
        }
    }
    report
}

/// Replace panic output with a bug report and exit with 2.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        let message = match info.location() {
            Some(location) => format!("{payload} at {location}"),
            None => payload,
        };
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(bug_report(&message).as_bytes());
        let _ = stderr.flush();
        std::process::exit(INTERNAL_ERROR);
    }));
}

/// Exit code for a number of failed archives.
pub fn exit_code(failures: usize) -> i32 {
    failures.min(255) as i32
}

/// Run `operation` on every archive, reporting failures without stopping.
/// Returns the number of failures.
pub fn run_batch<F>(archives: &[PathBuf], mut operation: F) -> usize
where
    F: FnMut(&Path) -> oxiwrap_core::Result<()>,
{
    let mut failures = 0;
    for archive in archives {
        if let Err(e) = operation(archive) {
            debug!(archive = %archive.display(), error = ?e, "archive failed");
            eprintln!("oxiwrap: error: {}: {e}", archive.display());
            failures += 1;
        }
    }
    failures
}
