//! Diff command implementation.

use oxiwrap_dispatch::{ArchiveOptions, Archiver};
use std::path::Path;

/// Exit code follows `diff`: 0 identical, 1 different.
pub fn cmd_diff(
    archiver: &Archiver,
    first: &Path,
    second: &Path,
    options: &ArchiveOptions<'_>,
) -> Result<i32, Box<dyn std::error::Error>> {
    Ok(archiver.diff(first, second, options)?)
}
