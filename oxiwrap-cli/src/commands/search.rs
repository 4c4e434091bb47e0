//! Search command implementation.

use oxiwrap_dispatch::{ArchiveOptions, Archiver};
use std::path::Path;

/// Exit code follows `grep`: 0 found, 1 not found.
pub fn cmd_search(
    archiver: &Archiver,
    pattern: &str,
    archive: &Path,
    options: &ArchiveOptions<'_>,
) -> Result<i32, Box<dyn std::error::Error>> {
    Ok(archiver.search(pattern, archive, options)?)
}
