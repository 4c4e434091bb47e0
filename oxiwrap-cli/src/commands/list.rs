//! List command implementation.

use crate::utils::{exit_code, run_batch};
use oxiwrap_dispatch::{ArchiveOptions, Archiver};
use std::path::PathBuf;

pub fn cmd_list(
    archiver: &Archiver,
    archives: &[PathBuf],
    options: &ArchiveOptions<'_>,
) -> Result<i32, Box<dyn std::error::Error>> {
    let failures = run_batch(archives, |archive| archiver.list(archive, options));
    Ok(exit_code(failures))
}
