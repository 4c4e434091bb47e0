//! Extract command implementation.

use crate::utils::{exit_code, run_batch};
use oxiwrap_dispatch::{ArchiveOptions, Archiver};
use std::path::{Path, PathBuf};

pub fn cmd_extract(
    archiver: &Archiver,
    archives: &[PathBuf],
    outdir: Option<&Path>,
    options: &ArchiveOptions<'_>,
) -> Result<i32, Box<dyn std::error::Error>> {
    let quiet = archiver.config().verbosity < 0;
    let failures = run_batch(archives, |archive| {
        let target = archiver.extract(archive, outdir, options)?;
        if !quiet {
            println!("{}: extracted to `{}'", archive.display(), target.display());
        }
        Ok(())
    });
    Ok(exit_code(failures))
}
