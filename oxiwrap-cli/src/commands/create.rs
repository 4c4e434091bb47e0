//! Create command implementation.

use oxiwrap_dispatch::{ArchiveOptions, Archiver};
use std::path::{Path, PathBuf};

pub fn cmd_create(
    archiver: &Archiver,
    target: &Path,
    files: &[PathBuf],
    options: &ArchiveOptions<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    archiver.create(target, files, options)?;
    if archiver.config().verbosity >= 0 {
        println!("{}: created", target.display());
    }
    Ok(())
}
