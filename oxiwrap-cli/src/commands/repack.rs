//! Repack command implementation.

use oxiwrap_dispatch::{ArchiveOptions, Archiver};
use std::path::Path;

pub fn cmd_repack(
    archiver: &Archiver,
    source: &Path,
    target: &Path,
    options: &ArchiveOptions<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    archiver.repack(source, target, options)?;
    if archiver.config().verbosity >= 0 {
        println!(
            "{}: repacked to `{}'",
            source.display(),
            target.display()
        );
    }
    Ok(())
}
