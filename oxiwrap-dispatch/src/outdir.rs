//! Output directory handling for extraction.
//!
//! Without an explicit destination, archives are unpacked into a fresh
//! `Unpack_*` directory next to the working directory. Afterwards a single
//! top-level entry is moved up one level; anything else keeps its own
//! directory, renamed after the archive.

use crate::programs::{single_outfile, stripext};
use oxiwrap_core::{Result, WrapError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Prefix of temporary extraction directories.
pub const UNPACK_PREFIX: &str = "Unpack_";

/// Create a fresh, persistent extraction directory inside `parent`.
pub fn make_tmpdir(parent: &Path) -> Result<PathBuf> {
    let dir = tempfile::Builder::new()
        .prefix(UNPACK_PREFIX)
        .tempdir_in(parent)?;
    Ok(dir.keep())
}

/// A throwaway staging directory, removed when dropped.
pub fn staging_dir() -> Result<tempfile::TempDir> {
    Ok(tempfile::Builder::new().prefix(UNPACK_PREFIX).tempdir()?)
}

/// The only entry of a directory.
pub fn single_entry(dir: &Path) -> Result<PathBuf> {
    let entries = entries(dir)?;
    match <[PathBuf; 1]>::try_from(entries) {
        Ok([entry]) => Ok(entry),
        Err(entries) => Err(WrapError::invalid_argument(format!(
            "expected one file in {}, found {}",
            dir.display(),
            entries.len()
        ))),
    }
}

/// Entries of a directory, sorted.
pub fn entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}

/// The directory to compare or search after extracting into `dir`: the
/// single top-level directory if there is one, else `dir` itself.
pub fn content_root(dir: &Path) -> Result<PathBuf> {
    let entries = entries(dir)?;
    match entries.as_slice() {
        [only] if only.is_dir() => Ok(only.clone()),
        _ => Ok(dir.to_path_buf()),
    }
}

/// Let the owner read everything that was just extracted.
#[cfg(unix)]
fn make_user_readable(dir: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    for path in entries(dir)? {
        let meta = fs::symlink_metadata(&path)?;
        if meta.file_type().is_symlink() {
            continue;
        }
        let mode = meta.permissions().mode();
        let wanted = if meta.is_dir() { mode | 0o700 } else { mode | 0o400 };
        if wanted != mode {
            fs::set_permissions(&path, fs::Permissions::from_mode(wanted))?;
        }
        if meta.is_dir() {
            make_user_readable(&path)?;
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn make_user_readable(_dir: &Path) -> Result<()> {
    Ok(())
}

/// Flatten a fresh extraction directory and report where the output is.
///
/// A single entry moves up next to `outdir` unless that path is taken.
/// Otherwise `outdir` is renamed after the archive, with a numeric suffix
/// when needed.
pub fn cleanup_outdir(outdir: &Path, archive: &Path) -> Result<PathBuf> {
    make_user_readable(outdir)?;
    let parent = outdir.parent().unwrap_or(Path::new("."));
    let entries = entries(outdir)?;

    if let [only] = entries.as_slice() {
        if let Some(name) = only.file_name() {
            let target = parent.join(name);
            if !target.exists() {
                fs::rename(only, &target)?;
                fs::remove_dir(outdir)?;
                debug!(target = %target.display(), "flattened single entry");
                return Ok(target);
            }
            info!(
                target = %target.display(),
                "single entry not moved, destination exists"
            );
        }
    }

    let target = single_outfile(parent, archive, "");
    fs::rename(outdir, &target)?;
    debug!(
        archive = %stripext(archive),
        target = %target.display(),
        "renamed extraction directory"
    );
    Ok(target)
}
