//! Per-program command builders.
//!
//! Each external archiver gets an [`ArchiveProgram`] implementation that
//! turns a [`Job`] into a [`CommandLine`]. Built-in codecs implement the
//! same trait, do the work in-process and return `Ok(None)`.
//!
//! Builders receive an absolute archive path and never touch the search
//! path themselves, except through [`Job::finder`] for helper programs
//! that run in the same pipeline.

mod cab;
mod cpio;
mod legacy;
mod p7zip;
mod packages;
mod rar;
mod shar;
mod singlefile;
mod tar;
mod unar;
mod zip;

use oxiwrap_core::{Command, CommandLine, ExecutableFinder, Format, Result, WrapError};
use std::path::{Path, PathBuf};

/// What a builder is asked to do.
#[derive(Debug, Clone, Copy)]
pub enum Operation<'a> {
    /// Unpack into an existing, empty directory.
    Extract {
        /// Target directory.
        outdir: &'a Path,
    },
    /// Print the contents.
    List,
    /// Verify integrity.
    Test,
    /// Build a new archive from files.
    Create {
        /// Files and directories to add.
        files: &'a [PathBuf],
    },
}

impl Operation<'_> {
    /// The command this operation performs.
    pub fn command(&self) -> Command {
        match self {
            Self::Extract { .. } => Command::Extract,
            Self::List => Command::List,
            Self::Test => Command::Test,
            Self::Create { .. } => Command::Create,
        }
    }
}

/// Everything a builder needs for one invocation.
pub struct Job<'a> {
    /// Absolute archive path.
    pub archive: &'a Path,
    /// Format handled by the program.
    pub format: Format,
    /// Compression the program must apply or remove.
    pub compression: Option<Format>,
    /// Executable path, or the built-in name.
    pub executable: &'a str,
    /// The requested operation.
    pub operation: Operation<'a>,
    /// Output level.
    pub verbosity: i8,
    /// Whether the program may prompt.
    pub interactive: bool,
    /// Archive password.
    pub password: Option<&'a str>,
    /// Search path access for pipeline helpers.
    pub finder: &'a dyn ExecutableFinder,
}

impl Job<'_> {
    /// The command this job performs.
    pub fn command(&self) -> Command {
        self.operation.command()
    }

    /// The archive path as a string.
    pub fn archive_str(&self) -> String {
        path_str(self.archive)
    }

    pub(crate) fn mismatch(&self, program: &str) -> WrapError {
        WrapError::NoBuilder {
            program: program.to_string(),
            command: self.command(),
            format: self.format,
        }
    }
}

/// A command builder for one program (or a family of compatible programs).
pub trait ArchiveProgram: Send + Sync {
    /// Normalized identifiers this builder answers to.
    fn ids(&self) -> &'static [&'static str];

    /// Check whether the program can run `command` on `format`.
    fn supports(&self, command: Command, format: Format) -> bool;

    /// Check whether the program can be given a password.
    fn accepts_password(&self, _command: Command, _format: Format) -> bool {
        false
    }

    /// Build the invocation. `None` means the work was done in-process.
    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>>;
}

/// Lossy string form of a path.
pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Quote one token for shell mode.
pub fn quote(token: &str) -> Result<String> {
    shlex::try_quote(token)
        .map(|quoted| quoted.into_owned())
        .map_err(|e| WrapError::invalid_argument(format!("cannot quote `{token}': {e}")))
}

/// Quote a path for shell mode.
pub fn quote_path(path: &Path) -> Result<String> {
    quote(&path_str(path))
}

/// Shorthand extensions that stand for a compressed tar archive.
const TAR_SHORTHANDS: &[&str] = &["tgz", "tbz", "tbz2", "txz", "tlz", "tzst", "taz", "tz"];

/// The archive file name without its last extension.
///
/// `foo.tar.gz` gives `foo.tar`, `foo.tgz` gives `foo.tar`.
pub fn stripext(archive: &Path) -> String {
    let stem = archive
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let shorthand = archive
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| TAR_SHORTHANDS.contains(&ext.to_ascii_lowercase().as_str()));
    if shorthand {
        format!("{stem}.tar")
    } else {
        stem
    }
}

/// Output path for a decompressed single-file archive inside `outdir`,
/// with a numeric suffix when the name is taken.
pub fn single_outfile(outdir: &Path, archive: &Path, extension: &str) -> PathBuf {
    let base = outdir.join(stripext(archive));
    let candidate = PathBuf::from(format!("{}{extension}", base.display()));
    if !candidate.exists() {
        return candidate;
    }
    (1..)
        .map(|i| PathBuf::from(format!("{}{i}{extension}", base.display())))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// The only file of a create job, for programs that compress one file.
pub fn single_file<'a>(files: &'a [PathBuf], program: &str) -> Result<&'a Path> {
    match files {
        [file] => Ok(file),
        _ => Err(WrapError::invalid_argument(format!(
            "{program} can only compress a single file, got {}",
            files.len()
        ))),
    }
}

/// Every builder, including the built-in codecs.
pub fn all() -> Vec<&'static dyn ArchiveProgram> {
    use crate::builtin;
    vec![
        &p7zip::P7ZIP,
        &tar::TAR,
        &tar::STAR,
        &tar::BSDTAR,
        &unar::UNAR,
        &unar::LSAR,
        &zip::ZIP,
        &zip::UNZIP,
        &rar::RAR,
        &rar::UNRAR,
        &cpio::CPIO,
        &packages::RPM,
        &packages::RPM2CPIO,
        &packages::DPKG,
        &cab::CABEXTRACT,
        &cab::LCAB,
        &cab::GENISOIMAGE,
        &cab::ISOINFO,
        &shar::SHAR,
        &shar::UNSHAR,
        &legacy::AR,
        &legacy::ARC,
        &legacy::NOMARCH,
        &legacy::ARJ,
        &legacy::LHA,
        &legacy::LHASA,
        &legacy::UNACE,
        &legacy::UNADF,
        &legacy::UNALZ,
        &legacy::ZOO,
        &legacy::ZPAQ,
        &singlefile::GZIP,
        &singlefile::PIGZ,
        &singlefile::ZOPFLI,
        &singlefile::BZIP2,
        &singlefile::XZ,
        &singlefile::LZMA,
        &singlefile::LZIP,
        &singlefile::ZSTD,
        &singlefile::LZ4,
        &singlefile::LZOP,
        &singlefile::LRZIP,
        &singlefile::RZIP,
        &singlefile::COMPRESS,
        &singlefile::UNCOMPRESS,
        &builtin::ECHO,
        &builtin::GZIP,
        &builtin::XZ,
        &builtin::ZIP,
        &builtin::TAR,
    ]
}
