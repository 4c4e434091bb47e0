//! Listing for single-file compressors: the only member is the archive
//! name without its extension.

use crate::programs::{ArchiveProgram, Job, stripext};
use oxiwrap_core::{Command, CommandLine, Format, Result};

pub struct Echo;

pub static ECHO: Echo = Echo;

const LISTABLE: &[Format] = &[
    Format::Bzip2,
    Format::Compress,
    Format::Gzip,
    Format::Lrzip,
    Format::Lzip,
    Format::Lzma,
    Format::Rzip,
    Format::Xz,
];

impl ArchiveProgram for Echo {
    fn ids(&self) -> &'static [&'static str] {
        &["builtin_echo"]
    }

    fn supports(&self, command: Command, format: Format) -> bool {
        command == Command::List && LISTABLE.contains(&format)
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        if !self.supports(job.command(), job.format) {
            return Err(job.mismatch("builtin_echo"));
        }
        println!("{}", stripext(job.archive));
        Ok(None)
    }
}
