//! Shell archives.

use super::{ArchiveProgram, Job, Operation, path_str, quote, quote_path};
use oxiwrap_core::{Command, CommandLine, Format, Result};

pub struct Shar;
pub struct Unshar;

pub static SHAR: Shar = Shar;
pub static UNSHAR: Unshar = Unshar;

impl ArchiveProgram for Shar {
    fn ids(&self) -> &'static [&'static str] {
        &["shar"]
    }

    fn supports(&self, command: Command, format: Format) -> bool {
        format == Format::Shar && command == Command::Create
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        let Operation::Create { files } = job.operation else {
            return Err(job.mismatch("shar"));
        };
        let mut tokens = vec![quote(job.executable)?];
        if job.verbosity < 1 {
            tokens.push("-q".into());
        }
        for file in files {
            tokens.push(quote_path(file)?);
        }
        tokens.extend([">".to_string(), quote_path(job.archive)?]);
        Ok(Some(CommandLine::shell(tokens)))
    }
}

impl ArchiveProgram for Unshar {
    fn ids(&self) -> &'static [&'static str] {
        &["unshar"]
    }

    fn supports(&self, command: Command, format: Format) -> bool {
        format == Format::Shar && command == Command::Extract
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        let Operation::Extract { outdir } = job.operation else {
            return Err(job.mismatch("unshar"));
        };
        Ok(Some(
            CommandLine::new([job.executable, "-c", "-d"])
                .arg(path_str(outdir))
                .arg(job.archive_str()),
        ))
    }
}
