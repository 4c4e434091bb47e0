//! Cabinet and ISO image tools.

use super::{ArchiveProgram, Job, Operation, path_str};
use oxiwrap_core::{Command, CommandLine, Format, Result};

pub struct Cabextract;
pub struct Lcab;
pub struct Genisoimage;
pub struct Isoinfo;

pub static CABEXTRACT: Cabextract = Cabextract;
pub static LCAB: Lcab = Lcab;
pub static GENISOIMAGE: Genisoimage = Genisoimage;
pub static ISOINFO: Isoinfo = Isoinfo;

impl ArchiveProgram for Cabextract {
    fn ids(&self) -> &'static [&'static str] {
        &["cabextract"]
    }

    fn supports(&self, command: Command, format: Format) -> bool {
        format == Format::Cab && command != Command::Create
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        let mut cmd = CommandLine::new([job.executable]);
        if job.verbosity < 1 {
            cmd = cmd.arg("-q");
        }
        cmd = match job.operation {
            Operation::Extract { outdir } => cmd.arg("-d").arg(path_str(outdir)),
            Operation::List => cmd.arg("-l"),
            Operation::Test => cmd.arg("-t"),
            Operation::Create { .. } => return Err(job.mismatch("cabextract")),
        };
        Ok(Some(cmd.arg(job.archive_str())))
    }
}

impl ArchiveProgram for Lcab {
    fn ids(&self) -> &'static [&'static str] {
        &["lcab"]
    }

    fn supports(&self, command: Command, format: Format) -> bool {
        format == Format::Cab && command == Command::Create
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        let Operation::Create { files } = job.operation else {
            return Err(job.mismatch("lcab"));
        };
        let mut cmd = CommandLine::new([job.executable, "-r"]);
        if job.verbosity > 1 {
            cmd = cmd.arg("-v");
        }
        Ok(Some(
            cmd.args(files.iter().map(|f| path_str(f)))
                .arg(job.archive_str()),
        ))
    }
}

impl ArchiveProgram for Genisoimage {
    fn ids(&self) -> &'static [&'static str] {
        &["genisoimage"]
    }

    fn supports(&self, command: Command, format: Format) -> bool {
        format == Format::Iso && command == Command::Create
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        let Operation::Create { files } = job.operation else {
            return Err(job.mismatch("genisoimage"));
        };
        let mut cmd = CommandLine::new([job.executable, "-J", "-R"]);
        if job.verbosity < 1 {
            cmd = cmd.arg("-quiet");
        }
        Ok(Some(
            cmd.arg("-o")
                .arg(job.archive_str())
                .args(files.iter().map(|f| path_str(f))),
        ))
    }
}

impl ArchiveProgram for Isoinfo {
    fn ids(&self) -> &'static [&'static str] {
        &["isoinfo"]
    }

    fn supports(&self, command: Command, format: Format) -> bool {
        format == Format::Iso && command == Command::List
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        if job.command() != Command::List {
            return Err(job.mismatch("isoinfo"));
        }
        let mode = if job.verbosity > 0 { "-d" } else { "-l" };
        Ok(Some(
            CommandLine::new([job.executable, mode, "-i"]).arg(job.archive_str()),
        ))
    }
}
