//! RARLAB rar and unrar.

use super::{ArchiveProgram, Job, Operation, path_str};
use oxiwrap_core::{Command, CommandLine, Format, Result};

pub struct Rar {
    can_create: bool,
}

pub static RAR: Rar = Rar { can_create: true };
pub static UNRAR: Rar = Rar { can_create: false };

impl ArchiveProgram for Rar {
    fn ids(&self) -> &'static [&'static str] {
        if self.can_create { &["rar"] } else { &["unrar"] }
    }

    fn supports(&self, command: Command, format: Format) -> bool {
        format == Format::Rar && (self.can_create || command != Command::Create)
    }

    fn accepts_password(&self, _command: Command, _format: Format) -> bool {
        true
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        let mode = match job.operation {
            Operation::Extract { .. } => "x",
            Operation::List if job.verbosity > 0 => "v",
            Operation::List => "l",
            Operation::Test => "t",
            Operation::Create { .. } => "a",
        };
        let mut cmd = CommandLine::new([job.executable, mode]);
        match job.password {
            Some(password) => cmd = cmd.arg(format!("-p{password}")),
            None if !job.interactive => cmd = cmd.arg("-p-"),
            None => {}
        }
        if !job.interactive {
            cmd = cmd.arg("-y");
        }
        match job.operation {
            Operation::Create { files } => {
                cmd = cmd
                    .args(["-r", "-m5", "--"])
                    .arg(job.archive_str())
                    .args(files.iter().map(|f| path_str(f)));
            }
            Operation::Extract { outdir } => {
                cmd = cmd.arg("--").arg(job.archive_str()).with_cwd(outdir);
            }
            Operation::List | Operation::Test => {
                cmd = cmd.arg("--").arg(job.archive_str());
            }
        }
        Ok(Some(cmd))
    }
}
