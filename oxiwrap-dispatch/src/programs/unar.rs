//! The Unarchiver's unar and lsar.

use super::{ArchiveProgram, Job, Operation, path_str};
use oxiwrap_core::{Command, CommandLine, Format, Result};

pub struct Unar {
    lister: bool,
}

pub static UNAR: Unar = Unar { lister: false };
pub static LSAR: Unar = Unar { lister: true };

impl ArchiveProgram for Unar {
    fn ids(&self) -> &'static [&'static str] {
        if self.lister { &["lsar"] } else { &["unar"] }
    }

    fn supports(&self, command: Command, format: Format) -> bool {
        let command_ok = if self.lister {
            matches!(command, Command::List | Command::Test)
        } else {
            command == Command::Extract
        };
        command_ok && matches!(format, Format::SevenZip | Format::Rar | Format::Tar)
    }

    fn accepts_password(&self, _command: Command, _format: Format) -> bool {
        true
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        let mut cmd = CommandLine::new([job.executable]);
        match job.operation {
            Operation::Extract { outdir } => {
                cmd = cmd.arg("-o").arg(path_str(outdir));
                if !job.interactive {
                    cmd = cmd.arg("-force-overwrite");
                }
            }
            Operation::List if job.verbosity > 1 => cmd = cmd.arg("-l"),
            Operation::List => {}
            Operation::Test => cmd = cmd.arg("-test"),
            Operation::Create { .. } => return Err(job.mismatch(self.ids()[0])),
        }
        if let Some(password) = job.password {
            cmd = cmd.arg("-p").arg(password);
        }
        Ok(Some(cmd.arg("--").arg(job.archive_str())))
    }
}
