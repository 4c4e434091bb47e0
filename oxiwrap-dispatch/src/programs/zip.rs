//! Info-ZIP's zip and unzip.

use super::{ArchiveProgram, Job, Operation, path_str};
use oxiwrap_core::{Command, CommandLine, Format, Result};
use std::path::PathBuf;

pub struct Zip;
pub struct Unzip;

pub static ZIP: Zip = Zip;
pub static UNZIP: Unzip = Unzip;

impl ArchiveProgram for Zip {
    fn ids(&self) -> &'static [&'static str] {
        &["zip"]
    }

    fn supports(&self, command: Command, format: Format) -> bool {
        format == Format::Zip && matches!(command, Command::Create | Command::Test)
    }

    fn accepts_password(&self, _command: Command, _format: Format) -> bool {
        true
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        let mut cmd = CommandLine::new([job.executable]);
        if job.verbosity > 1 {
            cmd = cmd.arg("-v");
        }
        let files: &[PathBuf] = match job.operation {
            Operation::Create { files } => {
                cmd = cmd.args(["-r", "-9"]);
                files
            }
            Operation::Test => {
                cmd = cmd.arg("--test");
                &[]
            }
            _ => return Err(job.mismatch("zip")),
        };
        if let Some(password) = job.password {
            cmd = cmd.arg("--password").arg(password);
        }
        cmd = cmd.arg(job.archive_str());
        if !files.is_empty() {
            cmd = cmd.arg("--").args(files.iter().map(|f| path_str(f)));
        }
        Ok(Some(cmd))
    }
}

impl ArchiveProgram for Unzip {
    fn ids(&self) -> &'static [&'static str] {
        &["unzip"]
    }

    fn supports(&self, command: Command, format: Format) -> bool {
        format == Format::Zip && command != Command::Create
    }

    fn accepts_password(&self, _command: Command, _format: Format) -> bool {
        true
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        let mut cmd = CommandLine::new([job.executable]);
        match job.operation {
            Operation::List => cmd = cmd.arg("-l"),
            Operation::Test => cmd = cmd.arg("-t"),
            Operation::Extract { .. } => {
                if !job.interactive {
                    cmd = cmd.arg("-o");
                }
            }
            Operation::Create { .. } => return Err(job.mismatch("unzip")),
        }
        if job.verbosity > 1 {
            cmd = cmd.arg("-v");
        }
        if let Some(password) = job.password {
            cmd = cmd.arg("-P").arg(password);
        }
        cmd = cmd.arg("--").arg(job.archive_str());
        if let Operation::Extract { outdir } = job.operation {
            cmd = cmd.arg("-d").arg(path_str(outdir));
        }
        Ok(Some(cmd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::Installed;
    use std::path::Path;

    #[test]
    fn test_zip_create_with_password() {
        let finder = Installed::new(&[]);
        let files = vec![PathBuf::from("docs")];
        let job = Job {
            archive: Path::new("/data/docs.zip"),
            format: Format::Zip,
            compression: None,
            executable: "zip",
            operation: Operation::Create { files: &files },
            verbosity: 0,
            interactive: true,
            password: Some("pw"),
            finder: &*finder,
        };
        let cmd = ZIP.build(&job).unwrap().unwrap();
        assert_eq!(
            cmd.args,
            ["zip", "-r", "-9", "--password", "pw", "/data/docs.zip", "--", "docs"]
        );
    }

    #[test]
    fn test_unzip_extract() {
        let finder = Installed::new(&[]);
        let job = Job {
            archive: Path::new("/data/docs.zip"),
            format: Format::Zip,
            compression: None,
            executable: "unzip",
            operation: Operation::Extract {
                outdir: Path::new("/out"),
            },
            verbosity: 0,
            interactive: true,
            password: None,
            finder: &*finder,
        };
        let cmd = UNZIP.build(&job).unwrap().unwrap();
        assert_eq!(cmd.args, ["unzip", "--", "/data/docs.zip", "-d", "/out"]);
    }
}
