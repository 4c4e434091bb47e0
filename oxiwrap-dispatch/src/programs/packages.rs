//! Package formats: rpm, rpm2cpio and dpkg-deb.

use super::cpio::extract_tokens;
use super::{ArchiveProgram, Job, Operation, path_str, quote, quote_path};
use oxiwrap_core::{Command, CommandLine, Format, Result, WrapError};

pub struct Rpm;
pub struct Rpm2cpio;
pub struct Dpkg;

pub static RPM: Rpm = Rpm;
pub static RPM2CPIO: Rpm2cpio = Rpm2cpio;
pub static DPKG: Dpkg = Dpkg;

impl ArchiveProgram for Rpm {
    fn ids(&self) -> &'static [&'static str] {
        &["rpm"]
    }

    fn supports(&self, command: Command, format: Format) -> bool {
        format == Format::Rpm && matches!(command, Command::List | Command::Test)
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        let cmd = match job.operation {
            Operation::List => {
                let mut cmd = CommandLine::new([job.executable, "-q", "-l"]);
                if job.verbosity > 1 {
                    cmd = cmd.arg("-v");
                }
                cmd.args(["-p", "--"]).arg(job.archive_str())
            }
            Operation::Test => CommandLine::new([job.executable, "-V", "-p", "--"])
                .arg(job.archive_str()),
            _ => return Err(job.mismatch("rpm")),
        };
        Ok(Some(cmd))
    }
}

impl ArchiveProgram for Rpm2cpio {
    fn ids(&self) -> &'static [&'static str] {
        &["rpm2cpio"]
    }

    fn supports(&self, command: Command, format: Format) -> bool {
        format == Format::Rpm && command == Command::Extract
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        let Operation::Extract { outdir } = job.operation else {
            return Err(job.mismatch("rpm2cpio"));
        };
        let cpio = job
            .finder
            .find("cpio")
            .ok_or_else(|| WrapError::NoProgramFound {
                command: Command::Extract,
                format: Format::Cpio,
                candidates: vec!["cpio".to_string()],
            })?;
        let mut tokens = vec![quote(job.executable)?, quote_path(job.archive)?, "|".into()];
        tokens.extend(extract_tokens(&path_str(&cpio), job.verbosity)?);
        Ok(Some(CommandLine::shell(tokens).with_cwd(outdir)))
    }
}

impl ArchiveProgram for Dpkg {
    fn ids(&self) -> &'static [&'static str] {
        &["dpkg"]
    }

    fn supports(&self, command: Command, format: Format) -> bool {
        format == Format::Deb && command != Command::Create
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        let cmd = match job.operation {
            Operation::Extract { outdir } => {
                let mode = if job.verbosity > 1 { "--vextract" } else { "--extract" };
                CommandLine::new([job.executable, mode, "--"])
                    .arg(job.archive_str())
                    .arg(path_str(outdir))
            }
            Operation::List => {
                CommandLine::new([job.executable, "--contents", "--"]).arg(job.archive_str())
            }
            Operation::Test => {
                CommandLine::new([job.executable, "--info", "--"]).arg(job.archive_str())
            }
            Operation::Create { .. } => return Err(job.mismatch("dpkg")),
        };
        Ok(Some(cmd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::Installed;
    use std::path::Path;

    fn extract_job<'a>(finder: &'a Installed) -> Job<'a> {
        Job {
            archive: Path::new("/data/pkg.rpm"),
            format: Format::Rpm,
            compression: None,
            executable: "/usr/bin/rpm2cpio",
            operation: Operation::Extract {
                outdir: Path::new("/out"),
            },
            verbosity: 0,
            interactive: true,
            password: None,
            finder,
        }
    }

    #[test]
    fn test_rpm2cpio_pipes_into_cpio() {
        let finder = Installed::new(&["cpio"]);
        let cmd = RPM2CPIO.build(&extract_job(&finder)).unwrap().unwrap();
        assert!(cmd.shell);
        assert!(cmd.script().starts_with(
            "/usr/bin/rpm2cpio /data/pkg.rpm | /usr/bin/cpio --extract --make-directories"
        ));
        assert_eq!(cmd.cwd.as_deref(), Some(Path::new("/out")));
    }

    #[test]
    fn test_rpm2cpio_requires_cpio() {
        let finder = Installed::new(&[]);
        assert!(matches!(
            RPM2CPIO.build(&extract_job(&finder)),
            Err(WrapError::NoProgramFound { .. })
        ));
    }
}
