//! GNU cpio and bsdcpio.

use super::{ArchiveProgram, Job, Operation, path_str, quote, quote_path};
use oxiwrap_core::{Command, CommandLine, Format, Result};

pub struct Cpio;

pub static CPIO: Cpio = Cpio;

/// Shell tokens for `cpio --extract` reading the archive from stdin.
///
/// GNU cpio gets extra guards against absolute and `..` member paths.
pub(super) fn extract_tokens(executable: &str, verbosity: i8) -> Result<Vec<String>> {
    let mut tokens = vec![
        quote(executable)?,
        "--extract".into(),
        "--make-directories".into(),
        "--preserve-modification-time".into(),
    ];
    if cfg!(target_os = "linux") && !executable.ends_with("bsdcpio") {
        tokens.extend([
            "--no-absolute-filenames".into(),
            "--force-local".into(),
            "--nonmatching".into(),
            r#""*\.\.*""#.into(),
        ]);
    }
    if verbosity > 1 {
        tokens.push("-v".into());
    }
    Ok(tokens)
}

impl ArchiveProgram for Cpio {
    fn ids(&self) -> &'static [&'static str] {
        &["cpio", "bsdcpio"]
    }

    fn supports(&self, _command: Command, format: Format) -> bool {
        format == Format::Cpio
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        let cmd = match job.operation {
            Operation::Extract { outdir } => {
                let mut tokens = extract_tokens(job.executable, job.verbosity)?;
                tokens.extend(["<".to_string(), quote_path(job.archive)?]);
                CommandLine::shell(tokens).with_cwd(outdir)
            }
            Operation::List | Operation::Test => {
                let mut cmd = CommandLine::new([job.executable, "-t"]);
                if job.verbosity > 1 {
                    cmd = cmd.arg("-v");
                }
                cmd.arg("-F").arg(job.archive_str())
            }
            Operation::Create { files } => {
                let mut tokens = vec!["find".to_string()];
                for file in files {
                    tokens.push(quote_path(file)?);
                }
                tokens.extend([
                    "-print0".to_string(),
                    "|".into(),
                    quote(job.executable)?,
                    "--create".into(),
                    "--null".into(),
                ]);
                if job.verbosity > 1 {
                    tokens.push("-v".into());
                }
                tokens.extend([">".to_string(), quote(&path_str(job.archive))?]);
                CommandLine::shell(tokens)
            }
        };
        Ok(Some(cmd))
    }
}
