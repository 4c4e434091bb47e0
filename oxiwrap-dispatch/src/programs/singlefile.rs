//! Single-stream compressors.
//!
//! Most of them follow the gzip command syntax: `-c -d` decompresses to
//! stdout, `-t` tests, `-c` compresses to stdout. Extraction and creation
//! therefore run through the shell with a redirection.

use super::{
    ArchiveProgram, Job, Operation, path_str, quote, quote_path, single_file, single_outfile,
};
use oxiwrap_core::{Command, CommandLine, Format, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    /// gzip-like stdin/stdout syntax.
    Stream { end_of_options: bool },
    Lz4,
    Lzop,
    Lrzip,
    Rzip,
}

const ALL: &[Command] = &[Command::Extract, Command::List, Command::Test, Command::Create];
const NO_LIST: &[Command] = &[Command::Extract, Command::Test, Command::Create];
const READ: &[Command] = &[Command::Extract, Command::Test];

pub struct Compressor {
    ids: &'static [&'static str],
    caps: &'static [(Format, &'static [Command])],
    style: Style,
}

const STREAM: Style = Style::Stream {
    end_of_options: true,
};

pub static GZIP: Compressor = Compressor {
    ids: &["gzip"],
    caps: &[(Format::Gzip, ALL), (Format::Compress, READ)],
    style: STREAM,
};
pub static PIGZ: Compressor = Compressor {
    ids: &["pigz"],
    caps: &[(Format::Gzip, ALL)],
    style: STREAM,
};
pub static ZOPFLI: Compressor = Compressor {
    ids: &["zopfli"],
    caps: &[(Format::Gzip, &[Command::Create])],
    style: Style::Stream {
        end_of_options: false,
    },
};
pub static BZIP2: Compressor = Compressor {
    ids: &["bzip2", "pbzip2", "lbzip2"],
    caps: &[(Format::Bzip2, NO_LIST)],
    style: STREAM,
};
pub static XZ: Compressor = Compressor {
    ids: &["xz"],
    caps: &[(Format::Xz, ALL), (Format::Lzma, NO_LIST)],
    style: STREAM,
};
pub static LZMA: Compressor = Compressor {
    ids: &["lzma"],
    caps: &[(Format::Lzma, NO_LIST)],
    style: STREAM,
};
pub static LZIP: Compressor = Compressor {
    ids: &["lzip", "plzip", "clzip", "pdlzip"],
    caps: &[(Format::Lzip, NO_LIST)],
    style: STREAM,
};
pub static ZSTD: Compressor = Compressor {
    ids: &["zstd"],
    caps: &[(Format::Zstd, ALL)],
    style: STREAM,
};
pub static COMPRESS: Compressor = Compressor {
    ids: &["compress"],
    caps: &[(Format::Compress, &[Command::Create])],
    style: Style::Stream {
        end_of_options: false,
    },
};
pub static UNCOMPRESS: Compressor = Compressor {
    ids: &["uncompress"],
    caps: &[(Format::Compress, &[Command::Extract])],
    style: Style::Stream {
        end_of_options: false,
    },
};
pub static LZ4: Compressor = Compressor {
    ids: &["lz4"],
    caps: &[(Format::Lz4, ALL)],
    style: Style::Lz4,
};
pub static LZOP: Compressor = Compressor {
    ids: &["lzop"],
    caps: &[(Format::Lzop, ALL)],
    style: Style::Lzop,
};
pub static LRZIP: Compressor = Compressor {
    ids: &["lrzip"],
    caps: &[(Format::Lrzip, NO_LIST)],
    style: Style::Lrzip,
};
pub static RZIP: Compressor = Compressor {
    ids: &["rzip"],
    caps: &[(Format::Rzip, &[Command::Extract, Command::Create])],
    style: Style::Rzip,
};

impl Compressor {
    /// `--format=lzma` when xz handles lzma streams.
    fn format_opts(&self, job: &Job<'_>) -> Option<&'static str> {
        (self.ids == ["xz"] && job.format == Format::Lzma).then_some("--format=lzma")
    }

    fn stream(&self, job: &Job<'_>, end_of_options: bool) -> Result<CommandLine> {
        let verbose = job.verbosity > 1;
        let tail: &[&str] = if end_of_options { &["--"] } else { &[] };
        let cmd = match job.operation {
            Operation::Extract { outdir } => {
                let target = single_outfile(outdir, job.archive, "");
                let mut tokens = vec![quote(job.executable)?];
                if verbose {
                    tokens.push("-v".into());
                }
                tokens.extend(["-c".to_string(), "-d".to_string()]);
                tokens.extend(self.format_opts(job).map(str::to_string));
                tokens.extend(tail.iter().map(|s| s.to_string()));
                tokens.extend([quote_path(job.archive)?, ">".into(), quote_path(&target)?]);
                CommandLine::shell(tokens)
            }
            Operation::Create { files } => {
                let mut tokens = vec![quote(job.executable)?];
                if verbose {
                    tokens.push("-v".into());
                }
                tokens.push("-c".into());
                tokens.extend(self.format_opts(job).map(str::to_string));
                tokens.extend(tail.iter().map(|s| s.to_string()));
                for file in files {
                    tokens.push(quote_path(file)?);
                }
                tokens.extend([">".to_string(), quote_path(job.archive)?]);
                CommandLine::shell(tokens)
            }
            Operation::Test | Operation::List => {
                let (flag, verbose) = if job.command() == Command::Test {
                    ("-t", verbose)
                } else {
                    ("-l", job.verbosity > 0)
                };
                let mut cmd = CommandLine::new([job.executable, flag]);
                if verbose {
                    cmd = cmd.arg("-v");
                }
                cmd.args(self.format_opts(job))
                    .args(tail.iter().copied())
                    .arg(job.archive_str())
            }
        };
        Ok(cmd)
    }

    fn lz4(&self, job: &Job<'_>) -> Result<CommandLine> {
        let cmd = CommandLine::new([job.executable]);
        Ok(match job.operation {
            Operation::Extract { outdir } => cmd
                .arg("-d")
                .arg(job.archive_str())
                .arg(path_str(&single_outfile(outdir, job.archive, ""))),
            Operation::List => cmd.arg("--list").arg(job.archive_str()),
            Operation::Test => cmd.arg("-t").arg(job.archive_str()),
            Operation::Create { files } => cmd
                .arg(path_str(single_file(files, "lz4")?))
                .arg(job.archive_str()),
        })
    }

    fn lzop(&self, job: &Job<'_>) -> CommandLine {
        let mut cmd = CommandLine::new([job.executable]);
        cmd = match job.operation {
            Operation::Extract { outdir } => cmd
                .arg("-d")
                .arg(format!("--path={}", path_str(outdir))),
            Operation::List => cmd.arg("-l"),
            Operation::Test => cmd.arg("-t"),
            Operation::Create { .. } => cmd.arg("-o").arg(job.archive_str()),
        };
        if job.verbosity > 1 {
            cmd = cmd.arg("-v");
        }
        cmd = cmd.arg("--");
        match job.operation {
            Operation::Create { files } => cmd.args(files.iter().map(|f| path_str(f))),
            _ => cmd.arg(job.archive_str()),
        }
    }

    fn lrzip(&self, job: &Job<'_>) -> Result<CommandLine> {
        let mut cmd = CommandLine::new([job.executable]);
        if job.verbosity > 1 {
            cmd = cmd.arg("-v");
        }
        Ok(match job.operation {
            Operation::Extract { outdir } => cmd
                .arg("-d")
                .arg("-o")
                .arg(path_str(&single_outfile(outdir, job.archive, "")))
                .arg("--")
                .arg(job.archive_str()),
            Operation::Create { files } => cmd
                .arg("-o")
                .arg(job.archive_str())
                .arg("--")
                .arg(path_str(single_file(files, "lrzip")?)),
            Operation::Test | Operation::List => cmd.arg("-t").arg("--").arg(job.archive_str()),
        })
    }

    fn rzip(&self, job: &Job<'_>) -> Result<CommandLine> {
        let mut cmd = CommandLine::new([job.executable, "-k"]);
        if job.verbosity > 1 {
            cmd = cmd.arg("-v");
        }
        Ok(match job.operation {
            Operation::Create { files } => cmd
                .arg("-o")
                .arg(job.archive_str())
                .arg(path_str(single_file(files, "rzip")?)),
            Operation::Extract { outdir } => cmd
                .arg("-d")
                .arg("-o")
                .arg(path_str(&single_outfile(outdir, job.archive, "")))
                .arg(job.archive_str()),
            Operation::Test | Operation::List => return Err(job.mismatch("rzip")),
        })
    }
}

impl ArchiveProgram for Compressor {
    fn ids(&self) -> &'static [&'static str] {
        self.ids
    }

    fn supports(&self, command: Command, format: Format) -> bool {
        self.caps
            .iter()
            .any(|(f, commands)| *f == format && commands.contains(&command))
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        let cmd = match self.style {
            Style::Stream { end_of_options } => self.stream(job, end_of_options)?,
            Style::Lz4 => self.lz4(job)?,
            Style::Lzop => self.lzop(job),
            Style::Lrzip => self.lrzip(job)?,
            Style::Rzip => self.rzip(job)?,
        };
        Ok(Some(cmd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::Installed;
    use std::path::{Path, PathBuf};

    fn job<'a>(
        archive: &'a Path,
        format: Format,
        operation: Operation<'a>,
        finder: &'a Installed,
    ) -> Job<'a> {
        Job {
            archive,
            format,
            compression: None,
            executable: "/usr/bin/gzip",
            operation,
            verbosity: 0,
            interactive: true,
            password: None,
            finder,
        }
    }

    #[test]
    fn test_gzip_create_compresses() {
        let finder = Installed::new(&[]);
        let files = vec![PathBuf::from("report.txt")];
        let op = Operation::Create { files: &files };
        let cmd = GZIP
            .build(&job(Path::new("/tmp/report.txt.gz"), Format::Gzip, op, &finder))
            .unwrap()
            .unwrap();
        assert!(cmd.shell);
        assert!(cmd.contains("-c"));
        assert!(!cmd.contains("-d"));
        assert_eq!(cmd.script(), "/usr/bin/gzip -c -- report.txt > /tmp/report.txt.gz");
    }

    #[test]
    fn test_gzip_extract_redirects_to_outfile() {
        let finder = Installed::new(&[]);
        let out = tempfile::tempdir().unwrap();
        let op = Operation::Extract { outdir: out.path() };
        let cmd = GZIP
            .build(&job(Path::new("/tmp/notes.gz"), Format::Gzip, op, &finder))
            .unwrap()
            .unwrap();
        let target = out.path().join("notes");
        assert_eq!(
            cmd.script(),
            format!("/usr/bin/gzip -c -d -- /tmp/notes.gz > {}", target.display())
        );
    }

    #[test]
    fn test_xz_handles_lzma() {
        let finder = Installed::new(&[]);
        let mut j = job(Path::new("/tmp/a.lzma"), Format::Lzma, Operation::Test, &finder);
        j.executable = "xz";
        let cmd = XZ.build(&j).unwrap().unwrap();
        assert_eq!(cmd.args, ["xz", "-t", "--format=lzma", "--", "/tmp/a.lzma"]);
    }

    #[test]
    fn test_capabilities() {
        assert!(GZIP.supports(Command::Extract, Format::Compress));
        assert!(!GZIP.supports(Command::Create, Format::Compress));
        assert!(!BZIP2.supports(Command::List, Format::Bzip2));
        assert!(ZSTD.supports(Command::List, Format::Zstd));
    }

    #[test]
    fn test_lz4_create_needs_single_file() {
        let finder = Installed::new(&[]);
        let files = vec![PathBuf::from("a"), PathBuf::from("b")];
        let op = Operation::Create { files: &files };
        let j = job(Path::new("/tmp/a.lz4"), Format::Lz4, op, &finder);
        assert!(LZ4.build(&j).is_err());
    }
}
