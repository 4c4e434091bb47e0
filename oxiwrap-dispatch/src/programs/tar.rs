//! GNU tar, star and bsdtar.

use super::{ArchiveProgram, Job, Operation, path_str};
use oxiwrap_core::{Command, CommandLine, Format, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    Gnu,
    Star,
    Bsd,
}

pub struct Tar {
    flavor: Flavor,
}

pub static TAR: Tar = Tar {
    flavor: Flavor::Gnu,
};
pub static STAR: Tar = Tar {
    flavor: Flavor::Star,
};
pub static BSDTAR: Tar = Tar {
    flavor: Flavor::Bsd,
};

impl Tar {
    fn compression_opts(&self, compression: Option<Format>) -> Vec<String> {
        let Some(compression) = compression else {
            return Vec::new();
        };
        let opts: &[&str] = match (self.flavor, compression) {
            (Flavor::Star, Format::Gzip) => &["-z"],
            (Flavor::Star, Format::Bzip2) => &["-bz"],
            (Flavor::Star, Format::Xz) => &["-xz"],
            (Flavor::Star, Format::Lzma) => &["-lzma"],
            (Flavor::Star, Format::Zstd) => &["-zstd"],
            (Flavor::Star, _) => &[],
            (_, Format::Gzip) => &["-z"],
            (_, Format::Compress) => &["-Z"],
            (_, Format::Bzip2) => &["-j"],
            (Flavor::Bsd, other) => return vec![format!("--{}", other.name())],
            // GNU tar is picky about compressor names, pass the program itself
            (Flavor::Gnu, other) => {
                return vec!["--use-compress-program".into(), other.name().into()];
            }
        };
        opts.iter().map(|s| s.to_string()).collect()
    }

    fn star(&self, job: &Job<'_>) -> CommandLine {
        let mode = match job.operation {
            Operation::Extract { .. } => "-x",
            Operation::List | Operation::Test => "-n",
            Operation::Create { .. } => "-c",
        };
        let mut cmd = CommandLine::new([job.executable, mode])
            .args(self.compression_opts(job.compression));
        if job.verbosity > 1 {
            cmd = cmd.arg("-v");
        }
        if let Operation::Extract { outdir } = job.operation {
            cmd = cmd.arg("-C").arg(path_str(outdir));
        }
        cmd = cmd.arg(format!("file={}", job.archive_str()));
        if let Operation::Create { files } = job.operation {
            cmd = cmd.args(files.iter().map(|f| path_str(f)));
        }
        cmd
    }
}

impl ArchiveProgram for Tar {
    fn ids(&self) -> &'static [&'static str] {
        match self.flavor {
            Flavor::Gnu => &["tar"],
            Flavor::Star => &["star"],
            Flavor::Bsd => &["bsdtar"],
        }
    }

    fn supports(&self, _command: Command, format: Format) -> bool {
        format == Format::Tar
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        if self.flavor == Flavor::Star {
            return Ok(Some(self.star(job)));
        }
        let mode = match job.operation {
            Operation::Extract { .. } => "--extract",
            Operation::List | Operation::Test => "--list",
            Operation::Create { .. } => "--create",
        };
        let mut cmd = CommandLine::new([job.executable, mode])
            .args(self.compression_opts(job.compression));
        if job.verbosity > 1 {
            cmd = cmd.arg("--verbose");
        }
        cmd = cmd.arg("--file").arg(job.archive_str());
        match job.operation {
            Operation::Extract { outdir } => {
                cmd = cmd.arg("--directory").arg(path_str(outdir));
            }
            Operation::Create { files } => {
                cmd = cmd.arg("--").args(files.iter().map(|f| path_str(f)));
            }
            Operation::List | Operation::Test => {}
        }
        Ok(Some(cmd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::Installed;
    use std::path::{Path, PathBuf};

    fn job<'a>(
        executable: &'a str,
        operation: Operation<'a>,
        compression: Option<Format>,
        finder: &'a Installed,
    ) -> Job<'a> {
        Job {
            archive: Path::new("/data/a.tar.gz"),
            format: Format::Tar,
            compression,
            executable,
            operation,
            verbosity: 0,
            interactive: true,
            password: None,
            finder,
        }
    }

    #[test]
    fn test_gnu_extract_gzip() {
        let finder = Installed::new(&[]);
        let op = Operation::Extract {
            outdir: Path::new("/out"),
        };
        let cmd = TAR
            .build(&job("/bin/tar", op, Some(Format::Gzip), &finder))
            .unwrap()
            .unwrap();
        assert_eq!(
            cmd.args,
            ["/bin/tar", "--extract", "-z", "--file", "/data/a.tar.gz", "--directory", "/out"]
        );
    }

    #[test]
    fn test_gnu_zstd_uses_compress_program() {
        let finder = Installed::new(&[]);
        let cmd = TAR
            .build(&job("tar", Operation::List, Some(Format::Zstd), &finder))
            .unwrap()
            .unwrap();
        assert!(cmd.contains("--use-compress-program"));
        assert!(cmd.contains("zstd"));
    }

    #[test]
    fn test_bsdtar_create() {
        let finder = Installed::new(&[]);
        let files = vec![PathBuf::from("a"), PathBuf::from("b")];
        let op = Operation::Create { files: &files };
        let cmd = BSDTAR
            .build(&job("bsdtar", op, Some(Format::Lzip), &finder))
            .unwrap()
            .unwrap();
        assert_eq!(
            cmd.args,
            ["bsdtar", "--create", "--lzip", "--file", "/data/a.tar.gz", "--", "a", "b"]
        );
    }

    #[test]
    fn test_star_extract() {
        let finder = Installed::new(&[]);
        let op = Operation::Extract {
            outdir: Path::new("/out"),
        };
        let cmd = STAR
            .build(&job("star", op, Some(Format::Bzip2), &finder))
            .unwrap()
            .unwrap();
        assert_eq!(
            cmd.args,
            ["star", "-x", "-bz", "-C", "/out", "file=/data/a.tar.gz"]
        );
    }
}
