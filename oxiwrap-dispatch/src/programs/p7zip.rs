//! The 7-Zip family: 7z, 7za, 7zz and 7zzs share one command syntax.

use super::{ArchiveProgram, Job, Operation, path_str};
use oxiwrap_core::{Command, CommandLine, Format, Result};

pub struct P7zip;

pub static P7ZIP: P7zip = P7zip;

/// Formats 7-Zip can read.
const READABLE: &[Format] = &[
    Format::SevenZip,
    Format::Arj,
    Format::Bzip2,
    Format::Cab,
    Format::Compress,
    Format::Cpio,
    Format::Deb,
    Format::Gzip,
    Format::Iso,
    Format::Lzma,
    Format::Rar,
    Format::Rpm,
    Format::Xz,
    Format::Zip,
];

/// The `-t` archive type for formats 7-Zip can write.
fn archive_type(format: Format) -> Option<&'static str> {
    match format {
        Format::SevenZip => Some("7z"),
        Format::Zip => Some("zip"),
        Format::Bzip2 => Some("bzip2"),
        Format::Gzip => Some("gzip"),
        Format::Xz => Some("xz"),
        _ => None,
    }
}

impl ArchiveProgram for P7zip {
    fn ids(&self) -> &'static [&'static str] {
        &["p7zip"]
    }

    fn supports(&self, command: Command, format: Format) -> bool {
        match command {
            Command::Create => archive_type(format).is_some(),
            _ => READABLE.contains(&format),
        }
    }

    fn accepts_password(&self, _command: Command, format: Format) -> bool {
        matches!(format, Format::SevenZip | Format::Zip | Format::Rar)
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        let mode = match job.operation {
            Operation::Extract { .. } => "x",
            Operation::List => "l",
            Operation::Test => "t",
            Operation::Create { .. } => "a",
        };
        let mut cmd = CommandLine::new([job.executable, mode]);
        if !job.interactive {
            cmd = cmd.arg("-y");
        }
        if let Some(password) = job.password {
            cmd = cmd.arg(format!("-p{password}"));
        }
        match job.operation {
            Operation::Extract { outdir } => {
                cmd = cmd
                    .arg(format!("-o{}", path_str(outdir)))
                    .arg("--")
                    .arg(job.archive_str());
            }
            Operation::Create { files } => {
                let kind = archive_type(job.format).ok_or_else(|| job.mismatch("p7zip"))?;
                cmd = cmd
                    .arg(format!("-t{kind}"))
                    .arg("-mx=9")
                    .arg("--")
                    .arg(job.archive_str())
                    .args(files.iter().map(|f| path_str(f)));
            }
            Operation::List | Operation::Test => {
                cmd = cmd.arg("--").arg(job.archive_str());
            }
        }
        Ok(Some(cmd))
    }
}
