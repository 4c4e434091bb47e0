//! Older and niche archivers with one program per format.

use super::{ArchiveProgram, Job, Operation, path_str};
use oxiwrap_core::{Command, CommandLine, Format, Result};

/// A single-format archiver described by its command support.
pub struct Legacy {
    ids: &'static [&'static str],
    format: Format,
    commands: &'static [Command],
    syntax: fn(&Job<'_>) -> Option<CommandLine>,
}

const ALL: &[Command] = &[Command::Extract, Command::List, Command::Test, Command::Create];
const READ: &[Command] = &[Command::Extract, Command::List, Command::Test];

pub static AR: Legacy = Legacy {
    ids: &["ar"],
    format: Format::Ar,
    commands: ALL,
    syntax: ar,
};
pub static ARC: Legacy = Legacy {
    ids: &["arc"],
    format: Format::Arc,
    commands: ALL,
    syntax: arc,
};
pub static NOMARCH: Legacy = Legacy {
    ids: &["nomarch"],
    format: Format::Arc,
    commands: READ,
    syntax: nomarch,
};
pub static ARJ: Legacy = Legacy {
    ids: &["arj"],
    format: Format::Arj,
    commands: ALL,
    syntax: arj,
};
pub static LHA: Legacy = Legacy {
    ids: &["lha"],
    format: Format::Lzh,
    commands: ALL,
    syntax: lha,
};
pub static LHASA: Legacy = Legacy {
    ids: &["lhasa"],
    format: Format::Lzh,
    commands: READ,
    syntax: lhasa,
};
pub static UNACE: Legacy = Legacy {
    ids: &["unace"],
    format: Format::Ace,
    commands: READ,
    syntax: unace,
};
pub static UNADF: Legacy = Legacy {
    ids: &["unadf"],
    format: Format::Adf,
    commands: READ,
    syntax: unadf,
};
pub static UNALZ: Legacy = Legacy {
    ids: &["unalz"],
    format: Format::Alzip,
    commands: READ,
    syntax: unalz,
};
pub static ZOO: Legacy = Legacy {
    ids: &["zoo"],
    format: Format::Zoo,
    commands: ALL,
    syntax: zoo,
};
pub static ZPAQ: Legacy = Legacy {
    ids: &["zpaq"],
    format: Format::Zpaq,
    commands: ALL,
    syntax: zpaq,
};

fn verbose(job: &Job<'_>, flag: &str) -> String {
    if job.verbosity > 1 {
        format!("{flag}v")
    } else {
        flag.to_string()
    }
}

fn files_of(job: &Job<'_>) -> Vec<String> {
    match job.operation {
        Operation::Create { files } => files.iter().map(|f| path_str(f)).collect(),
        _ => Vec::new(),
    }
}

fn ar(job: &Job<'_>) -> Option<CommandLine> {
    let exe = job.executable;
    Some(match job.operation {
        Operation::Extract { outdir } => CommandLine::new([exe])
            .arg(verbose(job, "x"))
            .arg(job.archive_str())
            .with_cwd(outdir),
        Operation::List | Operation::Test => CommandLine::new([exe])
            .arg(verbose(job, "t"))
            .arg(job.archive_str()),
        Operation::Create { .. } => CommandLine::new([exe])
            .arg(verbose(job, "rc"))
            .arg(job.archive_str())
            .args(files_of(job)),
    })
}

fn arc(job: &Job<'_>) -> Option<CommandLine> {
    let exe = job.executable;
    Some(match job.operation {
        Operation::Extract { outdir } => CommandLine::new([exe, "x"])
            .arg(job.archive_str())
            .with_cwd(outdir),
        Operation::List => {
            let mode = if job.verbosity > 1 { "v" } else { "l" };
            CommandLine::new([exe, mode]).arg(job.archive_str())
        }
        Operation::Test => CommandLine::new([exe, "t"]).arg(job.archive_str()),
        Operation::Create { .. } => CommandLine::new([exe, "a"])
            .arg(job.archive_str())
            .args(files_of(job)),
    })
}

fn nomarch(job: &Job<'_>) -> Option<CommandLine> {
    let exe = job.executable;
    match job.operation {
        Operation::Extract { outdir } => Some(
            CommandLine::new([exe])
                .arg(job.archive_str())
                .with_cwd(outdir),
        ),
        Operation::List => {
            let mut cmd = CommandLine::new([exe, "-l"]);
            if job.verbosity > 1 {
                cmd = cmd.arg("-v");
            }
            Some(cmd.arg(job.archive_str()))
        }
        Operation::Test => Some(CommandLine::new([exe, "-t"]).arg(job.archive_str())),
        Operation::Create { .. } => None,
    }
}

fn arj(job: &Job<'_>) -> Option<CommandLine> {
    let mut cmd = CommandLine::new([job.executable]);
    cmd = match job.operation {
        Operation::Extract { .. } => cmd.args(["x", "-r"]),
        Operation::List => cmd.arg(if job.verbosity > 1 { "v" } else { "l" }),
        Operation::Test => cmd.arg("t"),
        Operation::Create { .. } => cmd.args(["a", "-r"]),
    };
    if let Some(password) = job.password {
        cmd = cmd.arg(format!("-g{password}"));
    }
    if !job.interactive && matches!(job.command(), Command::Extract | Command::Create) {
        cmd = cmd.arg("-y");
    }
    cmd = cmd.arg(job.archive_str());
    Some(match job.operation {
        Operation::Extract { outdir } => cmd.arg(path_str(outdir)),
        _ => cmd.args(files_of(job)),
    })
}

fn lha(job: &Job<'_>) -> Option<CommandLine> {
    let exe = job.executable;
    Some(match job.operation {
        Operation::Extract { outdir } => {
            let mode = format!("{}w={}", verbose(job, "x"), path_str(outdir));
            CommandLine::new([exe]).arg(mode).arg(job.archive_str())
        }
        Operation::List => {
            let mode = if job.verbosity > 1 { "v" } else { "l" };
            CommandLine::new([exe, mode]).arg(job.archive_str())
        }
        Operation::Test => CommandLine::new([exe])
            .arg(verbose(job, "t"))
            .arg(job.archive_str()),
        Operation::Create { .. } => CommandLine::new([exe])
            .arg(verbose(job, "a"))
            .arg(job.archive_str())
            .args(files_of(job)),
    })
}

fn lhasa(job: &Job<'_>) -> Option<CommandLine> {
    let exe = job.executable;
    match job.operation {
        Operation::Extract { outdir } => Some(
            CommandLine::new([exe])
                .arg(format!("-xw={}", path_str(outdir)))
                .arg(job.archive_str()),
        ),
        Operation::List => Some(CommandLine::new([exe, "-l"]).arg(job.archive_str())),
        Operation::Test => Some(CommandLine::new([exe, "-t"]).arg(job.archive_str())),
        Operation::Create { .. } => None,
    }
}

fn unace(job: &Job<'_>) -> Option<CommandLine> {
    let exe = job.executable;
    match job.operation {
        Operation::Extract { outdir } => {
            let mut dir = path_str(outdir);
            if !dir.ends_with(std::path::MAIN_SEPARATOR) {
                dir.push(std::path::MAIN_SEPARATOR);
            }
            Some(CommandLine::new([exe, "x"]).arg(job.archive_str()).arg(dir))
        }
        Operation::List => {
            let mode = if job.verbosity > 1 { "v" } else { "l" };
            Some(CommandLine::new([exe, mode]).arg(job.archive_str()))
        }
        Operation::Test => Some(CommandLine::new([exe, "t"]).arg(job.archive_str())),
        Operation::Create { .. } => None,
    }
}

fn unadf(job: &Job<'_>) -> Option<CommandLine> {
    let exe = job.executable;
    match job.operation {
        Operation::Extract { outdir } => Some(
            CommandLine::new([exe])
                .arg(job.archive_str())
                .arg("-d")
                .arg(path_str(outdir)),
        ),
        Operation::List | Operation::Test => {
            Some(CommandLine::new([exe, "-l"]).arg(job.archive_str()))
        }
        Operation::Create { .. } => None,
    }
}

fn unalz(job: &Job<'_>) -> Option<CommandLine> {
    let exe = job.executable;
    match job.operation {
        Operation::Extract { outdir } => Some(
            CommandLine::new([exe])
                .arg(job.archive_str())
                .arg(path_str(outdir)),
        ),
        Operation::List | Operation::Test => {
            Some(CommandLine::new([exe, "-l"]).arg(job.archive_str()))
        }
        Operation::Create { .. } => None,
    }
}

fn zoo(job: &Job<'_>) -> Option<CommandLine> {
    let exe = job.executable;
    Some(match job.operation {
        Operation::Extract { outdir } => CommandLine::new([exe, "-extract"])
            .arg(job.archive_str())
            .with_cwd(outdir),
        Operation::List => CommandLine::new([exe, "-list"]).arg(job.archive_str()),
        Operation::Test => CommandLine::new([exe, "-test"]).arg(job.archive_str()),
        Operation::Create { .. } => CommandLine::new([exe, "-add"])
            .arg(job.archive_str())
            .args(files_of(job)),
    })
}

fn zpaq(job: &Job<'_>) -> Option<CommandLine> {
    let exe = job.executable;
    Some(match job.operation {
        Operation::Extract { outdir } => CommandLine::new([exe, "x"])
            .arg(job.archive_str())
            .with_cwd(outdir),
        Operation::List => CommandLine::new([exe, "l"]).arg(job.archive_str()),
        Operation::Test => CommandLine::new([exe, "x"])
            .arg(job.archive_str())
            .arg("-test"),
        Operation::Create { .. } => CommandLine::new([exe, "a"])
            .arg(job.archive_str())
            .args(files_of(job))
            .args(["-method", "4"]),
    })
}

impl ArchiveProgram for Legacy {
    fn ids(&self) -> &'static [&'static str] {
        self.ids
    }

    fn supports(&self, command: Command, format: Format) -> bool {
        format == self.format && self.commands.contains(&command)
    }

    fn accepts_password(&self, _command: Command, _format: Format) -> bool {
        self.ids == ["arj"]
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        let name = self.ids.join("/");
        if !self.supports(job.command(), job.format) {
            return Err(job.mismatch(&name));
        }
        (self.syntax)(job)
            .map(Some)
            .ok_or_else(|| job.mismatch(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::Installed;
    use std::path::{Path, PathBuf};

    fn job<'a>(
        format: Format,
        executable: &'a str,
        operation: Operation<'a>,
        finder: &'a Installed,
    ) -> Job<'a> {
        Job {
            archive: Path::new("/data/old.bin"),
            format,
            compression: None,
            executable,
            operation,
            verbosity: 0,
            interactive: false,
            password: None,
            finder,
        }
    }

    #[test]
    fn test_ar_extract_runs_in_outdir() {
        let finder = Installed::new(&[]);
        let job = job(
            Format::Ar,
            "ar",
            Operation::Extract {
                outdir: Path::new("/out"),
            },
            &finder,
        );
        let cmd = AR.build(&job).unwrap().unwrap();
        assert_eq!(cmd.args, ["ar", "x", "/data/old.bin"]);
        assert_eq!(cmd.cwd.as_deref(), Some(Path::new("/out")));
    }

    #[test]
    fn test_arj_password_and_yes() {
        let finder = Installed::new(&[]);
        let mut job = job(
            Format::Arj,
            "arj",
            Operation::Extract {
                outdir: Path::new("/out"),
            },
            &finder,
        );
        job.password = Some("secret");
        let cmd = ARJ.build(&job).unwrap().unwrap();
        assert_eq!(
            cmd.args,
            ["arj", "x", "-r", "-gsecret", "-y", "/data/old.bin", "/out"]
        );
        assert!(ARJ.accepts_password(Command::Extract, Format::Arj));
        assert!(!ZOO.accepts_password(Command::Extract, Format::Zoo));
    }

    #[test]
    fn test_zpaq_create() {
        let finder = Installed::new(&[]);
        let files = vec![PathBuf::from("a"), PathBuf::from("b")];
        let job = job(
            Format::Zpaq,
            "zpaq",
            Operation::Create { files: &files },
            &finder,
        );
        let cmd = ZPAQ.build(&job).unwrap().unwrap();
        assert_eq!(
            cmd.args,
            ["zpaq", "a", "/data/old.bin", "a", "b", "-method", "4"]
        );
    }

    #[test]
    fn test_extract_only_tool_rejects_create() {
        let finder = Installed::new(&[]);
        let files = vec![PathBuf::from("a")];
        let job = job(Format::Ace, "unace", Operation::Create { files: &files }, &finder);
        assert!(UNACE.build(&job).is_err());
        assert!(!UNACE.supports(Command::Create, Format::Ace));
    }
}
