//! Collaborators backed by the real system: the search path and child
//! processes.

use oxiwrap_core::{Captured, CommandLine, CommandRunner, ExecutableFinder, Result, WrapError};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

/// Search-path lookups through `which`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhichFinder;

impl ExecutableFinder for WhichFinder {
    fn find(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }
}

/// Runs commands with `std::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(line: &CommandLine) -> Result<Command> {
        let mut command = if line.shell {
            Self::shell(line)?
        } else {
            let (program, args) = line
                .args
                .split_first()
                .ok_or_else(|| WrapError::invalid_argument("empty command line"))?;
            let mut command = Command::new(program);
            command.args(args);
            command
        };
        if let Some(cwd) = &line.cwd {
            command.current_dir(cwd);
        }
        if line.quiet {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
        Ok(command)
    }

    /// Shell tokens are POSIX-quoted, so only `sh` can run them.
    #[cfg(unix)]
    fn shell(line: &CommandLine) -> Result<Command> {
        let mut shell = Command::new("sh");
        shell.arg("-c").arg(line.script());
        Ok(shell)
    }

    #[cfg(not(unix))]
    fn shell(line: &CommandLine) -> Result<Command> {
        Err(WrapError::invalid_argument(format!(
            "shell command lines need a POSIX shell: {line}"
        )))
    }

    fn program_name(line: &CommandLine) -> String {
        if line.shell {
            "sh".to_string()
        } else {
            line.program().unwrap_or_default().to_string()
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, line: &CommandLine) -> Result<Option<i32>> {
        debug!(command = %line, cwd = ?line.cwd, "running");
        let status = Self::command(line)?
            .stdin(Stdio::inherit())
            .status()
            .map_err(|e| WrapError::spawn(Self::program_name(line), e))?;
        Ok(status.code())
    }

    fn capture(&self, line: &CommandLine) -> Result<Captured> {
        debug!(command = %line, "capturing");
        let mut command = Self::command(line)?;
        command.stdin(Stdio::null()).stderr(Stdio::null());
        let output = command
            .output()
            .map_err(|e| WrapError::spawn(Self::program_name(line), e))?;
        Ok(Captured {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
