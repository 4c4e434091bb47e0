//! Command lines produced by program builders.
//!
//! A [`CommandLine`] is created fresh for one operation, handed to the
//! process runner once, and dropped. In shell mode the arguments are already
//! shell-quoted tokens (redirections and pipes included) that the runner
//! joins with spaces.

use std::fmt;
use std::path::{Path, PathBuf};

/// An argument vector plus the execution options it needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandLine {
    /// Program followed by its arguments, or shell tokens in shell mode.
    pub args: Vec<String>,
    /// Run through the platform shell.
    pub shell: bool,
    /// Working directory for the child process.
    pub cwd: Option<PathBuf>,
    /// Discard the child's standard output.
    pub quiet: bool,
}

impl CommandLine {
    /// Create a command executed directly.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Create a command executed by the shell. Tokens must be pre-quoted.
    pub fn shell<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            shell: true,
            ..Self::new(tokens)
        }
    }

    /// Set the working directory.
    pub fn with_cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The program (first token).
    pub fn program(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// Check whether an exact argument is present.
    pub fn contains(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    /// The shell script for shell mode.
    pub fn script(&self) -> String {
        self.args.join(" ")
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.script())?;
        if let Some(cwd) = &self.cwd {
            write!(f, " (cwd={})", cwd.display())?;
        }
        Ok(())
    }
}
