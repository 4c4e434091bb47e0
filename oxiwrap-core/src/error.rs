//! Error types for OxiWrap operations.
//!
//! Every failure the core can report belongs to one family, [`WrapError`],
//! so callers need to handle a single error kind. Lower-level causes (I/O
//! errors from probes, spawn failures) are kept as the error source.

use crate::format::{Command, Format};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for OxiWrap operations.
#[derive(Debug, Error)]
pub enum WrapError {
    /// I/O error from the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Neither content nor file name identified a known archive format.
    #[error("unknown archive format for file `{}'{}", .path.display(), mime_note(.mime))]
    UnknownFormat {
        /// The inspected file.
        path: PathBuf,
        /// The mime type that was detected, if any.
        mime: Option<String>,
    },

    /// A format name outside the closed set.
    #[error("unsupported archive format `{name}'")]
    UnsupportedFormat {
        /// The rejected name.
        name: String,
    },

    /// The registry has no candidate program for this format and command.
    #[error("{command} archive format `{format}' is not supported")]
    UnsupportedCommand {
        /// Requested command.
        command: Command,
        /// Requested format.
        format: Format,
    },

    /// All candidates were tried and none is installed and capable.
    #[error(
        "could not find an executable program to {command} format {format}; candidates are ({})",
        .candidates.join(",")
    )]
    NoProgramFound {
        /// Requested command.
        command: Command,
        /// Requested format.
        format: Format,
        /// Every candidate program name that was tried, in order.
        candidates: Vec<String>,
    },

    /// A password was given but every candidate lacks password support.
    #[error("{command} format {format} has no program with password support")]
    PasswordUnsupported {
        /// Requested command.
        command: Command,
        /// Requested format.
        format: Format,
    },

    /// An explicitly requested program cannot handle passwords.
    #[error("program `{program}' does not support passwords to {command} format {format}")]
    ProgramLacksPassword {
        /// The requested program.
        program: String,
        /// Requested command.
        command: Command,
        /// Requested format.
        format: Format,
    },

    /// The resolved program has no builder for the command and format.
    #[error("program `{program}' has no builder to {command} format {format}")]
    NoBuilder {
        /// Normalized program identifier.
        program: String,
        /// Requested command.
        command: Command,
        /// Requested format.
        format: Format,
    },

    /// A password was supplied to a builder that cannot pass it on.
    #[error("no password support for program `{program}' to {command} format {format}")]
    NoPasswordSupport {
        /// Normalized program identifier.
        program: String,
        /// Requested command.
        command: Command,
        /// Requested format.
        format: Format,
    },

    /// The external program ran and reported failure.
    #[error("command `{command}' returned non-zero exit status {}", exit_note(.code))]
    Execution {
        /// The rendered command line.
        command: String,
        /// Exit code, `None` when killed by a signal.
        code: Option<i32>,
    },

    /// The external program could not be started.
    #[error("could not run `{program}'")]
    Spawn {
        /// The program that failed to start.
        program: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// A caller-supplied argument is unusable.
    #[error("{message}")]
    InvalidArgument {
        /// Description of the problem.
        message: String,
    },

    /// A built-in codec failed.
    #[error("{codec} error: {message}")]
    Codec {
        /// Built-in codec name.
        codec: &'static str,
        /// Description of the failure.
        message: String,
    },
}

fn mime_note(mime: &Option<String>) -> String {
    match mime {
        Some(mime) => format!(" (mime-type is `{mime}')"),
        None => String::new(),
    }
}

fn exit_note(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "(terminated by signal)".to_string(),
    }
}

/// Result type alias for OxiWrap operations.
pub type Result<T> = std::result::Result<T, WrapError>;

impl WrapError {
    /// Create an unknown format error.
    pub fn unknown_format(path: impl Into<PathBuf>, mime: Option<String>) -> Self {
        Self::UnknownFormat {
            path: path.into(),
            mime,
        }
    }

    /// Create an unsupported format error.
    pub fn unsupported_format(name: impl Into<String>) -> Self {
        Self::UnsupportedFormat { name: name.into() }
    }

    /// Create an execution error.
    pub fn execution(command: impl Into<String>, code: Option<i32>) -> Self {
        Self::Execution {
            command: command.into(),
            code,
        }
    }

    /// Create a spawn error.
    pub fn spawn(program: impl Into<String>, source: io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a codec error.
    pub fn codec(codec: &'static str, message: impl ToString) -> Self {
        Self::Codec {
            codec,
            message: message.to_string(),
        }
    }
}
