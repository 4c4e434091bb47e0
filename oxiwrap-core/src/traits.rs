//! Collaborator traits.
//!
//! The resolution engine never touches the search path, child processes or
//! the `file(1)` magic database directly. It goes through these traits so
//! that every probe can be replaced by a fake in tests.

use crate::command::CommandLine;
use crate::error::Result;
use crate::format::Format;
use std::path::{Path, PathBuf};

/// Locates executables on the search path.
pub trait ExecutableFinder: Send + Sync {
    /// Resolve a program name (or path) to an executable file.
    fn find(&self, name: &str) -> Option<PathBuf>;
}

/// Output captured from a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    /// Exit code, `None` when killed by a signal.
    pub code: Option<i32>,
    /// Standard output decoded lossily.
    pub stdout: String,
}

impl Captured {
    /// Check for a zero exit code.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs child processes to completion.
///
/// Both methods block until the child exits. There is no timeout.
pub trait CommandRunner: Send + Sync {
    /// Run with inherited stdio and return the exit code.
    fn run(&self, command: &CommandLine) -> Result<Option<i32>>;

    /// Run with stdout captured.
    fn capture(&self, command: &CommandLine) -> Result<Captured>;
}

/// A content-sniffing answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sniffed {
    /// Detected mime type, e.g. `application/x-tar`.
    pub mime: Option<String>,
    /// Mime type of the wrapping encoding, e.g. `application/gzip` for a
    /// tar file inside gzip.
    pub encoding: Option<String>,
}

impl Sniffed {
    /// A plain mime answer without encoding.
    pub fn mime(mime: impl Into<String>) -> Self {
        Self {
            mime: Some(mime.into()),
            encoding: None,
        }
    }

    /// A mime answer for content found inside an encoding.
    pub fn wrapped(mime: impl Into<String>, encoding: impl Into<String>) -> Self {
        Self {
            mime: Some(mime.into()),
            encoding: Some(encoding.into()),
        }
    }
}

/// Content-based mime detection.
pub trait MimeSniffer: Send + Sync {
    /// Detect the outer mime type of a file.
    fn sniff(&self, path: &Path) -> Result<Sniffed>;

    /// Decompress a wrapped file and detect what is inside.
    fn sniff_uncompressed(&self, path: &Path) -> Result<Sniffed>;
}

/// Probes optional codec support of universal archivers (the 7-Zip family).
pub trait CodecProbe: Send + Sync {
    /// Check whether the archiver at `executable` can handle `format`.
    fn supports(&self, executable: &Path, format: Format) -> bool;
}
