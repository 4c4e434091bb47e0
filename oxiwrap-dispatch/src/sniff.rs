//! Content sniffing through `file(1)`.

use crate::magic::MagicSniffer;
use oxiwrap_core::{CommandLine, CommandRunner, ExecutableFinder, MimeSniffer, Result, Sniffed};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Runs `file --brief --mime` and parses its answer.
pub struct FileSniffer {
    finder: Arc<dyn ExecutableFinder>,
    runner: Arc<dyn CommandRunner>,
}

impl FileSniffer {
    /// Create a sniffer using the given collaborators.
    pub fn new(finder: Arc<dyn ExecutableFinder>, runner: Arc<dyn CommandRunner>) -> Self {
        Self { finder, runner }
    }

    /// Check whether `file` is installed.
    pub fn available(&self) -> bool {
        self.finder.find("file").is_some()
    }

    fn run(&self, path: &Path, uncompress: bool) -> Result<Sniffed> {
        let Some(program) = self.finder.find("file") else {
            return Ok(Sniffed::default());
        };
        let mut cmd = CommandLine::new([program.to_string_lossy().into_owned()])
            .args(["--brief", "--mime"]);
        if uncompress {
            cmd = cmd.arg("--uncompress");
        }
        let cmd = cmd.arg("--").arg(path.to_string_lossy().into_owned());
        let captured = self.runner.capture(&cmd)?;
        if !captured.success() {
            debug!(command = %cmd, code = ?captured.code, "file(1) failed");
            return Ok(Sniffed::default());
        }
        Ok(parse_file_output(&captured.stdout))
    }
}

impl MimeSniffer for FileSniffer {
    fn sniff(&self, path: &Path) -> Result<Sniffed> {
        self.run(path, false)
    }

    fn sniff_uncompressed(&self, path: &Path) -> Result<Sniffed> {
        self.run(path, true)
    }
}

/// Parse `application/x-tar; charset=binary compressed-encoding=application/gzip; ...`.
pub fn parse_file_output(output: &str) -> Sniffed {
    let line = output.trim();
    let mime = line
        .split(';')
        .next()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string);
    let encoding = line.split_once("compressed-encoding=").and_then(|(_, rest)| {
        rest.split(|c: char| c == ';' || c.is_whitespace())
            .next()
            .filter(|e| !e.is_empty())
            .map(str::to_string)
    });
    Sniffed { mime, encoding }
}

/// Uses `file(1)` when installed and the built-in signatures otherwise.
pub struct SystemSniffer {
    file: FileSniffer,
    magic: MagicSniffer,
}

impl SystemSniffer {
    /// Create a sniffer using the given collaborators.
    pub fn new(finder: Arc<dyn ExecutableFinder>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            file: FileSniffer::new(finder, runner),
            magic: MagicSniffer::new(),
        }
    }
}

impl MimeSniffer for SystemSniffer {
    fn sniff(&self, path: &Path) -> Result<Sniffed> {
        if self.file.available() {
            self.file.sniff(path)
        } else {
            self.magic.sniff(path)
        }
    }

    fn sniff_uncompressed(&self, path: &Path) -> Result<Sniffed> {
        if self.file.available() {
            self.file.sniff_uncompressed(path)
        } else {
            self.magic.sniff_uncompressed(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        assert_eq!(
            parse_file_output("application/zip; charset=binary\n"),
            Sniffed::mime("application/zip")
        );
    }

    #[test]
    fn test_parse_uncompressed() {
        let out = "application/x-tar; charset=binary compressed-encoding=application/gzip; charset=binary\n";
        assert_eq!(
            parse_file_output(out),
            Sniffed::wrapped("application/x-tar", "application/gzip")
        );
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse_file_output(""), Sniffed::default());
    }
}
