//! Shared test doubles.

#![allow(dead_code)]

use oxiwrap_core::{
    Captured, CodecProbe, CommandLine, CommandRunner, ExecutableFinder, Format, Result, RunConfig,
};
use oxiwrap_dispatch::{Archiver, MagicSniffer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Pretends a fixed set of programs lives in `/usr/bin`.
pub struct Installed(HashSet<String>);

impl Installed {
    pub fn new(names: &[&str]) -> Arc<Self> {
        Arc::new(Self(names.iter().map(|n| n.to_string()).collect()))
    }
}

impl ExecutableFinder for Installed {
    fn find(&self, name: &str) -> Option<PathBuf> {
        self.0
            .contains(name)
            .then(|| PathBuf::from("/usr/bin").join(name))
    }
}

/// Records commands instead of running them.
pub struct Recorder {
    code: i32,
    calls: Mutex<Vec<CommandLine>>,
}

impl Recorder {
    pub fn exiting(code: i32) -> Arc<Self> {
        Arc::new(Self {
            code,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn scripts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(CommandLine::script)
            .collect()
    }

    pub fn calls(&self) -> Vec<CommandLine> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for Recorder {
    fn run(&self, command: &CommandLine) -> Result<Option<i32>> {
        self.calls.lock().unwrap().push(command.clone());
        Ok(Some(self.code))
    }

    fn capture(&self, command: &CommandLine) -> Result<Captured> {
        self.calls.lock().unwrap().push(command.clone());
        Ok(Captured {
            code: Some(self.code),
            stdout: String::new(),
        })
    }
}

/// Universal archivers with or without the optional codecs.
pub struct Codecs(pub bool);

impl CodecProbe for Codecs {
    fn supports(&self, _executable: &Path, _format: Format) -> bool {
        self.0
    }
}

/// An archiver over fake programs, sniffing content with built-in
/// signatures.
pub fn archiver(installed: &[&str], runner: Arc<Recorder>) -> Archiver {
    Archiver::new(
        Installed::new(installed),
        runner,
        Arc::new(MagicSniffer::new()),
        Arc::new(Codecs(true)),
        RunConfig::new(0, false),
    )
}

/// Write a small source tree and return its root.
pub fn source_tree(dir: &Path) -> PathBuf {
    let root = dir.join("project");
    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::write(root.join("README"), b"read me\n").unwrap();
    std::fs::write(root.join("src/lib.rs"), b"pub fn answer() -> u32 { 42 }\n").unwrap();
    root
}
