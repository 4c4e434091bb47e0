//! Test doubles for the collaborator traits.

use oxiwrap_core::{
    Captured, CodecProbe, CommandLine, CommandRunner, ExecutableFinder, Format, MimeSniffer,
    Result, Sniffed,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A fixed set of installed programs under `/usr/bin`.
pub struct Installed(HashMap<String, PathBuf>);

impl Installed {
    pub fn new(names: &[&str]) -> Arc<Self> {
        Arc::new(Self(
            names
                .iter()
                .map(|n| (n.to_string(), PathBuf::from("/usr/bin").join(n)))
                .collect(),
        ))
    }
}

impl ExecutableFinder for Installed {
    fn find(&self, name: &str) -> Option<PathBuf> {
        self.0.get(name).cloned()
    }
}

/// Records every command and answers with a scripted exit code.
#[derive(Default)]
pub struct ScriptedRunner {
    pub calls: Mutex<Vec<CommandLine>>,
    pub code: i32,
    pub stdout: String,
}

impl ScriptedRunner {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(code: i32) -> Arc<Self> {
        Arc::new(Self {
            code,
            ..Self::default()
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
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &CommandLine) -> Result<Option<i32>> {
        self.calls.lock().unwrap().push(command.clone());
        Ok(Some(self.code))
    }

    fn capture(&self, command: &CommandLine) -> Result<Captured> {
        self.calls.lock().unwrap().push(command.clone());
        Ok(Captured {
            code: Some(self.code),
            stdout: self.stdout.clone(),
        })
    }
}

/// Answers every codec question the same way.
pub struct FixedCodecs(pub bool);

impl CodecProbe for FixedCodecs {
    fn supports(&self, _executable: &Path, _format: Format) -> bool {
        self.0
    }
}

/// Never recognizes content, so detection relies on file names.
pub struct BlindSniffer;

impl MimeSniffer for BlindSniffer {
    fn sniff(&self, _path: &Path) -> Result<Sniffed> {
        Ok(Sniffed::default())
    }

    fn sniff_uncompressed(&self, _path: &Path) -> Result<Sniffed> {
        Ok(Sniffed::default())
    }
}
