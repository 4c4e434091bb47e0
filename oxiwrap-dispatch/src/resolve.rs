//! Program resolution.
//!
//! Picks one installed, capable program for a (format, command) pair:
//!
//! 1. Candidates come from the registry: an explicit program first, then the
//!    bucket for every command, then the command-specific bucket.
//! 2. With a password, programs known to lack password support are removed.
//! 3. Each candidate must be installed (built-ins always are), pass the codec
//!    gate of the universal archivers and handle the compression, either
//!    natively or because a separate program exists for the compression.
//! 4. When every candidate fails and a compression is present, resolution is
//!    retried once with the compression as the format.

use crate::dispatch::normalize;
use crate::mime::encoding_mime;
use crate::probe::{CompressionSupport, is_universal};
use crate::registry::{candidates, is_builtin, lacks_password};
use oxiwrap_core::{
    CodecProbe, Command, CommandRunner, ExecutableFinder, Format, Result, WrapError,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where a resolved program lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Executable {
    /// An external program on disk.
    Path(PathBuf),
    /// An in-process codec.
    Builtin,
}

/// A resolved program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// The candidate name as listed or requested.
    pub name: String,
    /// Where it was found.
    pub executable: Executable,
}

impl Program {
    /// The normalized identifier used for builder lookup.
    pub fn id(&self) -> String {
        match &self.executable {
            Executable::Path(path) => normalize(&path.to_string_lossy()),
            Executable::Builtin => self.name.clone(),
        }
    }

    /// The path of an external program.
    pub fn path(&self) -> Option<&Path> {
        match &self.executable {
            Executable::Path(path) => Some(path),
            Executable::Builtin => None,
        }
    }

    /// The executable as passed to a builder: the path, or the built-in name.
    pub fn executable_str(&self) -> String {
        match &self.executable {
            Executable::Path(path) => path.to_string_lossy().into_owned(),
            Executable::Builtin => self.name.clone(),
        }
    }
}

/// The inputs of one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveRequest<'a> {
    /// Archive format.
    pub format: Format,
    /// Requested command.
    pub command: Command,
    /// Program requested by the caller.
    pub program: Option<&'a str>,
    /// Archive password.
    pub password: Option<&'a str>,
    /// Compression layered under the format.
    pub compression: Option<Format>,
}

impl<'a> ResolveRequest<'a> {
    /// A request without program, password or compression.
    pub fn new(format: Format, command: Command) -> Self {
        Self {
            format,
            command,
            program: None,
            password: None,
            compression: None,
        }
    }

    /// Request a specific program.
    pub fn program(mut self, program: Option<&'a str>) -> Self {
        self.program = program;
        self
    }

    /// Supply a password.
    pub fn password(mut self, password: Option<&'a str>) -> Self {
        self.password = password;
        self
    }

    /// Set the compression.
    pub fn compression(mut self, compression: Option<Format>) -> Self {
        self.compression = compression;
        self
    }
}

/// The outcome of resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The chosen program.
    pub program: Program,
    /// The command to run.
    pub command: Command,
    /// The format the program handles; the compression after a fallback.
    pub format: Format,
    /// Compression the program must handle, `None` after a fallback.
    pub compression: Option<Format>,
    /// The format originally requested.
    pub requested: Format,
    /// Set when the compression-as-format fallback was taken.
    pub fallback: bool,
}

/// Chooses programs for (format, command) pairs.
pub struct Resolver {
    finder: Arc<dyn ExecutableFinder>,
    codecs: Arc<dyn CodecProbe>,
    compression: CompressionSupport,
}

impl Resolver {
    /// Create a resolver. `finder` should already be memoized.
    pub fn new(
        finder: Arc<dyn ExecutableFinder>,
        runner: Arc<dyn CommandRunner>,
        codecs: Arc<dyn CodecProbe>,
    ) -> Self {
        Self {
            compression: CompressionSupport::new(finder.clone(), runner),
            finder,
            codecs,
        }
    }

    /// Resolve a program, falling back to the compression alone when no
    /// program handles the combination.
    pub fn resolve(&self, request: &ResolveRequest<'_>) -> Result<Resolution> {
        let mut tried = Vec::new();
        let mut format = request.format;
        let mut compression = request.compression;
        let mut program = request.program;
        let mut password = request.password;

        for attempt in 0..2 {
            let outcome = self.resolve_once(
                format,
                request.command,
                program,
                password,
                compression,
                &mut tried,
            );
            match outcome {
                Ok(found) => {
                    info!(
                        program = %found.name,
                        command = %request.command,
                        %format,
                        compression = ?compression,
                        "resolved"
                    );
                    return Ok(Resolution {
                        program: found,
                        command: request.command,
                        format,
                        compression,
                        requested: request.format,
                        fallback: attempt > 0,
                    });
                }
                Err(WrapError::NoProgramFound { .. }) if attempt == 0 => {
                    let Some(fallback) = compression
                        .filter(|c| *c != format && encoding_mime(*c).is_some())
                    else {
                        break;
                    };
                    warn!(
                        command = %request.command,
                        %format,
                        compression = %fallback,
                        "no program handles the combination, using the compression alone"
                    );
                    format = fallback;
                    compression = None;
                    program = None;
                    // The password belongs to the container, not the compression.
                    password = None;
                }
                Err(WrapError::NoProgramFound { .. }) => break,
                Err(e) if attempt == 0 => return Err(e),
                Err(e) => {
                    debug!(error = %e, "compression fallback failed");
                    break;
                }
            }
        }

        Err(WrapError::NoProgramFound {
            command: request.command,
            format: request.format,
            candidates: tried,
        })
    }

    fn resolve_once(
        &self,
        format: Format,
        command: Command,
        explicit: Option<&str>,
        password: Option<&str>,
        compression: Option<Format>,
        tried: &mut Vec<String>,
    ) -> Result<Program> {
        let mut programs: Vec<String> = explicit.map(str::to_string).into_iter().collect();
        programs.extend(candidates(format, command).into_iter().map(str::to_string));

        if password.is_some() {
            if let Some(name) = explicit {
                if lacks_password(format, command, &normalize(name)) {
                    return Err(WrapError::ProgramLacksPassword {
                        program: name.to_string(),
                        command,
                        format,
                    });
                }
            }
            let before = programs.len();
            programs.retain(|name| !lacks_password(format, command, name));
            if before > 0 && programs.is_empty() {
                return Err(WrapError::PasswordUnsupported { command, format });
            }
        }

        if programs.is_empty() {
            return Err(WrapError::UnsupportedCommand { command, format });
        }

        for name in programs {
            if !tried.contains(&name) {
                tried.push(name.clone());
            }
            if let Some(program) = self.accept(&name, format, command, compression) {
                return Ok(program);
            }
        }

        Err(WrapError::NoProgramFound {
            command,
            format,
            candidates: tried.clone(),
        })
    }

    /// Run the availability and capability gates on one candidate.
    fn accept(
        &self,
        name: &str,
        format: Format,
        command: Command,
        compression: Option<Format>,
    ) -> Option<Program> {
        let builtin = is_builtin(name);
        let executable = if builtin {
            Executable::Builtin
        } else {
            let Some(path) = self.finder.find(name) else {
                debug!(program = name, "not installed");
                return None;
            };
            Executable::Path(path)
        };
        let program = Program {
            name: name.to_string(),
            executable,
        };
        let id = program.id();

        if let Some(path) = program.path() {
            if is_universal(&id) && !self.codecs.supports(path, format) {
                debug!(program = name, %format, "codec not available");
                return None;
            }
        }

        if let Some(compression) = compression {
            if !self
                .compression
                .native(command, &id, program.path(), compression)
            {
                if builtin {
                    debug!(program = name, %compression, "built-in lacks compression");
                    return None;
                }
                let command = match command {
                    Command::Create => Command::Create,
                    _ => Command::Extract,
                };
                let mut scratch = Vec::new();
                if let Err(e) = self.resolve_once(compression, command, None, None, None, &mut scratch)
                {
                    debug!(program = name, %compression, error = %e, "no separate compressor");
                    return None;
                }
            }
        }

        Some(program)
    }
}
