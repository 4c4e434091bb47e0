//! The operations callers use: extract, list, test, create, diff, search
//! and repack.
//!
//! Every operation runs the same pipeline: detect the format (skipped when
//! the caller names it), resolve a program, dispatch to its builder and run
//! the resulting command. A resolution that fell back to the compression
//! alone is completed in two stages through a staging directory.

use crate::detect::{Detected, Detector};
use crate::dispatch;
use crate::outdir::{cleanup_outdir, content_root, entries, make_tmpdir, single_entry, staging_dir};
use crate::probe::{ExecutableCache, SevenZipCodecs};
use crate::programs::{Job, Operation, stripext};
use crate::resolve::{Executable, Resolution, ResolveRequest, Resolver};
use crate::sniff::SystemSniffer;
use crate::system::{SystemRunner, WhichFinder};
use oxiwrap_core::{
    CodecProbe, Command, CommandLine, CommandRunner, ExecutableFinder, Format, MimeSniffer,
    Result, RunConfig, WrapError,
};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Per-call choices that override detection and resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveOptions<'a> {
    /// Archive format, skipping detection.
    pub format: Option<Format>,
    /// Compression, used together with `format`.
    pub compression: Option<Format>,
    /// Program to try before the registry candidates.
    pub program: Option<&'a str>,
    /// Archive password.
    pub password: Option<&'a str>,
}

impl<'a> ArchiveOptions<'a> {
    /// Options with nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the format and compression.
    pub fn format(mut self, format: Option<Format>, compression: Option<Format>) -> Self {
        self.format = format;
        self.compression = compression;
        self
    }

    /// Prefer a program.
    pub fn program(mut self, program: Option<&'a str>) -> Self {
        self.program = program;
        self
    }

    /// Supply a password.
    pub fn password(mut self, password: Option<&'a str>) -> Self {
        self.password = password;
        self
    }
}

/// Availability of one command for one format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSupport {
    /// Command name.
    pub command: &'static str,
    /// Program that would run, if any.
    pub program: Option<String>,
    /// Human readable status.
    pub status: String,
}

/// Availability report for one format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatSupport {
    /// Format name.
    pub format: &'static str,
    /// Format description.
    pub description: &'static str,
    /// Per-command availability.
    pub commands: Vec<CommandSupport>,
}

/// Drives archive operations through detection, resolution and dispatch.
pub struct Archiver {
    config: RunConfig,
    finder: Arc<ExecutableCache>,
    runner: Arc<dyn CommandRunner>,
    detector: Detector,
    resolver: Resolver,
}

impl Archiver {
    /// Build an archiver from explicit collaborators.
    ///
    /// Executable lookups made through `finder` are memoized.
    pub fn new(
        finder: Arc<dyn ExecutableFinder>,
        runner: Arc<dyn CommandRunner>,
        sniffer: Arc<dyn MimeSniffer>,
        codecs: Arc<dyn CodecProbe>,
        config: RunConfig,
    ) -> Self {
        Self::assemble(
            Arc::new(ExecutableCache::new(finder)),
            runner,
            sniffer,
            codecs,
            config,
        )
    }

    /// Build an archiver on the real search path and process runner.
    pub fn system(config: RunConfig) -> Self {
        let finder = Arc::new(ExecutableCache::new(Arc::new(WhichFinder)));
        let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner);
        let sniffer = Arc::new(SystemSniffer::new(finder.clone(), runner.clone()));
        let codecs = Arc::new(SevenZipCodecs::new(runner.clone()));
        Self::assemble(finder, runner, sniffer, codecs, config)
    }

    fn assemble(
        finder: Arc<ExecutableCache>,
        runner: Arc<dyn CommandRunner>,
        sniffer: Arc<dyn MimeSniffer>,
        codecs: Arc<dyn CodecProbe>,
        config: RunConfig,
    ) -> Self {
        Self {
            resolver: Resolver::new(finder.clone(), runner.clone(), codecs),
            detector: Detector::new(sniffer),
            finder,
            runner,
            config,
        }
    }

    /// The run configuration.
    pub fn config(&self) -> RunConfig {
        self.config
    }

    /// The format detector, for inspecting or seeding its cache.
    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    /// Extract an archive and return where its content ended up.
    ///
    /// Without `outdir` a fresh directory is created in the working
    /// directory and flattened afterwards.
    pub fn extract(
        &self,
        archive: &Path,
        outdir: Option<&Path>,
        options: &ArchiveOptions<'_>,
    ) -> Result<PathBuf> {
        let archive = existing_file(archive)?;
        let detected = self.format_of(&archive, options)?;
        let (target, fresh) = match outdir {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                (dir.to_path_buf(), false)
            }
            None => (make_tmpdir(&std::env::current_dir()?)?, true),
        };

        match self.extract_into(&archive, detected, &target, options) {
            Ok(()) if fresh => cleanup_outdir(&target, &archive),
            Ok(()) => Ok(target),
            Err(e) => {
                if fresh {
                    if let Err(rm) = fs::remove_dir(&target) {
                        debug!(dir = %target.display(), error = %rm, "output directory kept");
                    }
                }
                Err(e)
            }
        }
    }

    /// Print the contents of an archive.
    pub fn list(&self, archive: &Path, options: &ArchiveOptions<'_>) -> Result<()> {
        self.inspect(archive, Command::List, options)
    }

    /// Verify an archive.
    pub fn test(&self, archive: &Path, options: &ArchiveOptions<'_>) -> Result<()> {
        self.inspect(archive, Command::Test, options)
    }

    /// Create a new archive from files. The archive must not exist yet.
    pub fn create(
        &self,
        archive: &Path,
        files: &[PathBuf],
        options: &ArchiveOptions<'_>,
    ) -> Result<()> {
        let archive = new_file(archive)?;
        if files.is_empty() {
            return Err(WrapError::invalid_argument("nothing to archive"));
        }
        for file in files {
            if fs::symlink_metadata(file).is_err() {
                return Err(WrapError::invalid_argument(format!(
                    "file `{}' was not found",
                    file.display()
                )));
            }
        }
        let detected = match options.format {
            Some(_) => self.format_of(&archive, options)?,
            None => self.detector.detect_by_name(&archive)?,
        };
        self.create_from(&archive, files, None, detected, options)
    }

    /// Compare the contents of two archives with `diff -urN`.
    ///
    /// Returns 0 when they match and 1 when they differ.
    pub fn diff(&self, first: &Path, second: &Path, options: &ArchiveOptions<'_>) -> Result<i32> {
        let left = staging_dir()?;
        let right = staging_dir()?;
        self.extract_plain(first, left.path(), options)?;
        self.extract_plain(second, right.path(), options)?;
        let diff = self.tool("diff")?;
        let cmd = CommandLine::new([diff, "-urN".to_string()])
            .arg(content_root(left.path())?.to_string_lossy())
            .arg(content_root(right.path())?.to_string_lossy());
        self.run_tolerant(&cmd)
    }

    /// Search the extracted contents of an archive with `grep -r`.
    ///
    /// Returns 0 when the pattern was found and 1 when it was not.
    pub fn search(
        &self,
        pattern: &str,
        archive: &Path,
        options: &ArchiveOptions<'_>,
    ) -> Result<i32> {
        let dir = staging_dir()?;
        self.extract_plain(archive, dir.path(), options)?;
        let grep = self.tool("grep")?;
        let cmd = CommandLine::new([grep, "-r".to_string(), "-e".to_string()])
            .arg(pattern)
            .arg(".")
            .with_cwd(dir.path());
        self.run_tolerant(&cmd)
    }

    /// Convert an archive to another format, chosen by the target's name.
    pub fn repack(
        &self,
        source: &Path,
        target: &Path,
        options: &ArchiveOptions<'_>,
    ) -> Result<()> {
        let source = existing_file(source)?;
        let target = new_file(target)?;
        let (format, compression) = self.format_of(&source, options)?;
        let (new_format, new_compression) = self.detector.detect_by_name(&target)?;

        if (format, compression) == (new_format, new_compression) {
            info!(target = %target.display(), "same format, linking");
            if fs::hard_link(&source, &target).is_err() {
                fs::copy(&source, &target)?;
            }
            return Ok(());
        }

        if format == new_format && (compression.is_some() || new_compression.is_some()) {
            return self.recompress(&source, &target, compression, new_compression);
        }

        let dir = staging_dir()?;
        self.extract_into(&source, (format, compression), dir.path(), options)?;
        let files = entries(dir.path())?;
        let unpacked = ArchiveOptions::new().password(options.password);
        self.create_from(
            &target,
            &files,
            Some(dir.path()),
            (new_format, new_compression),
            &unpacked,
        )
    }

    /// What every format and command would resolve to on this machine.
    pub fn formats(&self) -> Vec<FormatSupport> {
        Format::ALL
            .iter()
            .map(|format| FormatSupport {
                format: format.name(),
                description: format.description(),
                commands: Command::ALL
                    .iter()
                    .map(|command| self.command_support(*format, *command))
                    .collect(),
            })
            .collect()
    }

    fn command_support(&self, format: Format, command: Command) -> CommandSupport {
        match self.resolver.resolve(&ResolveRequest::new(format, command)) {
            Ok(resolution) => {
                let status = match resolution.program.executable {
                    Executable::Builtin => "built-in".to_string(),
                    Executable::Path(ref path) => path.display().to_string(),
                };
                CommandSupport {
                    command: command.name(),
                    program: Some(resolution.program.name),
                    status,
                }
            }
            Err(WrapError::UnsupportedCommand { .. }) => CommandSupport {
                command: command.name(),
                program: None,
                status: "not supported".to_string(),
            },
            Err(WrapError::NoProgramFound { candidates, .. }) => CommandSupport {
                command: command.name(),
                program: None,
                status: format!("missing, install one of: {}", candidates.join(", ")),
            },
            Err(e) => CommandSupport {
                command: command.name(),
                program: None,
                status: e.to_string(),
            },
        }
    }

    fn format_of(&self, archive: &Path, options: &ArchiveOptions<'_>) -> Result<Detected> {
        match options.format {
            Some(format) => Ok((format, options.compression.filter(|c| *c != format))),
            None => self.detector.detect(archive),
        }
    }

    fn inspect(&self, archive: &Path, command: Command, options: &ArchiveOptions<'_>) -> Result<()> {
        let archive = existing_file(archive)?;
        let (format, compression) = self.format_of(&archive, options)?;
        let request = ResolveRequest::new(format, command)
            .program(options.program)
            .password(options.password)
            .compression(compression);
        let resolution = self.resolver.resolve(&request)?;
        let operation = match command {
            Command::List => Operation::List,
            _ => Operation::Test,
        };
        let password = options.password.filter(|_| !resolution.fallback);
        self.execute(&resolution, &archive, operation, password, None)
    }

    /// Extract into a throwaway directory without flattening.
    fn extract_plain(&self, archive: &Path, dir: &Path, options: &ArchiveOptions<'_>) -> Result<()> {
        let archive = existing_file(archive)?;
        let detected = self.format_of(&archive, options)?;
        self.extract_into(&archive, detected, dir, options)
    }

    fn extract_into(
        &self,
        archive: &Path,
        (format, compression): Detected,
        outdir: &Path,
        options: &ArchiveOptions<'_>,
    ) -> Result<()> {
        let request = ResolveRequest::new(format, Command::Extract)
            .program(options.program)
            .password(options.password)
            .compression(compression);
        let resolution = self.resolver.resolve(&request)?;
        if !resolution.fallback {
            return self.execute(
                &resolution,
                archive,
                Operation::Extract { outdir },
                options.password,
                None,
            );
        }

        // Decompress first, then unpack the bare container.
        let staging = staging_dir()?;
        self.execute(
            &resolution,
            archive,
            Operation::Extract {
                outdir: staging.path(),
            },
            None,
            None,
        )?;
        let inner = single_entry(staging.path())?;
        let request = ResolveRequest::new(resolution.requested, Command::Extract)
            .program(options.program)
            .password(options.password);
        let container = self.resolver.resolve(&request)?;
        self.execute(
            &container,
            &inner,
            Operation::Extract { outdir },
            options.password,
            None,
        )
    }

    /// Create `archive` from `files`. With `cwd`, external programs run
    /// there and get the file names relative to it.
    fn create_from(
        &self,
        archive: &Path,
        files: &[PathBuf],
        cwd: Option<&Path>,
        (format, compression): Detected,
        options: &ArchiveOptions<'_>,
    ) -> Result<()> {
        let request = ResolveRequest::new(format, Command::Create)
            .program(options.program)
            .password(options.password)
            .compression(compression);
        let resolution = self.resolver.resolve(&request)?;
        if !resolution.fallback {
            let files = relative_to(files, cwd, &resolution);
            return self.execute(
                &resolution,
                archive,
                Operation::Create { files: &files },
                options.password,
                cwd,
            );
        }

        // Build the bare container, then compress it.
        let staging = staging_dir()?;
        let container_path = staging.path().join(stripext(archive));
        let request = ResolveRequest::new(resolution.requested, Command::Create)
            .program(options.program)
            .password(options.password);
        let container = self.resolver.resolve(&request)?;
        let files = relative_to(files, cwd, &container);
        self.execute(
            &container,
            &container_path,
            Operation::Create { files: &files },
            options.password,
            cwd,
        )?;
        self.execute(
            &resolution,
            archive,
            Operation::Create {
                files: std::slice::from_ref(&container_path),
            },
            None,
            None,
        )
    }

    /// Swap one compression for another around the same container.
    fn recompress(
        &self,
        source: &Path,
        target: &Path,
        from: Option<Format>,
        to: Option<Format>,
    ) -> Result<()> {
        let staging = staging_dir()?;
        let bare = match from {
            Some(compression) => {
                let resolution = self
                    .resolver
                    .resolve(&ResolveRequest::new(compression, Command::Extract))?;
                self.execute(
                    &resolution,
                    source,
                    Operation::Extract {
                        outdir: staging.path(),
                    },
                    None,
                    None,
                )?;
                single_entry(staging.path())?
            }
            None => source.to_path_buf(),
        };
        match to {
            Some(compression) => {
                let resolution = self
                    .resolver
                    .resolve(&ResolveRequest::new(compression, Command::Create))?;
                self.execute(
                    &resolution,
                    target,
                    Operation::Create {
                        files: std::slice::from_ref(&bare),
                    },
                    None,
                    None,
                )
            }
            None => {
                fs::copy(&bare, target)?;
                Ok(())
            }
        }
    }

    /// Dispatch to the builder and run what it returns.
    fn execute(
        &self,
        resolution: &Resolution,
        archive: &Path,
        operation: Operation<'_>,
        password: Option<&str>,
        cwd: Option<&Path>,
    ) -> Result<()> {
        let dispatched =
            dispatch::lookup(&resolution.program, resolution.command, resolution.format)?;
        let executable = resolution.program.executable_str();
        let job = Job {
            archive,
            format: resolution.format,
            compression: resolution.compression,
            executable: &executable,
            operation,
            verbosity: self.config.verbosity,
            interactive: self.config.interactive,
            password,
            finder: &*self.finder,
        };
        let Some(mut cmd) = dispatched.build(&job)? else {
            debug!(program = dispatched.id(), "handled in-process");
            return Ok(());
        };
        if let (Some(dir), None) = (cwd, &cmd.cwd) {
            cmd = cmd.with_cwd(dir);
        }
        info!(command = %cmd, "executing");
        match self.runner.run(&cmd)? {
            Some(0) => Ok(()),
            code => Err(WrapError::execution(cmd.to_string(), code)),
        }
    }

    /// Run a comparison tool where exit code 1 is an answer, not a failure.
    fn run_tolerant(&self, cmd: &CommandLine) -> Result<i32> {
        info!(command = %cmd, "executing");
        match self.runner.run(cmd)? {
            Some(code @ (0 | 1)) => Ok(code),
            code => Err(WrapError::execution(cmd.to_string(), code)),
        }
    }

    fn tool(&self, name: &str) -> Result<String> {
        self.finder
            .find(name)
            .map(|path| path.to_string_lossy().into_owned())
            .ok_or_else(|| {
                WrapError::spawn(
                    name,
                    io::Error::new(io::ErrorKind::NotFound, "not found on the search path"),
                )
            })
    }
}

/// File names as external programs running in `cwd` should see them.
/// Built-in codecs run in this process and keep the full paths.
fn relative_to(files: &[PathBuf], cwd: Option<&Path>, resolution: &Resolution) -> Vec<PathBuf> {
    match cwd {
        Some(dir) if resolution.program.executable != Executable::Builtin => files
            .iter()
            .map(|f| f.strip_prefix(dir).map(Path::to_path_buf).unwrap_or_else(|_| f.clone()))
            .collect(),
        _ => files.to_vec(),
    }
}

fn existing_file(path: &Path) -> Result<PathBuf> {
    let meta = fs::metadata(path).map_err(|_| {
        WrapError::invalid_argument(format!("file `{}' was not found", path.display()))
    })?;
    if !meta.is_file() {
        return Err(WrapError::invalid_argument(format!(
            "`{}' is not a regular file",
            path.display()
        )));
    }
    Ok(std::path::absolute(path)?)
}

fn new_file(path: &Path) -> Result<PathBuf> {
    if fs::symlink_metadata(path).is_ok() {
        return Err(WrapError::invalid_argument(format!(
            "file `{}' already exists",
            path.display()
        )));
    }
    Ok(std::path::absolute(path)?)
}
