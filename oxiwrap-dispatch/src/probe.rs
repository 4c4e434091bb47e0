//! Memoized capability probes.
//!
//! Three expensive checks back the resolver: search path lookup, codec
//! support of the 7-Zip family and native compression support of tar-like
//! programs. Each is cached for the lifetime of the probe object.

use oxiwrap_core::{
    CodecProbe, Command, CommandLine, CommandRunner, ExecutableFinder, Format, Memo,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// The universal archiver family.
pub const UNIVERSAL: &[&str] = &["7z", "7za", "7zz", "7zzs"];

/// Check whether a program belongs to the universal archiver family.
pub fn is_universal(program: &str) -> bool {
    UNIVERSAL.contains(&program)
}

/// Caches search path lookups per program name.
pub struct ExecutableCache {
    finder: Arc<dyn ExecutableFinder>,
    memo: Memo<String, Option<PathBuf>>,
}

impl ExecutableCache {
    /// Wrap a finder.
    pub fn new(finder: Arc<dyn ExecutableFinder>) -> Self {
        Self {
            finder,
            memo: Memo::new(),
        }
    }

    /// The underlying cache, for seeding and clearing.
    pub fn memo(&self) -> &Memo<String, Option<PathBuf>> {
        &self.memo
    }
}

impl ExecutableFinder for ExecutableCache {
    fn find(&self, name: &str) -> Option<PathBuf> {
        self.memo.get_or_insert_with(name.to_string(), || {
            let found = self.finder.find(name);
            debug!(program = name, path = ?found, "search path lookup");
            found
        })
    }
}

/// Codec directories of p7zip installations.
const P7ZIP_CODEC_DIRS: &[&str] = &[
    "/usr/lib/p7zip/Codecs",
    "/usr/lib64/p7zip/Codecs",
    "/usr/libexec/p7zip/Codecs",
    "/usr/local/lib/p7zip/Codecs",
];

/// Probes the 7-Zip family for RAR and compress support.
///
/// Asks the program itself with `<7z> i` and reads the `Formats:` table.
/// When that fails the p7zip codec directories are checked for the RAR
/// plugin.
pub struct SevenZipCodecs {
    runner: Arc<dyn CommandRunner>,
    memo: Memo<(PathBuf, Format), bool>,
}

impl SevenZipCodecs {
    /// Create a probe using the given runner.
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            memo: Memo::new(),
        }
    }

    fn probe(&self, executable: &Path, format: Format) -> bool {
        let cmd = CommandLine::new([executable.to_string_lossy().into_owned(), "i".to_string()]);
        match self.runner.capture(&cmd) {
            Ok(out) if out.success() => formats_table_lists(&out.stdout, format),
            result => {
                debug!(command = %cmd, ?result, "codec query failed, checking codec dirs");
                codec_dirs_support(executable, format)
            }
        }
    }
}

impl CodecProbe for SevenZipCodecs {
    fn supports(&self, executable: &Path, format: Format) -> bool {
        if !matches!(format, Format::Rar | Format::Compress) {
            return true;
        }
        self.memo
            .get_or_insert_with((executable.to_path_buf(), format), || {
                let supported = self.probe(executable, format);
                debug!(executable = %executable.display(), %format, supported, "codec probe");
                supported
            })
    }
}

/// Names used in the `Formats:` table of `7z i`.
fn codec_names(format: Format) -> &'static [&'static str] {
    match format {
        Format::Rar => &["Rar", "Rar5"],
        Format::Compress => &["Z"],
        _ => &[],
    }
}

/// Scan the `Formats:` section of `7z i` output for a format name.
pub fn formats_table_lists(output: &str, format: Format) -> bool {
    let names = codec_names(format);
    output
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("Formats:"))
        .skip(1)
        .take_while(|line| !line.trim().is_empty())
        .any(|line| line.split_whitespace().any(|token| names.contains(&token)))
}

fn codec_dirs_support(executable: &Path, format: Format) -> bool {
    let name = executable
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match format {
        // The standalone 7za build never shipped the LZW decoder.
        Format::Compress => name != "7za",
        Format::Rar => {
            // 7-Zip proper has RAR built in; p7zip needs the plugin.
            name == "7zz"
                || name == "7zzs"
                || P7ZIP_CODEC_DIRS
                    .iter()
                    .any(|dir| Path::new(dir).join("Rar.so").is_file())
        }
        _ => true,
    }
}

/// Companion compressors a tar-like program delegates to.
fn companions(compression: Format) -> &'static [&'static str] {
    match compression {
        Format::Gzip => &["pigz", "gzip"],
        Format::Bzip2 => &["pbzip2", "lbzip2", "bzip2"],
        Format::Xz => &["xz"],
        Format::Lzma => &["lzma", "xz"],
        Format::Lzip => &["plzip", "lzip", "clzip", "pdlzip"],
        Format::Zstd => &["zstd"],
        Format::Compress => &["compress", "gzip"],
        _ => &[],
    }
}

/// Probes native compression support, memoized per
/// (command, program, executable, compression).
pub struct CompressionSupport {
    finder: Arc<dyn ExecutableFinder>,
    runner: Arc<dyn CommandRunner>,
    memo: Memo<(Command, String, String, Format), bool>,
}

impl CompressionSupport {
    /// Create a probe using the given collaborators.
    pub fn new(finder: Arc<dyn ExecutableFinder>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            finder,
            runner,
            memo: Memo::new(),
        }
    }

    /// Check whether `program` handles `compression` itself when running
    /// `command`.
    pub fn native(
        &self,
        command: Command,
        program: &str,
        executable: Option<&Path>,
        compression: Format,
    ) -> bool {
        let exe = executable
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        let key = (command, program.to_string(), exe, compression);
        self.memo.get_or_insert_with(key, || {
            let supported = self.check(command, program, executable, compression);
            debug!(%command, program, %compression, supported, "compression probe");
            supported
        })
    }

    fn has_companion(&self, compression: Format) -> bool {
        companions(compression)
            .iter()
            .any(|name| self.finder.find(name).is_some())
    }

    fn check(
        &self,
        command: Command,
        program: &str,
        executable: Option<&Path>,
        compression: Format,
    ) -> bool {
        match program {
            "tar" => {
                if cfg!(windows) && command == Command::Create && compression == Format::Xz {
                    return false;
                }
                let Some(executable) = executable else {
                    return false;
                };
                self.has_companion(compression) && self.accepts_flag(executable, compression)
            }
            "star" => {
                matches!(
                    compression,
                    Format::Gzip | Format::Bzip2 | Format::Xz | Format::Lzma | Format::Zstd
                ) && self.has_companion(compression)
            }
            "bsdtar" | "unar" | "lsar" => compression.is_compression(),
            "builtin_tar" => crate::builtin::TAR_COMPRESSIONS.contains(&compression),
            _ => false,
        }
    }

    fn accepts_flag(&self, executable: &Path, compression: Format) -> bool {
        let mut cmd = CommandLine::new([
            executable.to_string_lossy().into_owned(),
            format!("--{}", compression.name()),
            "--help".to_string(),
        ]);
        cmd.quiet = true;
        matches!(self.runner.run(&cmd), Ok(Some(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxiwrap_core::{Captured, Result};
    use std::collections::HashSet;
    use std::sync::Mutex;

    struct Installed(HashSet<&'static str>);

    impl ExecutableFinder for Installed {
        fn find(&self, name: &str) -> Option<PathBuf> {
            self.0
                .contains(name)
                .then(|| PathBuf::from("/usr/bin").join(name))
        }
    }

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
        stdout: String,
        code: i32,
    }

    impl CommandRunner for Recorder {
        fn run(&self, command: &CommandLine) -> Result<Option<i32>> {
            self.calls.lock().unwrap().push(command.script());
            Ok(Some(self.code))
        }

        fn capture(&self, command: &CommandLine) -> Result<Captured> {
            self.calls.lock().unwrap().push(command.script());
            Ok(Captured {
                code: Some(self.code),
                stdout: self.stdout.clone(),
            })
        }
    }

    const SEVEN_ZIP_INFO: &str = "\
7-Zip [64] 16.02 : Copyright (c) 1999-2016 Igor Pavlov

Formats:
...    0 ED  zip      zip z01 zipx jar xpi odt ods docx xlsx epub  PK
 C...F   Rar5     rar r00
 C...F   Rar      rar r00
...      Z        z taz (.tar)

Codecs:
 0 ED   40301 Rar1
";

    #[test]
    fn test_formats_table() {
        assert!(formats_table_lists(SEVEN_ZIP_INFO, Format::Rar));
        assert!(formats_table_lists(SEVEN_ZIP_INFO, Format::Compress));
        let without_rar = SEVEN_ZIP_INFO.replace("Rar5", "Cab").replace(" Rar ", " Arj ");
        assert!(!formats_table_lists(&without_rar, Format::Rar));
    }

    #[test]
    fn test_executable_cache_memoizes() {
        struct Counting(Mutex<usize>);
        impl ExecutableFinder for Counting {
            fn find(&self, _name: &str) -> Option<PathBuf> {
                *self.0.lock().unwrap() += 1;
                None
            }
        }
        let inner = Arc::new(Counting(Mutex::new(0)));
        let cache = ExecutableCache::new(inner.clone());
        assert_eq!(cache.find("zip"), None);
        assert_eq!(cache.find("zip"), None);
        assert_eq!(*inner.0.lock().unwrap(), 1);

        cache.memo().seed("zip".into(), Some(PathBuf::from("/opt/zip")));
        assert_eq!(cache.find("zip"), Some(PathBuf::from("/opt/zip")));
    }

    #[test]
    fn test_seven_zip_codec_probe() {
        let runner = Arc::new(Recorder {
            stdout: SEVEN_ZIP_INFO.to_string(),
            ..Recorder::default()
        });
        let probe = SevenZipCodecs::new(runner.clone());
        let exe = Path::new("/usr/bin/7z");
        assert!(probe.supports(exe, Format::Rar));
        assert!(probe.supports(exe, Format::Rar));
        assert!(probe.supports(exe, Format::Zip));
        assert_eq!(runner.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_tar_needs_companion_and_flag() {
        let finder = Arc::new(Installed(["tar", "gzip"].into_iter().collect()));
        let runner = Arc::new(Recorder::default());
        let probe = CompressionSupport::new(finder, runner.clone());
        let tar = Path::new("/usr/bin/tar");
        assert!(probe.native(Command::Extract, "tar", Some(tar), Format::Gzip));
        assert!(!probe.native(Command::Extract, "tar", Some(tar), Format::Zstd));
        assert_eq!(
            runner.calls.lock().unwrap().as_slice(),
            ["/usr/bin/tar --gzip --help"]
        );
    }

    #[test]
    fn test_tar_flag_rejected() {
        let finder = Arc::new(Installed(["tar", "lzip"].into_iter().collect()));
        let runner = Arc::new(Recorder {
            code: 2,
            ..Recorder::default()
        });
        let probe = CompressionSupport::new(finder, runner);
        let tar = Path::new("/usr/bin/tar");
        assert!(!probe.native(Command::Extract, "tar", Some(tar), Format::Lzip));
    }

    #[test]
    fn test_static_compression_rules() {
        let finder = Arc::new(Installed(HashSet::new()));
        let probe = CompressionSupport::new(finder, Arc::new(Recorder::default()));
        assert!(probe.native(Command::List, "bsdtar", None, Format::Lzip));
        assert!(probe.native(Command::Extract, "unar", None, Format::Zstd));
        assert!(probe.native(Command::Create, "builtin_tar", None, Format::Xz));
        assert!(!probe.native(Command::Create, "builtin_tar", None, Format::Bzip2));
        assert!(!probe.native(Command::Extract, "star", None, Format::Gzip));
        assert!(!probe.native(Command::Extract, "7z", None, Format::Gzip));
    }
}
