//! Mime type tables.
//!
//! Mime types bridge content sniffing, file name guessing and [`Format`].
//! The mapping from mime type to format is many-to-one: every format has a
//! canonical mime type (listed first) plus the aliases that `file(1)` and
//! other databases report.

use once_cell::sync::Lazy;
use oxiwrap_core::Format;
use std::collections::HashMap;
use std::path::Path;

/// Mime type to format. The first entry for each format is canonical.
static MIME_FORMATS: &[(&str, Format)] = &[
    ("application/x-7z-compressed", Format::SevenZip),
    ("application/x-ace", Format::Ace),
    ("application/x-adf", Format::Adf),
    ("application/x-alzip", Format::Alzip),
    ("application/x-archive", Format::Ar),
    ("application/x-arc", Format::Arc),
    ("application/x-arj", Format::Arj),
    ("application/arj", Format::Arj),
    ("application/x-bzip2", Format::Bzip2),
    ("application/x-bzip", Format::Bzip2),
    ("application/vnd.ms-cab-compressed", Format::Cab),
    ("application/x-cab", Format::Cab),
    ("application/x-compress", Format::Compress),
    ("application/x-cpio", Format::Cpio),
    ("application/x-debian-package", Format::Deb),
    ("application/vnd.debian.binary-package", Format::Deb),
    ("application/gzip", Format::Gzip),
    ("application/x-gzip", Format::Gzip),
    ("application/x-iso9660-image", Format::Iso),
    ("application/x-lrzip", Format::Lrzip),
    ("application/x-lz4", Format::Lz4),
    ("application/x-lzh-compressed", Format::Lzh),
    ("application/x-lha", Format::Lzh),
    ("application/x-lzh", Format::Lzh),
    ("application/x-lzip", Format::Lzip),
    ("application/x-lzma", Format::Lzma),
    ("application/x-lzop", Format::Lzop),
    ("application/x-rar", Format::Rar),
    ("application/vnd.rar", Format::Rar),
    ("application/rar", Format::Rar),
    ("application/x-rar-compressed", Format::Rar),
    ("application/x-rpm", Format::Rpm),
    ("application/x-redhat-package-manager", Format::Rpm),
    ("application/x-rzip", Format::Rzip),
    ("application/x-shar", Format::Shar),
    ("application/x-tar", Format::Tar),
    ("application/x-gtar", Format::Tar),
    ("application/x-xz", Format::Xz),
    ("application/zip", Format::Zip),
    ("application/x-zip-compressed", Format::Zip),
    ("application/java-archive", Format::Zip),
    ("application/jar", Format::Zip),
    ("application/epub+zip", Format::Zip),
    ("application/vnd.android.package-archive", Format::Zip),
    ("application/x-zoo", Format::Zoo),
    ("application/zpaq", Format::Zpaq),
    ("application/zstd", Format::Zstd),
    ("application/x-zstd", Format::Zstd),
];

/// Compression to the mime type used for `compressed-encoding=`.
static ENCODING_MIMES: &[(Format, &str)] = &[
    (Format::Bzip2, "application/x-bzip2"),
    (Format::Compress, "application/x-compress"),
    (Format::Gzip, "application/gzip"),
    (Format::Lzip, "application/x-lzip"),
    (Format::Lzma, "application/x-lzma"),
    (Format::Xz, "application/x-xz"),
    (Format::Zstd, "application/zstd"),
];

/// Extension to mime type, consulted before the general mime database.
static EXTENSION_MIMES: &[(&str, &str)] = &[
    (".7z", "application/x-7z-compressed"),
    (".cb7", "application/x-7z-compressed"),
    (".ace", "application/x-ace"),
    (".cba", "application/x-ace"),
    (".adf", "application/x-adf"),
    (".alz", "application/x-alzip"),
    (".a", "application/x-archive"),
    (".arc", "application/x-arc"),
    (".arj", "application/x-arj"),
    (".cab", "application/vnd.ms-cab-compressed"),
    (".cpio", "application/x-cpio"),
    (".deb", "application/x-debian-package"),
    (".iso", "application/x-iso9660-image"),
    (".lrz", "application/x-lrzip"),
    (".lz4", "application/x-lz4"),
    (".lha", "application/x-lha"),
    (".lzh", "application/x-lzh"),
    (".lzo", "application/x-lzop"),
    (".rar", "application/x-rar"),
    (".cbr", "application/x-rar"),
    (".rpm", "application/x-rpm"),
    (".rz", "application/x-rzip"),
    (".shar", "application/x-shar"),
    (".tar", "application/x-tar"),
    (".cbt", "application/x-tar"),
    (".zip", "application/zip"),
    (".jar", "application/java-archive"),
    (".cbz", "application/zip"),
    (".epub", "application/zip"),
    (".apk", "application/zip"),
    (".crx", "application/x-zip-compressed"),
    (".zoo", "application/x-zoo"),
    (".zpaq", "application/zpaq"),
];

/// Encoding suffixes. Matched case-sensitively: `.Z` is compress.
static ENCODING_SUFFIXES: &[(&str, Format)] = &[
    (".gz", Format::Gzip),
    (".Z", Format::Compress),
    (".bz2", Format::Bzip2),
    (".xz", Format::Xz),
    (".lzma", Format::Lzma),
    (".lz", Format::Lzip),
    (".zst", Format::Zstd),
];

/// Shorthand suffixes expanded before the encoding lookup.
static SUFFIX_EXPANSIONS: &[(&str, &str)] = &[
    (".tgz", ".tar.gz"),
    (".taz", ".tar.gz"),
    (".tz", ".tar.gz"),
    (".tbz2", ".tar.bz2"),
    (".tbz", ".tar.bz2"),
    (".txz", ".tar.xz"),
    (".tlz", ".tar.lz"),
    (".tzst", ".tar.zst"),
];

static FORMAT_BY_MIME: Lazy<HashMap<&'static str, Format>> =
    Lazy::new(|| MIME_FORMATS.iter().copied().collect());

/// Translate a mime type to a format.
pub fn format_for_mime(mime: &str) -> Option<Format> {
    FORMAT_BY_MIME.get(mime).copied()
}

/// Check whether a mime type names a known archive format.
pub fn is_archive_mime(mime: &str) -> bool {
    FORMAT_BY_MIME.contains_key(mime)
}

/// The canonical mime type of a format.
pub fn canonical_mime(format: Format) -> &'static str {
    MIME_FORMATS
        .iter()
        .find(|(_, f)| *f == format)
        .map(|(mime, _)| *mime)
        .unwrap_or("application/octet-stream")
}

/// The encoding mime type of a compression, `None` for containers.
pub fn encoding_mime(format: Format) -> Option<&'static str> {
    ENCODING_MIMES
        .iter()
        .find(|(f, _)| *f == format)
        .map(|(_, mime)| *mime)
}

/// Translate a wrapper mime type (including aliases) to its compression.
pub fn encoding_for_mime(mime: &str) -> Option<Format> {
    format_for_mime(mime).filter(|format| format.is_compression())
}

/// All mime types known for a format, canonical first.
pub fn mimes_for(format: Format) -> impl Iterator<Item = &'static str> {
    MIME_FORMATS
        .iter()
        .filter(move |(_, f)| *f == format)
        .map(|(mime, _)| *mime)
}

/// A mime guess derived from a file name only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameGuess {
    /// Mime type of the file after removing any encoding suffix.
    pub mime: Option<String>,
    /// Encoding named by the suffix.
    pub encoding: Option<Format>,
}

fn split_ext(name: &str) -> Option<(&str, &str)> {
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some((&name[..idx], &name[idx..])),
    }
}

fn lookup<'a, T: Copy>(table: &'a [(&'a str, T)], key: &str) -> Option<T> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn type_for_extension(ext: &str) -> Option<String> {
    let lower = ext.to_ascii_lowercase();
    if let Some(mime) = lookup(EXTENSION_MIMES, ext).or_else(|| lookup(EXTENSION_MIMES, &lower)) {
        return Some(mime.to_string());
    }
    mime_guess::from_ext(lower.trim_start_matches('.'))
        .first_raw()
        .map(str::to_string)
}

/// Guess the mime type and encoding of a file from its name.
///
/// `archive.tar.gz` yields `application/x-tar` with gzip encoding. A known
/// encoding over a non-archive type (`notes.txt.gz`) is reported as the
/// encoding itself, without a separate encoding.
pub fn guess_from_name(path: &Path) -> NameGuess {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return NameGuess::default();
    };

    let mut name = file_name.to_string();
    while let Some((base, ext)) = split_ext(&name) {
        let Some(expanded) = lookup(SUFFIX_EXPANSIONS, &ext.to_ascii_lowercase()) else {
            break;
        };
        name = format!("{base}{expanded}");
    }

    let mut encoding = None;
    let mut rest = name.as_str();
    if let Some((base, ext)) = split_ext(rest) {
        if let Some(found) = lookup(ENCODING_SUFFIXES, ext) {
            encoding = Some(found);
            rest = base;
        }
    }

    let mut mime = split_ext(rest).and_then(|(_, ext)| type_for_extension(ext));
    if let Some(found) = encoding {
        if !mime.as_deref().is_some_and(is_archive_mime) {
            mime = encoding_mime(found).map(str::to_string);
            encoding = None;
        }
    }

    NameGuess { mime, encoding }
}
