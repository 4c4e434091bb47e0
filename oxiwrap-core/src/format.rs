//! Archive formats and commands.
//!
//! Both sets are closed and known at build time. A compression is not a
//! separate category: it is a [`Format`] for which [`Format::is_compression`]
//! holds, because single-stream compressors are valid standalone formats
//! and valid encodings layered under a container at the same time.

use crate::error::{Result, WrapError};
use std::fmt;
use std::str::FromStr;

/// Known archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Format {
    /// 7-Zip archive (.7z).
    SevenZip,
    /// ACE archive (.ace).
    Ace,
    /// Amiga disk file (.adf).
    Adf,
    /// ALZip archive (.alz).
    Alzip,
    /// Unix ar archive (.a).
    Ar,
    /// ARC archive (.arc).
    Arc,
    /// ARJ archive (.arj).
    Arj,
    /// Bzip2 compressed file (.bz2).
    Bzip2,
    /// Microsoft Cabinet (.cab).
    Cab,
    /// Unix compress (.Z).
    Compress,
    /// cpio archive (.cpio).
    Cpio,
    /// Debian package (.deb).
    Deb,
    /// GZIP compressed file (.gz).
    Gzip,
    /// ISO 9660 image (.iso).
    Iso,
    /// Long range zip (.lrz).
    Lrzip,
    /// LZ4 compressed file (.lz4).
    Lz4,
    /// LZH/LHA archive (.lzh, .lha).
    Lzh,
    /// Lzip compressed file (.lz).
    Lzip,
    /// Legacy LZMA stream (.lzma).
    Lzma,
    /// Lzop compressed file (.lzo).
    Lzop,
    /// RAR archive (.rar).
    Rar,
    /// RPM package (.rpm).
    Rpm,
    /// Rzip compressed file (.rz).
    Rzip,
    /// Shell archive (.shar).
    Shar,
    /// TAR archive (.tar).
    Tar,
    /// XZ compressed file (.xz).
    Xz,
    /// ZIP archive (.zip).
    Zip,
    /// Zoo archive (.zoo).
    Zoo,
    /// ZPAQ journaling archive (.zpaq).
    Zpaq,
    /// Zstandard compressed file (.zst).
    Zstd,
}

impl Format {
    /// Every format, in name order.
    pub const ALL: [Format; 30] = [
        Self::SevenZip,
        Self::Ace,
        Self::Adf,
        Self::Alzip,
        Self::Ar,
        Self::Arc,
        Self::Arj,
        Self::Bzip2,
        Self::Cab,
        Self::Compress,
        Self::Cpio,
        Self::Deb,
        Self::Gzip,
        Self::Iso,
        Self::Lrzip,
        Self::Lz4,
        Self::Lzh,
        Self::Lzip,
        Self::Lzma,
        Self::Lzop,
        Self::Rar,
        Self::Rpm,
        Self::Rzip,
        Self::Shar,
        Self::Tar,
        Self::Xz,
        Self::Zip,
        Self::Zoo,
        Self::Zpaq,
        Self::Zstd,
    ];

    /// Formats that may also describe an encoding layered under a container.
    pub const COMPRESSIONS: [Format; 7] = [
        Self::Bzip2,
        Self::Compress,
        Self::Gzip,
        Self::Lzip,
        Self::Lzma,
        Self::Xz,
        Self::Zstd,
    ];

    /// Get the canonical identifier.
    pub fn name(self) -> &'static str {
        match self {
            Self::SevenZip => "7z",
            Self::Ace => "ace",
            Self::Adf => "adf",
            Self::Alzip => "alzip",
            Self::Ar => "ar",
            Self::Arc => "arc",
            Self::Arj => "arj",
            Self::Bzip2 => "bzip2",
            Self::Cab => "cab",
            Self::Compress => "compress",
            Self::Cpio => "cpio",
            Self::Deb => "deb",
            Self::Gzip => "gzip",
            Self::Iso => "iso",
            Self::Lrzip => "lrzip",
            Self::Lz4 => "lz4",
            Self::Lzh => "lzh",
            Self::Lzip => "lzip",
            Self::Lzma => "lzma",
            Self::Lzop => "lzop",
            Self::Rar => "rar",
            Self::Rpm => "rpm",
            Self::Rzip => "rzip",
            Self::Shar => "shar",
            Self::Tar => "tar",
            Self::Xz => "xz",
            Self::Zip => "zip",
            Self::Zoo => "zoo",
            Self::Zpaq => "zpaq",
            Self::Zstd => "zstd",
        }
    }

    /// Get a human readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::SevenZip => "7-Zip",
            Self::Ace => "ACE",
            Self::Adf => "Amiga Disk File",
            Self::Alzip => "ALZip",
            Self::Ar => "Unix ar",
            Self::Arc => "ARC",
            Self::Arj => "ARJ",
            Self::Bzip2 => "Bzip2",
            Self::Cab => "Cabinet",
            Self::Compress => "Unix compress",
            Self::Cpio => "cpio",
            Self::Deb => "Debian package",
            Self::Gzip => "GZIP",
            Self::Iso => "ISO 9660 image",
            Self::Lrzip => "lrzip",
            Self::Lz4 => "LZ4",
            Self::Lzh => "LZH",
            Self::Lzip => "lzip",
            Self::Lzma => "LZMA",
            Self::Lzop => "lzop",
            Self::Rar => "RAR",
            Self::Rpm => "RPM package",
            Self::Rzip => "rzip",
            Self::Shar => "Shell archive",
            Self::Tar => "TAR",
            Self::Xz => "XZ",
            Self::Zip => "ZIP",
            Self::Zoo => "Zoo",
            Self::Zpaq => "ZPAQ",
            Self::Zstd => "Zstandard",
        }
    }

    /// Check if this format can also be an encoding under a container.
    pub fn is_compression(self) -> bool {
        Self::COMPRESSIONS.contains(&self)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = WrapError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        let alias = match lower.as_str() {
            "7zip" | "7-zip" => "7z",
            "bz2" => "bzip2",
            "gz" => "gzip",
            "lha" => "lzh",
            "lz" => "lzip",
            "z" => "compress",
            "zst" => "zstd",
            other => other,
        };
        Self::ALL
            .iter()
            .copied()
            .find(|format| format.name() == alias)
            .ok_or_else(|| WrapError::unsupported_format(s))
    }
}

/// The fundamental operation kinds. Composite operations (diff, search,
/// repack) are built from these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Command {
    /// Print the archive contents.
    List,
    /// Unpack the archive.
    Extract,
    /// Verify archive integrity.
    Test,
    /// Build a new archive.
    Create,
}

impl Command {
    /// Every command.
    pub const ALL: [Command; 4] = [Self::Extract, Self::List, Self::Create, Self::Test];

    /// Get the canonical identifier.
    pub fn name(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Extract => "extract",
            Self::Test => "test",
            Self::Create => "create",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = WrapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|command| command.name() == s)
            .ok_or_else(|| WrapError::invalid_argument(format!("unknown command `{s}'")))
    }
}
