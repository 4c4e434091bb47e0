//! Program capability registry.
//!
//! For every format, the ordered candidate programs per command. A bucket
//! keyed by `None` applies to every command and is tried before the
//! command-specific bucket. Candidates prefixed with `builtin_` run
//! in-process.

use oxiwrap_core::{Command, Format};

/// Candidate programs for one command (`None` meaning every command).
pub type Bucket = (Option<Command>, &'static [&'static str]);

/// Prefix marking an in-process codec.
pub const BUILTIN_PREFIX: &str = "builtin_";

/// Check whether a program name designates a built-in codec.
pub fn is_builtin(program: &str) -> bool {
    program.starts_with(BUILTIN_PREFIX)
}

const ANY: Option<Command> = None;
const EXTRACT: Option<Command> = Some(Command::Extract);
const LIST: Option<Command> = Some(Command::List);
const TEST: Option<Command> = Some(Command::Test);
const CREATE: Option<Command> = Some(Command::Create);

const SEVEN_ZIP: &[&str] = &["7z", "7za", "7zz", "7zzs"];

/// The capability entries of a format.
pub fn capabilities(format: Format) -> &'static [Bucket] {
    match format {
        Format::SevenZip => &[
            (ANY, SEVEN_ZIP),
            (EXTRACT, &["unar"]),
            (LIST, &["lsar"]),
            (TEST, &["lsar"]),
        ],
        Format::Ace => &[
            (EXTRACT, &["unace"]),
            (TEST, &["unace"]),
            (LIST, &["unace"]),
        ],
        Format::Adf => &[
            (EXTRACT, &["unadf"]),
            (TEST, &["unadf"]),
            (LIST, &["unadf"]),
        ],
        Format::Alzip => &[
            (EXTRACT, &["unalz"]),
            (TEST, &["unalz"]),
            (LIST, &["unalz"]),
        ],
        Format::Ar => &[(ANY, &["ar"])],
        Format::Arc => &[
            (ANY, &["arc"]),
            (EXTRACT, &["nomarch"]),
            (TEST, &["nomarch"]),
            (LIST, &["nomarch"]),
        ],
        Format::Arj => &[
            (ANY, &["arj"]),
            (EXTRACT, &["7z"]),
            (TEST, &["7z"]),
            (LIST, &["7z"]),
        ],
        Format::Bzip2 => &[
            (ANY, SEVEN_ZIP),
            (EXTRACT, &["pbzip2", "lbzip2", "bzip2"]),
            (TEST, &["pbzip2", "lbzip2", "bzip2"]),
            (CREATE, &["pbzip2", "lbzip2", "bzip2"]),
            (LIST, &["builtin_echo"]),
        ],
        Format::Cab => &[
            (EXTRACT, &["cabextract", "7z"]),
            (LIST, &["cabextract", "7z"]),
            (TEST, &["cabextract", "7z"]),
            (CREATE, &["lcab"]),
        ],
        Format::Compress => &[
            (EXTRACT, &["gzip", "7z", "7za", "7zz", "uncompress.real"]),
            (LIST, &["7z", "7za", "7zz", "builtin_echo"]),
            (TEST, &["gzip", "7z", "7za", "7zz"]),
            (CREATE, &["compress"]),
        ],
        Format::Cpio => &[
            (EXTRACT, &["cpio", "bsdcpio", "7z"]),
            (LIST, &["cpio", "bsdcpio", "7z"]),
            (TEST, &["cpio", "bsdcpio", "7z"]),
            (CREATE, &["cpio", "bsdcpio"]),
        ],
        Format::Deb => &[
            (EXTRACT, &["dpkg-deb", "7z"]),
            (LIST, &["dpkg-deb", "7z"]),
            (TEST, &["dpkg-deb", "7z"]),
        ],
        Format::Gzip => &[
            (ANY, SEVEN_ZIP),
            (EXTRACT, &["pigz", "gzip", "builtin_gzip"]),
            (TEST, &["pigz", "gzip", "builtin_gzip"]),
            (CREATE, &["pigz", "gzip", "zopfli", "builtin_gzip"]),
            (LIST, &["pigz", "gzip", "builtin_echo"]),
        ],
        Format::Iso => &[
            (EXTRACT, &["7z"]),
            (LIST, &["7z", "isoinfo"]),
            (TEST, &["7z"]),
            (CREATE, &["genisoimage"]),
        ],
        Format::Lrzip => &[
            (EXTRACT, &["lrzip"]),
            (LIST, &["builtin_echo"]),
            (TEST, &["lrzip"]),
            (CREATE, &["lrzip"]),
        ],
        Format::Lz4 => &[(ANY, &["lz4"])],
        Format::Lzh => &[
            (ANY, &["lha"]),
            (EXTRACT, &["lhasa"]),
            (LIST, &["lhasa"]),
            (TEST, &["lhasa"]),
        ],
        Format::Lzip => &[
            (EXTRACT, &["plzip", "lzip", "clzip", "pdlzip"]),
            (LIST, &["builtin_echo"]),
            (TEST, &["plzip", "lzip", "clzip", "pdlzip"]),
            (CREATE, &["plzip", "lzip", "clzip", "pdlzip"]),
        ],
        Format::Lzma => &[
            (EXTRACT, &["lzma", "xz", "7z", "builtin_xz"]),
            (LIST, &["7z", "builtin_echo"]),
            (TEST, &["lzma", "xz", "7z", "builtin_xz"]),
            (CREATE, &["lzma", "xz", "builtin_xz"]),
        ],
        Format::Lzop => &[(ANY, &["lzop"])],
        Format::Rar => &[
            (ANY, &["rar"]),
            (EXTRACT, &["unrar", "7z", "unar"]),
            (LIST, &["unrar", "7z", "lsar"]),
            (TEST, &["unrar", "7z", "lsar"]),
        ],
        Format::Rpm => &[
            (EXTRACT, &["rpm2cpio", "7z"]),
            (LIST, &["rpm", "7z"]),
            (TEST, &["rpm", "7z"]),
        ],
        Format::Rzip => &[
            (EXTRACT, &["rzip"]),
            (LIST, &["builtin_echo"]),
            (CREATE, &["rzip"]),
        ],
        Format::Shar => &[(CREATE, &["shar"]), (EXTRACT, &["unshar"])],
        Format::Tar => &[
            (ANY, &["tar", "star", "bsdtar", "builtin_tar"]),
            (EXTRACT, &["unar"]),
            (LIST, &["lsar"]),
            (TEST, &["lsar"]),
        ],
        Format::Xz => &[
            (ANY, &["xz", "7z"]),
            (EXTRACT, &["builtin_xz"]),
            (TEST, &["builtin_xz"]),
            (CREATE, &["builtin_xz"]),
            (LIST, &["builtin_echo"]),
        ],
        Format::Zip => &[
            (ANY, &["7z", "7za", "7zz", "7zzs", "builtin_zip"]),
            (EXTRACT, &["unzip"]),
            (LIST, &["unzip"]),
            (TEST, &["zip", "unzip"]),
            (CREATE, &["zip"]),
        ],
        Format::Zoo => &[(ANY, &["zoo"])],
        Format::Zpaq => &[(ANY, &["zpaq"])],
        Format::Zstd => &[(ANY, &["zstd"])],
    }
}

/// Programs known to lack password support.
pub fn password_exclusions(format: Format) -> &'static [Bucket] {
    match format {
        Format::Bzip2 | Format::Gzip | Format::Compress => &[(ANY, SEVEN_ZIP)],
        Format::Arj
        | Format::Cab
        | Format::Cpio
        | Format::Deb
        | Format::Iso
        | Format::Lzma
        | Format::Rpm
        | Format::Xz => &[(ANY, SEVEN_ZIP)],
        Format::Zip => &[(CREATE, &["builtin_zip"])],
        _ => &[],
    }
}

fn collect(buckets: &'static [Bucket], command: Command) -> Vec<&'static str> {
    let wildcard = buckets.iter().filter(|(c, _)| c.is_none());
    let specific = buckets.iter().filter(|(c, _)| *c == Some(command));
    wildcard
        .chain(specific)
        .flat_map(|(_, programs)| programs.iter().copied())
        .collect()
}

/// Candidate programs for a format and command, most preferred first.
pub fn candidates(format: Format, command: Command) -> Vec<&'static str> {
    collect(capabilities(format), command)
}

/// Check whether a program is known to lack password support.
pub fn lacks_password(format: Format, command: Command, program: &str) -> bool {
    collect(password_exclusions(format), command).contains(&program)
}

/// Every program name mentioned by the registry, deduplicated.
pub fn all_programs() -> Vec<&'static str> {
    let mut programs: Vec<&'static str> = Format::ALL
        .iter()
        .flat_map(|format| capabilities(*format).iter())
        .flat_map(|(_, programs)| programs.iter().copied())
        .collect();
    programs.sort_unstable();
    programs.dedup();
    programs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_format_has_candidates() {
        for format in Format::ALL {
            assert!(
                !capabilities(format).is_empty(),
                "{format} has no capability entry"
            );
        }
    }

    #[test]
    fn test_wildcard_precedes_command_bucket() {
        assert_eq!(
            candidates(Format::Rar, Command::Extract),
            vec!["rar", "unrar", "7z", "unar"]
        );
        assert_eq!(
            candidates(Format::Tar, Command::List),
            vec!["tar", "star", "bsdtar", "builtin_tar", "lsar"]
        );
    }

    #[test]
    fn test_gzip_create_prefers_plain_gzip() {
        assert_eq!(
            candidates(Format::Gzip, Command::Create),
            vec!["7z", "7za", "7zz", "7zzs", "pigz", "gzip", "zopfli", "builtin_gzip"]
        );
    }

    #[test]
    fn test_missing_command_bucket() {
        assert!(candidates(Format::Deb, Command::Create).is_empty());
        assert!(candidates(Format::Shar, Command::List).is_empty());
    }

    #[test]
    fn test_password_exclusions() {
        assert!(lacks_password(Format::Gzip, Command::Extract, "7z"));
        assert!(lacks_password(Format::Zip, Command::Create, "builtin_zip"));
        assert!(!lacks_password(Format::Zip, Command::Extract, "builtin_zip"));
        assert!(!lacks_password(Format::Rar, Command::Extract, "7z"));
    }

    #[test]
    fn test_builtin_marker() {
        assert!(is_builtin("builtin_tar"));
        assert!(!is_builtin("tar"));
        assert!(all_programs().contains(&"builtin_echo"));
    }
}
