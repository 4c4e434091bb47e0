//! In-process codecs.
//!
//! These stand in for external programs when nothing suitable is
//! installed. They implement [`ArchiveProgram`](crate::programs::ArchiveProgram)
//! like every other builder but do the work themselves and return
//! `Ok(None)`.

mod echo;
mod gzip;
mod tar;
mod xz;
mod zip;

pub use self::echo::ECHO;
pub use self::gzip::GZIP;
pub use self::tar::{COMPRESSIONS as TAR_COMPRESSIONS, TAR};
pub use self::xz::XZ;
pub use self::zip::ZIP;

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Copy `reader` into a new file at `target`, flushing before returning.
pub(crate) fn copy_to_file<R: Read + ?Sized>(reader: &mut R, target: &Path) -> io::Result<u64> {
    let mut out = BufWriter::new(File::create(target)?);
    let written = io::copy(reader, &mut out)?;
    out.flush()?;
    Ok(written)
}

/// Archive member name for `path` when adding it below `base`.
///
/// Members keep the last component of the path the user named, so
/// `create x.zip /tmp/docs` stores `docs/...`.
pub(crate) fn member_name(path: &Path, base: &Path) -> String {
    let root = base.parent().unwrap_or(base);
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
        .trim_start_matches('/')
        .to_string()
}

/// Every file and directory below `path`, `path` first.
pub(crate) fn walk(path: &Path) -> io::Result<Vec<PathBuf>> {
    let mut found = vec![path.to_path_buf()];
    if path.is_dir() {
        let mut entries = std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()?;
        entries.sort();
        for entry in entries {
            found.extend(walk(&entry)?);
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_name() {
        let base = Path::new("/tmp/docs");
        assert_eq!(member_name(Path::new("/tmp/docs/a.txt"), base), "docs/a.txt");
        assert_eq!(member_name(base, base), "docs");
        assert_eq!(member_name(Path::new("notes.txt"), Path::new("notes.txt")), "notes.txt");
    }

    #[test]
    fn test_copy_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.bin");
        assert_eq!(copy_to_file(&mut &b"payload"[..], &target).unwrap(), 7);
        assert_eq!(std::fs::read(&target).unwrap(), b"payload");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_copy_to_file_reports_write_failure() {
        // Small enough to stay in the buffer until the final flush.
        let err = copy_to_file(&mut &b"payload"[..], Path::new("/dev/full")).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(28));
    }

    #[test]
    fn test_walk_is_sorted_and_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("tree");
        std::fs::create_dir_all(root.join("sub")).unwrap();
        std::fs::write(root.join("b.txt"), b"b").unwrap();
        std::fs::write(root.join("sub/a.txt"), b"a").unwrap();

        let found = walk(&root).unwrap();
        assert_eq!(
            found,
            vec![
                root.clone(),
                root.join("b.txt"),
                root.join("sub"),
                root.join("sub/a.txt"),
            ]
        );
    }
}
