mod common;

use common::{Codecs, Installed, Recorder, archiver, source_tree};
use flate2::Compression;
use flate2::write::GzEncoder;
use oxiwrap_core::{Command, Format, RunConfig, WrapError};
use oxiwrap_dispatch::{ArchiveOptions, Archiver, Detector, MagicSniffer, ResolveRequest, Resolver};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

fn write_tar_gz(path: &Path, tree: &Path) {
    let file = std::fs::File::create(path).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    builder.append_dir_all("project", tree).unwrap();
    builder.into_inner().unwrap().finish().unwrap();
}

#[test]
fn test_compressed_tar_is_detected_and_extracted() {
    let dir = tempfile::tempdir().unwrap();
    let tree = source_tree(dir.path());
    let archive = dir.path().join("report.tar.gz");
    write_tar_gz(&archive, &tree);

    let detector = Detector::new(Arc::new(MagicSniffer::new()));
    assert_eq!(
        detector.detect(&archive).unwrap(),
        (Format::Tar, Some(Format::Gzip))
    );

    let runner = Recorder::exiting(0);
    let archiver = archiver(&[], runner.clone());
    let outdir = dir.path().join("out");
    let result = archiver
        .extract(&archive, Some(&outdir), &ArchiveOptions::new())
        .unwrap();

    assert_eq!(result, outdir);
    assert_eq!(
        std::fs::read(outdir.join("project/src/lib.rs")).unwrap(),
        b"pub fn answer() -> u32 { 42 }\n"
    );
    assert!(runner.calls().is_empty());
}

#[test]
fn test_installed_tar_is_preferred() {
    let dir = tempfile::tempdir().unwrap();
    let tree = source_tree(dir.path());
    let archive = dir.path().join("report.tar.gz");
    write_tar_gz(&archive, &tree);

    let runner = Recorder::exiting(0);
    let archiver = archiver(&["bsdtar"], runner.clone());
    let outdir = dir.path().join("out");
    archiver
        .extract(&archive, Some(&outdir), &ArchiveOptions::new())
        .unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program(), Some("/usr/bin/bsdtar"));
    assert!(calls[0].contains("--extract"));
    assert!(calls[0].contains("-z"));
}

#[test]
fn test_content_beats_misleading_extension() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("data.zip.bak");
    let mut writer = zip::ZipWriter::new(std::fs::File::create(&archive).unwrap());
    writer
        .start_file("hello.txt", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"hello").unwrap();
    writer.finish().unwrap();

    let detector = Detector::new(Arc::new(MagicSniffer::new()));
    assert_eq!(detector.detect(&archive).unwrap(), (Format::Zip, None));
}

#[test]
fn test_rar_without_codec_is_not_found() {
    let runner = Recorder::exiting(0);
    let resolver = Resolver::new(Installed::new(&["7z"]), runner, Arc::new(Codecs(false)));
    let request = ResolveRequest::new(Format::Rar, Command::Extract).password(Some("secret"));

    match resolver.resolve(&request) {
        Err(WrapError::NoProgramFound { candidates, .. }) => {
            assert!(candidates.contains(&"7z".to_string()));
            assert!(candidates.contains(&"unrar".to_string()));
        }
        other => panic!("expected NoProgramFound, got {other:?}"),
    }
}

#[test]
fn test_gzip_create_command() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("notes.txt");
    std::fs::write(&source, b"notes").unwrap();
    let archive = dir.path().join("notes.txt.gz");

    let runner = Recorder::exiting(0);
    let archiver = archiver(&["gzip"], runner.clone());
    archiver
        .create(&archive, &[source], &ArchiveOptions::new())
        .unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].shell);
    let script = calls[0].script();
    assert!(script.starts_with("/usr/bin/gzip -c"));
    assert!(script.ends_with("notes.txt.gz"));
}

#[test]
fn test_failed_program_reports_command_and_code() {
    let dir = tempfile::tempdir().unwrap();
    let tree = source_tree(dir.path());
    let archive = dir.path().join("report.tar.gz");
    write_tar_gz(&archive, &tree);

    let archiver = Archiver::new(
        Installed::new(&["bsdtar"]),
        Recorder::exiting(2),
        Arc::new(MagicSniffer::new()),
        Arc::new(Codecs(true)),
        RunConfig::default(),
    );
    let err = archiver.test(&archive, &ArchiveOptions::new()).unwrap_err();
    match err {
        WrapError::Execution { command, code } => {
            assert!(command.starts_with("/usr/bin/bsdtar --list -z --file"));
            assert_eq!(code, Some(2));
        }
        other => panic!("expected an execution error, got {other}"),
    }
}
