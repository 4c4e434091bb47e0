//! Round trips that only need the in-process codecs.

mod common;

use common::{Recorder, archiver, source_tree};
use oxiwrap_core::Format;
use oxiwrap_dispatch::ArchiveOptions;
use std::path::Path;

fn assert_tree(root: &Path) {
    assert_eq!(std::fs::read(root.join("README")).unwrap(), b"read me\n");
    assert_eq!(
        std::fs::read(root.join("src/lib.rs")).unwrap(),
        b"pub fn answer() -> u32 { 42 }\n"
    );
}

#[test]
fn test_zip_create_list_extract() {
    let dir = tempfile::tempdir().unwrap();
    let tree = source_tree(dir.path());
    let archive = dir.path().join("project.zip");
    let runner = Recorder::exiting(0);
    let archiver = archiver(&[], runner.clone());

    archiver
        .create(&archive, &[tree], &ArchiveOptions::new())
        .unwrap();
    archiver.list(&archive, &ArchiveOptions::new()).unwrap();
    archiver.test(&archive, &ArchiveOptions::new()).unwrap();

    let outdir = dir.path().join("out");
    archiver
        .extract(&archive, Some(&outdir), &ArchiveOptions::new())
        .unwrap();
    assert_tree(&outdir.join("project"));
    assert!(runner.calls().is_empty());
}

#[test]
fn test_tar_lzma_goes_through_compression_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let tree = source_tree(dir.path());
    let archive = dir.path().join("report.tar.lzma");
    let archiver = archiver(&[], Recorder::exiting(0));
    let options = ArchiveOptions::new().format(Some(Format::Tar), Some(Format::Lzma));

    archiver.create(&archive, &[tree], &options).unwrap();
    let header = std::fs::read(&archive).unwrap();
    assert_eq!(header[0], 0x5d);

    let outdir = dir.path().join("out");
    archiver.extract(&archive, Some(&outdir), &options).unwrap();
    assert_tree(&outdir.join("project"));
}

#[test]
fn test_repack_to_another_container() {
    let dir = tempfile::tempdir().unwrap();
    let tree = source_tree(dir.path());
    let source = dir.path().join("project.tar.gz");
    let target = dir.path().join("project.zip");
    let archiver = archiver(&[], Recorder::exiting(0));

    archiver
        .create(&source, &[tree], &ArchiveOptions::new())
        .unwrap();
    archiver
        .repack(&source, &target, &ArchiveOptions::new())
        .unwrap();

    let outdir = dir.path().join("out");
    archiver
        .extract(&target, Some(&outdir), &ArchiveOptions::new())
        .unwrap();
    assert_tree(&outdir.join("project"));
}

#[test]
fn test_repack_swaps_compression() {
    let dir = tempfile::tempdir().unwrap();
    let tree = source_tree(dir.path());
    let source = dir.path().join("project.tar.gz");
    let target = dir.path().join("project.tar.xz");
    let archiver = archiver(&[], Recorder::exiting(0));

    archiver
        .create(&source, &[tree], &ArchiveOptions::new())
        .unwrap();
    archiver
        .repack(&source, &target, &ArchiveOptions::new())
        .unwrap();
    assert_eq!(&std::fs::read(&target).unwrap()[..6], b"\xfd7zXZ\0");

    let outdir = dir.path().join("out");
    let options = ArchiveOptions::new().format(Some(Format::Tar), Some(Format::Xz));
    archiver.extract(&target, Some(&outdir), &options).unwrap();
    assert_tree(&outdir.join("project"));
}

#[test]
fn test_same_format_repack_copies() {
    let dir = tempfile::tempdir().unwrap();
    let tree = source_tree(dir.path());
    let source = dir.path().join("a.zip");
    let target = dir.path().join("b.zip");
    let archiver = archiver(&[], Recorder::exiting(0));

    archiver
        .create(&source, &[tree], &ArchiveOptions::new())
        .unwrap();
    archiver
        .repack(&source, &target, &ArchiveOptions::new())
        .unwrap();
    assert_eq!(
        std::fs::read(&source).unwrap(),
        std::fs::read(&target).unwrap()
    );
}

#[test]
fn test_search_runs_grep_in_extracted_tree() {
    let dir = tempfile::tempdir().unwrap();
    let tree = source_tree(dir.path());
    let archive = dir.path().join("project.zip");
    let runner = Recorder::exiting(1);
    let archiver = archiver(&["grep"], runner.clone());

    archiver
        .create(&archive, &[tree], &ArchiveOptions::new())
        .unwrap();
    let code = archiver
        .search("answer", &archive, &ArchiveOptions::new())
        .unwrap();
    assert_eq!(code, 1);

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args, ["/usr/bin/grep", "-r", "-e", "answer", "."]);
    assert!(calls[0].cwd.is_some());
}

#[test]
fn test_diff_without_diff_tool_fails() {
    let dir = tempfile::tempdir().unwrap();
    let tree = source_tree(dir.path());
    let archive = dir.path().join("project.zip");
    let archiver = archiver(&[], Recorder::exiting(0));

    archiver
        .create(&archive, &[tree], &ArchiveOptions::new())
        .unwrap();
    assert!(
        archiver
            .diff(&archive, &archive, &ArchiveOptions::new())
            .is_err()
    );
}
