//! xz and raw lzma streams through liblzma.

use super::copy_to_file;
use crate::programs::{ArchiveProgram, Job, Operation, single_file, single_outfile};
use oxiwrap_core::{Command, CommandLine, Format, Result, WrapError};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use xz2::read::XzDecoder;
use xz2::stream::{LzmaOptions, Stream};
use xz2::write::XzEncoder;

pub struct Xz;

pub static XZ: Xz = Xz;

const PRESET: u32 = 6;

/// A decoding reader for `format` (xz or lzma-alone).
pub(crate) fn decoder<R: Read>(reader: R, format: Format) -> Result<XzDecoder<R>> {
    match format {
        Format::Lzma => {
            let stream = Stream::new_lzma_decoder(u64::MAX)
                .map_err(|e| WrapError::codec("lzma", e))?;
            Ok(XzDecoder::new_stream(reader, stream))
        }
        _ => Ok(XzDecoder::new(reader)),
    }
}

/// An encoding writer for `format` (xz or lzma-alone).
pub(crate) fn encoder<W: Write>(writer: W, format: Format) -> Result<XzEncoder<W>> {
    match format {
        Format::Lzma => {
            let options =
                LzmaOptions::new_preset(PRESET).map_err(|e| WrapError::codec("lzma", e))?;
            let stream =
                Stream::new_lzma_encoder(&options).map_err(|e| WrapError::codec("lzma", e))?;
            Ok(XzEncoder::new_stream(writer, stream))
        }
        _ => Ok(XzEncoder::new(writer, PRESET)),
    }
}

impl ArchiveProgram for Xz {
    fn ids(&self) -> &'static [&'static str] {
        &["builtin_xz"]
    }

    fn supports(&self, command: Command, format: Format) -> bool {
        matches!(format, Format::Xz | Format::Lzma) && command != Command::List
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        match job.operation {
            Operation::Extract { outdir } => {
                let target = single_outfile(outdir, job.archive, "");
                let mut reader = decoder(BufReader::new(File::open(job.archive)?), job.format)?;
                copy_to_file(&mut reader, &target)?;
            }
            Operation::Test => {
                let mut reader = decoder(BufReader::new(File::open(job.archive)?), job.format)?;
                io::copy(&mut reader, &mut io::sink())?;
            }
            Operation::Create { files } => {
                let source = single_file(files, "builtin_xz")?;
                let mut writer =
                    encoder(BufWriter::new(File::create(job.archive)?), job.format)?;
                io::copy(&mut File::open(source)?, &mut writer)?;
                writer.finish()?.flush()?;
            }
            Operation::List => return Err(job.mismatch("builtin_xz")),
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::Installed;

    fn roundtrip(format: Format, name: &str) {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("data.bin");
        std::fs::write(&source, b"liblzma payload").unwrap();
        let archive = dir.path().join(name);
        let outdir = dir.path().join("out");
        std::fs::create_dir(&outdir).unwrap();
        let finder = Installed::new(&[]);
        let files = vec![source];

        let mut job = Job {
            archive: &archive,
            format,
            compression: None,
            executable: "builtin_xz",
            operation: Operation::Create { files: &files },
            verbosity: 0,
            interactive: false,
            password: None,
            finder: &*finder,
        };
        XZ.build(&job).unwrap();
        job.operation = Operation::Extract { outdir: &outdir };
        XZ.build(&job).unwrap();
        assert_eq!(
            std::fs::read(outdir.join("data.bin")).unwrap(),
            b"liblzma payload"
        );
    }

    #[test]
    fn test_xz_stream() {
        roundtrip(Format::Xz, "data.bin.xz");
    }

    #[test]
    fn test_lzma_alone_stream() {
        roundtrip(Format::Lzma, "data.bin.lzma");
    }

    #[test]
    fn test_corrupt_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("bad.xz");
        std::fs::write(&archive, b"not xz at all").unwrap();
        let finder = Installed::new(&[]);
        let job = Job {
            archive: &archive,
            format: Format::Xz,
            compression: None,
            executable: "builtin_xz",
            operation: Operation::Test,
            verbosity: 0,
            interactive: false,
            password: None,
            finder: &*finder,
        };
        assert!(XZ.build(&job).is_err());
    }
}
