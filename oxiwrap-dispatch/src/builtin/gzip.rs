//! gzip through flate2.

use super::copy_to_file;
use crate::programs::{ArchiveProgram, Job, Operation, single_file, single_outfile};
use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use oxiwrap_core::{Command, CommandLine, Format, Result};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use tracing::debug;

pub struct Gzip;

pub static GZIP: Gzip = Gzip;

impl ArchiveProgram for Gzip {
    fn ids(&self) -> &'static [&'static str] {
        &["builtin_gzip"]
    }

    fn supports(&self, command: Command, format: Format) -> bool {
        format == Format::Gzip && command != Command::List
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        match job.operation {
            Operation::Extract { outdir } => {
                let target = single_outfile(outdir, job.archive, "");
                debug!(archive = %job.archive.display(), target = %target.display(), "gunzip");
                let mut decoder = MultiGzDecoder::new(BufReader::new(File::open(job.archive)?));
                copy_to_file(&mut decoder, &target)?;
            }
            Operation::Test => {
                let mut decoder = MultiGzDecoder::new(BufReader::new(File::open(job.archive)?));
                io::copy(&mut decoder, &mut io::sink())?;
            }
            Operation::Create { files } => {
                let source = single_file(files, "builtin_gzip")?;
                let mut encoder =
                    GzEncoder::new(BufWriter::new(File::create(job.archive)?), Compression::best());
                io::copy(&mut File::open(source)?, &mut encoder)?;
                encoder.finish()?.flush()?;
            }
            Operation::List => return Err(job.mismatch("builtin_gzip")),
        }
        Ok(None)
    }
}
