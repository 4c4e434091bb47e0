//! TAR archives through the `tar` crate, optionally gzip or xz compressed.

use super::{member_name, walk, xz};
use crate::programs::{ArchiveProgram, Job, Operation};
use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use oxiwrap_core::{Command, CommandLine, Format, Result, WrapError};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct Tar;

pub static TAR: Tar = Tar;

/// Compressions the built-in tar can apply and remove.
pub const COMPRESSIONS: &[Format] = &[Format::Gzip, Format::Xz];

fn unsupported(compression: Format) -> WrapError {
    WrapError::codec("tar", format!("cannot handle {compression} compression"))
}

fn reader(archive: &Path, compression: Option<Format>) -> Result<Box<dyn Read>> {
    let file = BufReader::new(File::open(archive)?);
    Ok(match compression {
        None => Box::new(file),
        Some(Format::Gzip) => Box::new(MultiGzDecoder::new(file)),
        Some(Format::Xz) => Box::new(xz::decoder(file, Format::Xz)?),
        Some(other) => return Err(unsupported(other)),
    })
}

fn append_all<W: Write>(builder: &mut tar::Builder<W>, files: &[PathBuf]) -> Result<()> {
    for base in files {
        for path in walk(base)? {
            let name = member_name(&path, base);
            debug!(member = %name, "adding");
            if path.is_dir() {
                builder.append_dir(&name, &path)?;
            } else {
                builder.append_path_with_name(&path, &name)?;
            }
        }
    }
    Ok(())
}

fn write_tar<W: Write>(writer: W, files: &[PathBuf]) -> Result<W> {
    let mut builder = tar::Builder::new(writer);
    builder.follow_symlinks(false);
    append_all(&mut builder, files)?;
    Ok(builder.into_inner()?)
}

fn create(archive: &Path, files: &[PathBuf], compression: Option<Format>) -> Result<()> {
    let out = BufWriter::new(File::create(archive)?);
    let mut out = match compression {
        None => write_tar(out, files)?,
        Some(Format::Gzip) => {
            write_tar(GzEncoder::new(out, Compression::default()), files)?.finish()?
        }
        Some(Format::Xz) => write_tar(xz::encoder(out, Format::Xz)?, files)?.finish()?,
        Some(other) => return Err(unsupported(other)),
    };
    out.flush()?;
    Ok(())
}

impl ArchiveProgram for Tar {
    fn ids(&self) -> &'static [&'static str] {
        &["builtin_tar"]
    }

    fn supports(&self, _command: Command, format: Format) -> bool {
        format == Format::Tar
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        match job.operation {
            Operation::Extract { outdir } => {
                let mut archive = tar::Archive::new(reader(job.archive, job.compression)?);
                archive.set_preserve_permissions(true);
                archive.unpack(outdir)?;
            }
            Operation::List => {
                let mut archive = tar::Archive::new(reader(job.archive, job.compression)?);
                for entry in archive.entries()? {
                    let entry = entry?;
                    if job.verbosity > 1 {
                        println!("{:>12}  {}", entry.size(), entry.path()?.display());
                    } else {
                        println!("{}", entry.path()?.display());
                    }
                }
            }
            Operation::Test => {
                let mut archive = tar::Archive::new(reader(job.archive, job.compression)?);
                for entry in archive.entries()? {
                    io::copy(&mut entry?, &mut io::sink())?;
                }
            }
            Operation::Create { files } => create(job.archive, files, job.compression)?,
        }
        Ok(None)
    }
}
