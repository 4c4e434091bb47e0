//! ZIP archives through the `zip` crate.

use super::{copy_to_file, member_name, walk};
use crate::programs::{ArchiveProgram, Job, Operation};
use oxiwrap_core::{Command, CommandLine, Format, Result, WrapError};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub struct Zip;

pub static ZIP: Zip = Zip;

fn codec(err: zip::result::ZipError) -> WrapError {
    WrapError::codec("zip", err)
}

fn open(archive: &Path) -> Result<ZipArchive<BufReader<File>>> {
    ZipArchive::new(BufReader::new(File::open(archive)?)).map_err(codec)
}

/// Open member `index`, decrypting with `password` when given.
macro_rules! member {
    ($zip:expr, $index:expr, $password:expr) => {
        match $password {
            Some(password) => $zip.by_index_decrypt($index, password.as_bytes()),
            None => $zip.by_index($index),
        }
        .map_err(codec)?
    };
}

/// The member path, refusing absolute paths and `..` escapes.
fn safe_path(name: &str, enclosed: Option<PathBuf>) -> Result<PathBuf> {
    enclosed.ok_or_else(|| WrapError::codec("zip", format!("unsafe member path `{name}'")))
}

fn extract(archive: &Path, outdir: &Path, password: Option<&str>) -> Result<()> {
    let mut zip = open(archive)?;
    for index in 0..zip.len() {
        let mut member = member!(zip, index, password);
        let target = outdir.join(safe_path(member.name(), member.enclosed_name())?);
        if member.is_dir() {
            std::fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        debug!(member = %target.display(), "inflating");
        copy_to_file(&mut member, &target)?;
        #[cfg(unix)]
        if let Some(mode) = member.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&target, std::fs::Permissions::from_mode(mode))?;
        }
    }
    Ok(())
}

fn list(archive: &Path, password: Option<&str>, verbosity: i8) -> Result<()> {
    let mut zip = open(archive)?;
    for index in 0..zip.len() {
        let member = member!(zip, index, password);
        let path = safe_path(member.name(), member.enclosed_name())?;
        if verbosity > 1 {
            println!("{:>12}  {}", member.size(), path.display());
        } else {
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn test(archive: &Path, password: Option<&str>) -> Result<()> {
    let mut zip = open(archive)?;
    for index in 0..zip.len() {
        let mut member = member!(zip, index, password);
        safe_path(member.name(), member.enclosed_name())?;
        io::copy(&mut member, &mut io::sink())?;
    }
    Ok(())
}

fn create(archive: &Path, files: &[PathBuf]) -> Result<()> {
    let mut writer = ZipWriter::new(BufWriter::new(File::create(archive)?));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for base in files {
        for path in walk(base)? {
            let name = member_name(&path, base);
            if path.is_dir() {
                writer.add_directory(name, options).map_err(codec)?;
            } else {
                writer.start_file(name, options).map_err(codec)?;
                io::copy(&mut File::open(&path)?, &mut writer)?;
            }
        }
    }
    writer.finish().map_err(codec)?;
    Ok(())
}

impl ArchiveProgram for Zip {
    fn ids(&self) -> &'static [&'static str] {
        &["builtin_zip"]
    }

    fn supports(&self, _command: Command, format: Format) -> bool {
        format == Format::Zip
    }

    fn accepts_password(&self, command: Command, _format: Format) -> bool {
        command != Command::Create
    }

    fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        match job.operation {
            Operation::Extract { outdir } => extract(job.archive, outdir, job.password)?,
            Operation::List => list(job.archive, job.password, job.verbosity)?,
            Operation::Test => test(job.archive, job.password)?,
            Operation::Create { files } => create(job.archive, files)?,
        }
        Ok(None)
    }
}
