//! OxiWrap CLI - The Oxidized Archive Wrapper
//!
//! Extracts, lists, tests and creates archives of many formats by driving
//! whichever archiver is installed.

mod commands;
mod utils;

use clap::{Args, Parser, Subcommand};
use commands::{
    cmd_create, cmd_diff, cmd_extract, cmd_formats, cmd_list, cmd_repack, cmd_search, cmd_test,
    cmd_version,
};
use oxiwrap_core::{Format, RunConfig};
use oxiwrap_dispatch::{ArchiveOptions, Archiver};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "oxiwrap")]
#[command(author, version, about = "The Oxidized Archive Wrapper - one command for every archiver")]
#[command(long_about = "
OxiWrap detects the format of an archive and runs a suitable archiver
installed on this machine. Gzip, xz, lzma, zip and tar work even when no
archiver is installed.

Examples:
  oxiwrap extract release.tar.gz
  oxiwrap extract --outdir out backup.rar photos.7z
  oxiwrap list package.deb
  oxiwrap test --password secret vault.zip
  oxiwrap create notes.zip notes/ todo.txt
  oxiwrap diff old.tar.xz new.tar.xz
  oxiwrap search TODO sources.tar.bz2
  oxiwrap repack legacy.arj modern.tar.zst
  oxiwrap formats --json

Set OXIWRAP_LOG (e.g. OXIWRAP_LOG=debug) to see how programs are chosen.
")]
struct Cli {
    /// More output, repeat for more detail
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Less output, repeat to silence archivers too
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    quiet: u8,

    /// Never let archivers prompt, e.g. before overwriting
    #[arg(long, global = true)]
    non_interactive: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn verbosity(&self) -> i8 {
        let level = i16::from(self.verbose) - i16::from(self.quiet);
        level.clamp(i16::from(i8::MIN), i16::from(i8::MAX)) as i8
    }

    fn config(&self) -> RunConfig {
        RunConfig::new(self.verbosity(), !self.non_interactive)
    }
}

/// Overrides shared by the archive commands.
#[derive(Args, Debug)]
struct ArchiveArgs {
    /// Archive password
    #[arg(short, long)]
    password: Option<String>,

    /// Program to try first, e.g. 7z or /opt/bin/unrar
    #[arg(long)]
    program: Option<String>,

    /// Archive format, skipping detection (zip, tar, 7z, ...)
    #[arg(short, long, value_parser = utils::parse_format)]
    format: Option<Format>,

    /// Compression around the archive format (gzip, xz, zstd, ...)
    #[arg(short, long, value_parser = utils::parse_format, requires = "format")]
    compression: Option<Format>,
}

impl ArchiveArgs {
    fn options(&self) -> ArchiveOptions<'_> {
        ArchiveOptions::new()
            .format(self.format, self.compression)
            .program(self.program.as_deref())
            .password(self.password.as_deref())
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract one or more archives
    #[command(alias = "x")]
    Extract {
        /// Archives to extract
        #[arg(required = true)]
        archives: Vec<PathBuf>,

        /// Output directory (default: a new directory in the working directory)
        #[arg(short, long)]
        outdir: Option<PathBuf>,

        #[command(flatten)]
        archive: ArchiveArgs,
    },

    /// List the contents of one or more archives
    #[command(alias = "l")]
    List {
        /// Archives to list
        #[arg(required = true)]
        archives: Vec<PathBuf>,

        #[command(flatten)]
        archive: ArchiveArgs,
    },

    /// Test one or more archives
    #[command(alias = "t")]
    Test {
        /// Archives to test
        #[arg(required = true)]
        archives: Vec<PathBuf>,

        #[command(flatten)]
        archive: ArchiveArgs,
    },

    /// Create an archive, its format chosen by the file name
    #[command(alias = "c")]
    Create {
        /// Archive to create, must not exist
        target: PathBuf,

        /// Files and directories to add
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        archive: ArchiveArgs,
    },

    /// Show differences between the contents of two archives
    Diff {
        /// First archive
        first: PathBuf,

        /// Second archive
        second: PathBuf,

        #[command(flatten)]
        archive: ArchiveArgs,
    },

    /// Search the contents of an archive for a pattern
    Search {
        /// Pattern for grep
        pattern: String,

        /// Archive to search
        target: PathBuf,

        #[command(flatten)]
        archive: ArchiveArgs,
    },

    /// Convert an archive to the format of the target file name
    Repack {
        /// Archive to convert
        source: PathBuf,

        /// New archive, must not exist
        target: PathBuf,

        #[command(flatten)]
        archive: ArchiveArgs,
    },

    /// Show which program handles each format and command
    Formats {
        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    utils::init_logging(cli.verbosity());
    utils::install_panic_hook();
    std::process::exit(run(cli));
}

fn run(cli: Cli) -> i32 {
    let config = cli.config();
    let archiver = || Archiver::system(config);

    let result = match &cli.command {
        Commands::Extract {
            archives,
            outdir,
            archive,
        } => cmd_extract(&archiver(), archives, outdir.as_deref(), &archive.options()),
        Commands::List { archives, archive } => cmd_list(&archiver(), archives, &archive.options()),
        Commands::Test { archives, archive } => cmd_test(&archiver(), archives, &archive.options()),
        Commands::Create {
            target,
            files,
            archive,
        } => cmd_create(&archiver(), target, files, &archive.options()).map(|()| 0),
        Commands::Diff {
            first,
            second,
            archive,
        } => cmd_diff(&archiver(), first, second, &archive.options()),
        Commands::Search {
            pattern,
            target,
            archive,
        } => cmd_search(&archiver(), pattern, target, &archive.options()),
        Commands::Repack {
            source,
            target,
            archive,
        } => cmd_repack(&archiver(), source, target, &archive.options()).map(|()| 0),
        Commands::Formats { json } => cmd_formats(&archiver(), *json).map(|()| 0),
        Commands::Version => cmd_version().map(|()| 0),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("oxiwrap: error: {e}");
            1
        }
    }
}
