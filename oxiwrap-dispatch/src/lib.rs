//! # OxiWrap Dispatch
//!
//! Format detection, program resolution and command dispatch for OxiWrap.
//!
//! This crate turns "extract this file" into a concrete invocation of an
//! archiver installed on the machine:
//!
//! - [`detect`]: content sniffing with an extension-based fallback, memoized
//!   per path
//! - [`registry`]: ordered candidate programs per format and command
//! - [`resolve`]: picks the first installed, capable candidate, with a
//!   compression-as-format fallback
//! - [`dispatch`] and [`programs`]: per-program command builders
//! - [`archiver`]: extract, list, test, create, diff, search and repack
//!
//! Small in-process codecs (gzip, xz, zip, tar) act as last-resort
//! candidates so that common formats work without any archiver installed.
//!
//! ## Example
//!
//! ```rust,no_run
//! use oxiwrap_core::RunConfig;
//! use oxiwrap_dispatch::{ArchiveOptions, Archiver};
//! use std::path::Path;
//!
//! let archiver = Archiver::system(RunConfig::default());
//! let out = archiver
//!     .extract(Path::new("release.tar.gz"), None, &ArchiveOptions::new())
//!     .unwrap();
//! println!("extracted to {}", out.display());
//! ```
//!
//! ## Collaborators
//!
//! Search-path lookups, child processes, mime sniffing and codec probes go
//! through the traits in [`oxiwrap_core::traits`]. [`system`] has the real
//! implementations; [`Archiver::new`] accepts any others.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod archiver;
mod builtin;
pub mod detect;
pub mod dispatch;
pub mod magic;
pub mod mime;
pub mod outdir;
pub mod probe;
pub mod programs;
pub mod registry;
pub mod resolve;
pub mod sniff;
pub mod system;

#[cfg(test)]
mod fakes;

// Re-exports
pub use archiver::{ArchiveOptions, Archiver, CommandSupport, FormatSupport};
pub use detect::{Detected, Detector};
pub use dispatch::{Dispatched, lookup, normalize};
pub use magic::MagicSniffer;
pub use probe::{CompressionSupport, ExecutableCache, SevenZipCodecs};
pub use programs::{ArchiveProgram, Job, Operation};
pub use resolve::{Executable, Program, Resolution, ResolveRequest, Resolver};
pub use sniff::{FileSniffer, SystemSniffer};
pub use system::{SystemRunner, WhichFinder};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::archiver::{ArchiveOptions, Archiver};
    pub use crate::resolve::{ResolveRequest, Resolver};
    pub use oxiwrap_core::prelude::*;
}
