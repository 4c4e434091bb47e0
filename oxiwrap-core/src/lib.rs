//! # OxiWrap Core
//!
//! Core components for the OxiWrap archive manager.
//!
//! OxiWrap does not encode archives itself. It identifies what a file is,
//! picks one of the external archivers installed on the machine and drives it
//! with the right arguments. This crate holds the vocabulary shared by every
//! layer:
//!
//! - [`format`]: the closed sets of archive formats and commands
//! - [`command`]: the argument vector handed to the process runner
//! - [`traits`]: collaborator interfaces (search path, process runner, mime
//!   sniffing, codec probing)
//! - [`memo`]: explicit process-lifetime caches for expensive probes
//! - [`config`]: run configuration (verbosity, interactivity)
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L4: Orchestration                                       │
//! │     extract / list / test / create / diff / repack, CLI │
//! ├─────────────────────────────────────────────────────────┤
//! │ L3: Dispatch                                            │
//! │     per-program command builders, built-in codecs       │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Resolution                                          │
//! │     format detection, capability registry, resolver     │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Core (this crate)                                   │
//! │     Format, Command, CommandLine, traits, Memo, errors  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxiwrap_core::{Command, Format};
//!
//! let format: Format = "gzip".parse().unwrap();
//! assert!(format.is_compression());
//! assert_eq!(Command::Extract.to_string(), "extract");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod command;
pub mod config;
pub mod error;
pub mod format;
pub mod memo;
pub mod traits;

// Re-exports for convenience
pub use command::CommandLine;
pub use config::RunConfig;
pub use error::{Result, WrapError};
pub use format::{Command, Format};
pub use memo::Memo;
pub use traits::{Captured, CodecProbe, CommandRunner, ExecutableFinder, MimeSniffer, Sniffed};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::command::CommandLine;
    pub use crate::config::RunConfig;
    pub use crate::error::{Result, WrapError};
    pub use crate::format::{Command, Format};
    pub use crate::traits::{CodecProbe, CommandRunner, ExecutableFinder, MimeSniffer};
}
