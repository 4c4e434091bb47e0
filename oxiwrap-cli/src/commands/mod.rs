//! Command implementations for OxiWrap CLI.

pub mod create;
pub mod diff;
pub mod extract;
pub mod formats;
pub mod list;
pub mod repack;
pub mod search;
pub mod version;

pub use create::cmd_create;
pub use diff::cmd_diff;
pub use extract::cmd_extract;
pub use formats::cmd_formats;
pub use list::cmd_list;
pub use repack::cmd_repack;
pub use search::cmd_search;
pub use test::cmd_test;
pub use version::cmd_version;
