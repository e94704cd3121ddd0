//! Platform layer: XDG paths, permission bits and external commands.
//!
//! All environment reads and `std::os::unix` usage live here so the
//! deployment steps stay free of ambient lookups.
//!
//! - `paths` - XDG base directories
//! - `permissions` - owner-only directories
//! - `process` - blocking command execution

pub mod paths;
pub mod permissions;
pub mod process;

pub use paths::XdgDirs;
pub use permissions::{create_dir_all_with_mode, is_owner_only};
pub use process::{command_exists, run_checked};
