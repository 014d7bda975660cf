//! # CLI Mode Implementations
//!
//! This module contains the implementation for each mode of the `edm`
//! command-line tool. Each mode is defined in its own file to keep the logic
//! separated and maintainable.
//!
//! ## Structure
//!
//! Each mode module typically contains:
//! - An `Args` struct with the mode-specific flags, derived using `clap` and
//!   flattened into the top-level `Cli`.
//! - An `execute` function that performs the mode's logic by calling into the
//!   `edm_tools` library.

pub mod bazel;
pub mod cmake;
pub mod create_config;
pub mod git_status;
pub mod setup;
pub mod workspace;

use std::path::{Path, PathBuf};

/// Expand a leading `~` and make `path` absolute.
pub fn resolve_path(path: &Path) -> PathBuf {
    let expanded = match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    };
    std::path::absolute(&expanded).unwrap_or(expanded)
}
