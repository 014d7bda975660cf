//! Bazel mode: print a `.bzl` file declaring the dependencies of one manifest.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use edm_tools::manifest;
use edm_tools::render::render_bazel;

/// Bazel integration
#[derive(Args, Debug)]
#[command(next_help_heading = "Bazel")]
pub struct BazelArgs {
    /// Print a .bzl file with an edm_deps() macro for the given
    /// dependencies.yaml
    #[arg(long, value_name = "DEPENDENCIES_YAML")]
    pub bazel: Option<PathBuf>,

    /// Build file label (@ws//path:BUILD.<name>.bazel) to attach to the
    /// dependency <name>; can be repeated
    #[arg(long, value_name = "LABEL")]
    pub build_file: Vec<String>,
}

pub fn execute(manifest_path: &Path, build_files: &[String]) -> Result<()> {
    let dependencies = manifest::load(manifest_path)?;
    print!("{}", render_bazel(&dependencies, build_files));
    Ok(())
}
