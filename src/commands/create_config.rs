//! # Create Config Mode
//!
//! `edm --create-config <PATH>` writes a config describing the repositories
//! found in the working directory, so the same workspace can be checked out
//! again elsewhere.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use log::info;

use edm_tools::defaults::DEFAULT_INCLUDE_REMOTES;
use edm_tools::manifest;
use edm_tools::output::OutputConfig;
use edm_tools::repository::DefaultGitOperations;
use edm_tools::synthesize::{synthesize_config, SynthesisOptions};

use super::resolve_path;
use crate::cli::CommonArgs;

/// Config synthesis
#[derive(Args, Debug)]
#[command(next_help_heading = "Config creation")]
pub struct CreateConfigArgs {
    /// Creates a config file at the given path containing all dependencies
    /// from the working directory
    #[arg(long, value_name = "CREATECONFIG")]
    pub create_config: Option<PathBuf>,

    /// Include external dependencies in created config file
    #[arg(long)]
    pub external_in_config: bool,

    /// List of git remotes that are included in a created config file
    #[arg(
        long,
        value_name = "INTERNAL",
        num_args = 0..,
        default_value = DEFAULT_INCLUDE_REMOTES
    )]
    pub include_remotes: Vec<String>,
}

pub fn execute(
    common: &CommonArgs,
    args: &CreateConfigArgs,
    path: &Path,
    output: &OutputConfig,
) -> Result<()> {
    let working_dir = resolve_path(&common.working_dir);
    info!("Scanning \"{}\" for dependencies.", working_dir.display());
    let known = manifest::scan(&working_dir, common.include_deps);

    let new_config_path = resolve_path(path);
    info!("Creating config");
    let options = SynthesisOptions {
        include_remotes: args.include_remotes.clone(),
        include_external: args.external_in_config,
    };
    let config = synthesize_config(&DefaultGitOperations, &known, &working_dir, &options)?;

    for name in config.keys() {
        info!("Adding \"{}\" to config.", output.green(name));
    }
    manifest::save(&new_config_path, &config)?;
    info!("Successfully saved config \"{}\".", new_config_path.display());
    Ok(())
}
