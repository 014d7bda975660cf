//! # Workspace Mode
//!
//! `edm --workspace <DIR> --config <FILE>` checks out every dependency of the
//! config into the workspace, writes `workspace.yaml` into each checkout and
//! copies the config into the workspace. `--update` without `--config`
//! re-runs this with the config copy of a previous run.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use log::{error, info};

use edm_tools::checkout::CheckoutOptions;
use edm_tools::error::Error;
use edm_tools::manifest;
use edm_tools::output::OutputConfig;
use edm_tools::repository::DefaultGitOperations;
use edm_tools::vscode::create_vscode_workspace;
use edm_tools::workspace::{copy_config, setup_workspace};

use super::resolve_path;
use crate::cli::CommonArgs;

/// Workspace checkout
#[derive(Args, Debug)]
#[command(next_help_heading = "Workspace")]
pub struct WorkspaceArgs {
    /// Path to a config file that contains the repositories that should be
    /// checked out into the workspace
    #[arg(long, value_name = "CONFIG")]
    pub config: Option<std::path::PathBuf>,

    /// Update workspace.yaml files with autogenerated ones
    #[arg(long)]
    pub update: bool,

    /// Never switch the branch of dependencies that are already checked out
    #[arg(long)]
    pub keep_branch: bool,

    /// Create a VS Code workspace by saving a <workspace>.code-workspace file
    /// in the workspace folder
    #[arg(long)]
    pub create_vscode_workspace: bool,
}

/// Execute the workspace mode with the given config file.
pub fn execute(
    common: &CommonArgs,
    args: &WorkspaceArgs,
    config: &Path,
    output: &OutputConfig,
) -> Result<()> {
    let workspace = common.workspace.as_deref().ok_or_else(|| Error::MissingWorkspace {
        message: "A workspace path must be provided if supplying a config. Aborting.".to_string(),
        hint: Some("pass --workspace <DIR>".to_string()),
    })?;
    let workspace = resolve_path(workspace);

    let config_path = resolve_path(config);
    if !config_path.exists() {
        return Err(Error::ConfigNotFound { path: config_path }.into());
    }
    info!("Using config \"{}\"", config_path.display());
    let table = match manifest::load(&config_path) {
        Ok(table) => table,
        Err(e @ Error::ManifestParse { .. }) => {
            error!("{}", e);
            manifest::DependencyTable::new()
        }
        Err(e) => return Err(e.into()),
    };

    let options = CheckoutOptions::new(output.clone()).keep_branch(args.keep_branch);
    let records = setup_workspace(&DefaultGitOperations, &workspace, &table, args.update, &options)
        .context("Could not setup workspace")?;

    copy_config(&config_path, &workspace)?;

    if args.create_vscode_workspace {
        create_vscode_workspace(&workspace, &records)?;
    }

    Ok(())
}
