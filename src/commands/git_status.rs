//! Git info and git pull modes.

use anyhow::Result;
use clap::Args;
use log::info;

use edm_tools::output::OutputConfig;
use edm_tools::repository::DefaultGitOperations;
use edm_tools::status::{collect_status, pull_all, report_pull, report_status};

use super::resolve_path;
use crate::cli::CommonArgs;

/// Git repository status
#[derive(Args, Debug)]
#[command(next_help_heading = "Git")]
pub struct GitArgs {
    /// Show information of git repositories in working_dir
    #[arg(long)]
    pub git_info: bool,

    /// Use git-fetch to get updated info from remote
    #[arg(long)]
    pub git_fetch: bool,

    /// Use git-pull to pull all git repositories in working_dir, or only the
    /// given ones
    #[arg(long, value_name = "REPO", num_args = 0..)]
    pub git_pull: Option<Vec<String>>,
}

/// Report the state of every repository in the workspace, or in the working
/// directory if no workspace was given.
pub fn info(common: &CommonArgs, args: &GitArgs, output: &OutputConfig) -> Result<()> {
    let dir = match &common.workspace {
        Some(workspace) => {
            info!("Workspace provided, executing git-info in workspace");
            resolve_path(workspace)
        }
        None => resolve_path(&common.working_dir),
    };

    info!("Git info for \"{}\":", dir.display());
    if args.git_fetch {
        info!("Using git-fetch to update remote information. This might take a few seconds.");
    }
    let statuses = collect_status(&DefaultGitOperations, &dir, args.git_fetch)?;
    report_status(&statuses, output);
    Ok(())
}

/// Pull the repositories of the working directory. Failures are reported
/// but do not fail the command.
pub fn pull(common: &CommonArgs, repos: &[String], output: &OutputConfig) -> Result<()> {
    let dir = resolve_path(&common.working_dir);
    let outcomes = pull_all(&DefaultGitOperations, &dir, repos)?;
    report_pull(&outcomes, output);
    Ok(())
}
