//! CLI argument parsing and mode dispatch
//!
//! `edm` has no subcommands. Flags select one of several modes, checked in
//! this order: setup actions, git pull, git info, Bazel output, workspace
//! checkout from a config, config synthesis, CMake output.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser};
use log::{info, warn};

use edm_tools::defaults::{CPM_SOURCE_CACHE_ENV, WORKSPACE_CONFIG_FILE};
use edm_tools::output::{init_logging, OutputConfig};

use crate::commands;

/// EVerest Dependency Manager - check out multi-repository workspaces and
/// generate build-system glue from dependencies.yaml files
#[derive(Parser, Debug)]
#[command(name = "edm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub workspace: commands::workspace::WorkspaceArgs,

    #[command(flatten)]
    pub cmake: commands::cmake::CmakeArgs,

    #[command(flatten)]
    pub bazel: commands::bazel::BazelArgs,

    #[command(flatten)]
    pub create_config: commands::create_config::CreateConfigArgs,

    #[command(flatten)]
    pub git: commands::git_status::GitArgs,

    #[command(flatten)]
    pub setup: commands::setup::SetupArgs,
}

/// Options shared by all modes
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Directory in which source code repositories that are explicitly
    /// requested are checked out
    #[arg(long, value_name = "WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Working directory, default is the current one
    #[arg(
        long = "working_dir",
        visible_alias = "working-dir",
        value_name = "WORKINGDIR",
        default_value = "."
    )]
    pub working_dir: PathBuf,

    /// Include dependency files that are stored in "_deps" directories.
    /// These are part of the in-tree source cache of CPM, so you almost never
    /// want this
    #[arg(long = "include_deps", visible_alias = "include-deps")]
    pub include_deps: bool,

    /// Verbose output
    #[arg(long)]
    pub verbose: bool,

    /// No color output
    #[arg(long)]
    pub nocolor: bool,

    /// Colorize output (always, never, auto)
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: String,
}

impl CommonArgs {
    pub fn output_config(&self) -> OutputConfig {
        if self.nocolor {
            OutputConfig::without_color()
        } else {
            OutputConfig::from_env_and_flag(&self.color)
        }
    }
}

impl Cli {
    /// Execute the selected mode
    pub fn execute(self) -> Result<()> {
        let output = self.common.output_config();
        init_logging("edm", self.common.verbose, &output);

        if std::env::var_os(CPM_SOURCE_CACHE_ENV).is_none_or(|v| v.is_empty()) {
            warn!(
                "{} environment variable is not set, this might lead to unintended behavior.",
                CPM_SOURCE_CACHE_ENV
            );
        }

        if self.setup.register_cmake_module {
            commands::setup::register_cmake_module()?;
        }
        if self.setup.install_bash_completion {
            return commands::setup::install_bash_completion();
        }

        if let Some(repos) = &self.git.git_pull {
            return commands::git_status::pull(&self.common, repos, &output);
        }
        if self.git.git_info {
            return commands::git_status::info(&self.common, &self.git, &output);
        }

        if let Some(manifest) = &self.bazel.bazel {
            return commands::bazel::execute(manifest, &self.bazel.build_file);
        }

        let mut common = self.common.clone();
        let mut config = self.workspace.config.clone();
        if config.is_none() && !self.cmake.cmake && self.create_config.create_config.is_none() {
            if !self.workspace.update {
                info!("No --config, --cmake or --create-config parameter given, exiting.");
                return Ok(());
            }
            let workspace = match &common.workspace {
                Some(workspace) => workspace.clone(),
                None => {
                    let cwd = std::env::current_dir()?;
                    info!(
                        "No workspace provided, using current directory \"{}\"",
                        cwd.display()
                    );
                    cwd
                }
            };
            let config_path = workspace.join(WORKSPACE_CONFIG_FILE);
            info!("No config provided, using \"{}\"", config_path.display());
            common.workspace = Some(workspace);
            config = Some(config_path);
        }

        if let Some(config) = config {
            return commands::workspace::execute(&common, &self.workspace, &config, &output);
        }

        if let Some(path) = &self.create_config.create_config {
            return commands::create_config::execute(&common, &self.create_config, path, &output);
        }

        commands::cmake::execute(&common, &self.cmake, &output)
    }
}
