//! # CMake Mode
//!
//! `edm --cmake` is run from a CMake script. It scans the working directory
//! for manifests, checks out the dependencies the repository's
//! `workspace.yaml` asks for, and writes CPM declarations to `--out`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use log::{error, info};

use edm_tools::checkout::CheckoutOptions;
use edm_tools::defaults::DEFAULT_CMAKE_OUT;
use edm_tools::error::Error;
use edm_tools::manifest;
use edm_tools::output::OutputConfig;
use edm_tools::render::write_cpm;
use edm_tools::repository::DefaultGitOperations;
use edm_tools::workspace::{
    checkout_local_dependencies, find_metadata_file, load_metadata, WorkspaceMetadata,
};

use super::resolve_path;
use crate::cli::CommonArgs;

/// CMake integration
#[derive(Args, Debug)]
#[command(next_help_heading = "CMake")]
pub struct CmakeArgs {
    /// Indicate that the dependency manager was called from a CMake script
    #[arg(long)]
    pub cmake: bool,

    /// Path of the file that will contain the generated CPM cmake information
    #[arg(long, value_name = "OUTFILENAME", default_value = DEFAULT_CMAKE_OUT)]
    pub out: PathBuf,
}

/// Execute the CMake mode.
pub fn execute(common: &CommonArgs, args: &CmakeArgs, output: &OutputConfig) -> Result<()> {
    let working_dir = resolve_path(&common.working_dir);
    info!("Scanning \"{}\" for dependencies.", working_dir.display());
    let out_file = resolve_path(&args.out);

    let metadata_file = find_metadata_file(&working_dir)?;
    let dependencies = manifest::scan(&working_dir, common.include_deps);

    let metadata = match metadata_file {
        Some(file) => {
            info!("Using workspace file: {}", file.display());
            load_metadata(&file).unwrap_or_else(|e| {
                error!("{}", e);
                WorkspaceMetadata::default()
            })
        }
        None => WorkspaceMetadata::default(),
    };

    let mut checkout = Vec::new();
    if metadata.local_dependencies.is_some() {
        // The command line always takes precedence
        let workspace_dir = if let Some(workspace) = &common.workspace {
            let dir = resolve_path(workspace);
            info!("Using workspace directory \"{}\" from command line.", dir.display());
            dir
        } else if let Some(workspace) = &metadata.workspace {
            let dir = resolve_path(workspace);
            info!("Using workspace directory \"{}\" from workspace.yaml.", dir.display());
            dir
        } else {
            return Err(Error::MissingWorkspace {
                message: "Cannot checkout requested dependencies without a workspace directory, aborting."
                    .to_string(),
                hint: Some("pass --workspace or add a \"workspace\" key to workspace.yaml".to_string()),
            }
            .into());
        };

        let options = CheckoutOptions::new(output.clone());
        checkout = checkout_local_dependencies(
            &DefaultGitOperations,
            &metadata,
            &dependencies,
            &workspace_dir,
            &options,
        )?;
    }

    write_cpm(&out_file, &dependencies, &checkout, &metadata)?;
    Ok(())
}
