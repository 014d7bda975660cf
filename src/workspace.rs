//! # Workspace Setup and Metadata
//!
//! A workspace is a directory holding one checkout per dependency. After the
//! checkouts are in place every dependency receives a `workspace.yaml` that
//! records the workspace root and the ref of every sibling checked out in the
//! same run:
//!
//! ```yaml
//! workspace: /home/dev/checkout
//! local_dependencies:
//!   everest-core:
//!     git_tag: main
//!   libocpp:
//!     git_tag: null
//! ```
//!
//! The build-glue generator later reads this file back from a repository root
//! to decide which dependencies to take from the workspace instead of letting
//! CPM download them.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::checkout::{checkout_all, checkout_dependency, CheckoutOptions, CheckoutRecord};
use crate::defaults::{WORKSPACE_CONFIG_FILE, WORKSPACE_FILE_NAMES, WORKSPACE_METADATA_FILE};
use crate::error::{Error, Result};
use crate::manifest::DependencyTable;
use crate::repository::GitOperations;

/// Ref of one dependency inside a workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalDependency {
    #[serde(default)]
    pub git_tag: Option<String>,
}

/// Contents of a `workspace.yaml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceMetadata {
    /// Root directory of the workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<PathBuf>,

    /// Dependencies checked out in the workspace. An entry may be empty
    /// (`name:` without a body) when the file is written by hand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_dependencies: Option<BTreeMap<String, Option<LocalDependency>>>,
}

impl WorkspaceMetadata {
    /// Build the metadata shared by every checkout of one run.
    pub fn for_checkout(workspace: &Path, records: &[CheckoutRecord]) -> Self {
        let local_dependencies = records
            .iter()
            .map(|record| {
                (
                    record.name.clone(),
                    Some(LocalDependency {
                        git_tag: record.git_tag.clone(),
                    }),
                )
            })
            .collect();

        Self {
            workspace: Some(workspace.to_path_buf()),
            local_dependencies: Some(local_dependencies),
        }
    }

    /// The ref requested for `name`, if it is listed with a tag.
    pub fn git_tag(&self, name: &str) -> Option<&str> {
        self.local_dependencies
            .as_ref()?
            .get(name)?
            .as_ref()?
            .git_tag
            .as_deref()
    }
}

/// Read a workspace metadata file.
pub fn load_metadata(path: &Path) -> Result<WorkspaceMetadata> {
    let content = fs::read_to_string(path)?;
    let to_error = |e: serde_yaml::Error| Error::ManifestParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let value: serde_yaml::Value = serde_yaml::from_str(&content).map_err(to_error)?;
    if value.is_null() {
        return Ok(WorkspaceMetadata::default());
    }
    serde_yaml::from_value(value).map_err(to_error)
}

/// Find the workspace metadata file at the top of `dir`.
///
/// Having both `workspace.yaml` and `workspace.yml` is an error.
pub fn find_metadata_file(dir: &Path) -> Result<Option<PathBuf>> {
    let mut files: Vec<PathBuf> = WORKSPACE_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .filter(|path| path.is_file())
        .collect();

    if files.len() > 1 {
        return Err(Error::MultipleWorkspaceFiles { files });
    }
    Ok(files.pop())
}

/// Write `workspace.yaml` into every checked-out dependency.
///
/// An existing file is only replaced when `overwrite` is set; otherwise it
/// is left untouched with a warning. Returns the files that were written.
pub fn write_metadata(
    workspace: &Path,
    records: &[CheckoutRecord],
    overwrite: bool,
    options: &CheckoutOptions,
) -> Result<Vec<PathBuf>> {
    if !records.is_empty() {
        info!(
            "Creating a workspace.yaml in each dependency directory, \
             ensuring that each repository uses the correct local dependency."
        );
    }

    let metadata = WorkspaceMetadata::for_checkout(workspace, records);
    let content = serde_yaml::to_string(&metadata)?;
    let mut written = Vec::new();

    for record in records {
        let file = record.path.join(WORKSPACE_METADATA_FILE);
        info!("  {}", options.output.green(&record.name));

        if file.exists() {
            warn!("    \"{}\" already exists.", file.display());
            if overwrite {
                info!("    Updating workspace.yaml");
            } else {
                warn!("    Use --update to overwrite workspace.yaml");
                continue;
            }
        }

        debug!("    Writing \"{}\"", file.display());
        fs::write(&file, &content)?;
        written.push(file);
    }

    Ok(written)
}

/// Check out every dependency of `table` into `workspace` and write the
/// metadata files.
pub fn setup_workspace(
    git: &dyn GitOperations,
    workspace: &Path,
    table: &DependencyTable,
    overwrite: bool,
    options: &CheckoutOptions,
) -> Result<Vec<CheckoutRecord>> {
    info!("Setting up workspace \"{}\"", workspace.display());
    fs::create_dir_all(workspace)?;

    let records = checkout_all(git, workspace, table, options)?;
    write_metadata(workspace, &records, overwrite, options)?;

    info!("Done.");
    Ok(records)
}

/// Check out the dependencies a repository's `workspace.yaml` asks for.
///
/// Only names that also appear in `dependencies` are checked out; a ref
/// listed in the metadata replaces the manifest ref. A clone failure aborts.
pub fn checkout_local_dependencies(
    git: &dyn GitOperations,
    metadata: &WorkspaceMetadata,
    dependencies: &DependencyTable,
    workspace: &Path,
    options: &CheckoutOptions,
) -> Result<Vec<CheckoutRecord>> {
    let Some(local_dependencies) = &metadata.local_dependencies else {
        return Ok(Vec::new());
    };

    let mut records = Vec::new();
    for (name, local) in local_dependencies {
        let Some(entry) = dependencies.get(name) else {
            debug!(
                "{}: listed in workspace.yaml, but not in dependencies. Ignoring.",
                name
            );
            continue;
        };
        let mut entry = entry.clone();
        if let Some(local) = local {
            entry.git_tag = local.git_tag.clone();
        }
        records.push(checkout_dependency(
            git,
            name,
            &entry,
            &workspace.join(name),
            options,
        )?);
    }

    Ok(records)
}

/// Copy the config a workspace was created from into the workspace.
///
/// Returns `false` when the config already is that file.
pub fn copy_config(config_path: &Path, workspace: &Path) -> Result<bool> {
    let destination = workspace.join(WORKSPACE_CONFIG_FILE);

    if destination.exists() && fs::canonicalize(&destination)? == fs::canonicalize(config_path)? {
        info!(
            "Did not copy workspace config because source and destination are the same \"{}\"",
            config_path.display()
        );
        return Ok(false);
    }

    fs::copy(config_path, &destination)?;
    info!("Copied config into \"{}\"", destination.display());
    Ok(true)
}
