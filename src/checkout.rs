//! # Workspace Checkout Engine
//!
//! Makes sure every dependency of a [`DependencyTable`] is present as a git
//! checkout at `<workspace>/<name>`. Each dependency goes through a small
//! state machine:
//!
//! | Local state              | Action                                          |
//! |--------------------------|-------------------------------------------------|
//! | absent                   | clone (at the requested ref, if any)            |
//! | present, dirty           | nothing, a warning is logged                    |
//! | present, clean, keep     | nothing, the current ref is kept                |
//! | present, clean, ref      | `git checkout <ref>`, failures are only logged  |
//! | present, clean, no ref   | nothing                                         |
//!
//! A failed clone is fatal and aborts the whole run with
//! [`Error::Checkout`]. A failed ref switch leaves the repository on whatever
//! ref it had and the run continues.

use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::manifest::{DependencyEntry, DependencyTable};
use crate::output::OutputConfig;
use crate::repository::GitOperations;

/// Result of checking out one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutRecord {
    /// Dependency name.
    pub name: String,
    /// Local checkout directory.
    pub path: PathBuf,
    /// The ref that was requested for the dependency.
    pub git_tag: Option<String>,
}

/// Options controlling how existing checkouts are treated.
#[derive(Debug, Clone, Default)]
pub struct CheckoutOptions {
    /// Never switch the ref of an existing checkout.
    pub keep_branch: bool,
    /// Output formatting for highlighted names.
    pub output: OutputConfig,
}

impl CheckoutOptions {
    pub fn new(output: OutputConfig) -> Self {
        Self {
            keep_branch: false,
            output,
        }
    }

    pub fn keep_branch(mut self, keep_branch: bool) -> Self {
        self.keep_branch = keep_branch;
        self
    }
}

/// Make sure `name` is checked out at `checkout_dir`.
pub fn checkout_dependency(
    git: &dyn GitOperations,
    name: &str,
    entry: &DependencyEntry,
    checkout_dir: &Path,
    options: &CheckoutOptions,
) -> Result<CheckoutRecord> {
    let git_tag = entry.git_tag.as_deref();

    info!(
        "Setting up dependency \"{}\" in workspace",
        options.output.green(name)
    );
    debug!("  git-remote: \"{}\"", entry.git);
    debug!("  git-tag: \"{}\"", git_tag.unwrap_or_default());
    debug!("  local directory: \"{}\"", checkout_dir.display());

    if checkout_dir.exists() {
        debug!(
            "    ... the directory for dependency \"{}\" already exists at \"{}\".",
            name,
            checkout_dir.display()
        );
        if git.is_dirty(checkout_dir) {
            warn!(
                "    Repo \"{}\" is dirty, nothing will be done to this repo.",
                name
            );
        } else if options.keep_branch {
            debug!("    Keeping the currently checked out branch of \"{}\".", name);
        } else if let Some(git_tag) = git_tag {
            debug!(
                "    Repo is not dirty, checking out requested git tag \"{}\"",
                git_tag
            );
            if let Err(e) = git.checkout(checkout_dir, git_tag) {
                error!(
                    "    Could not check out \"{}\" in \"{}\": {}",
                    git_tag, name, e
                );
            }
        }
    } else {
        if git_tag.is_none() {
            debug!("  No git-tag specified, cloning default branch.");
        }
        git.clone_repo(&entry.git, git_tag, checkout_dir)
            .map_err(|e| Error::Checkout {
                name: name.to_string(),
                url: entry.git.clone(),
                r#ref: git_tag.map(str::to_string),
                message: match e {
                    Error::GitCommand { stderr, .. } => stderr,
                    other => other.to_string(),
                },
            })?;
    }

    Ok(CheckoutRecord {
        name: name.to_string(),
        path: checkout_dir.to_path_buf(),
        git_tag: git_tag.map(str::to_string),
    })
}

/// Check out every dependency of `table` below `workspace`.
///
/// Stops at the first clone failure; records of earlier dependencies are
/// discarded in that case.
pub fn checkout_all(
    git: &dyn GitOperations,
    workspace: &Path,
    table: &DependencyTable,
    options: &CheckoutOptions,
) -> Result<Vec<CheckoutRecord>> {
    table
        .iter()
        .map(|(name, entry)| {
            checkout_dependency(git, name, entry, &workspace.join(name), options)
        })
        .collect()
}
