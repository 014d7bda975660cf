//! # Config Synthesis
//!
//! The inverse of a workspace checkout: look at a directory of already cloned
//! repositories and produce a manifest that would recreate it. Only
//! repositories whose `origin` remote matches one of the allow-list patterns
//! are taken, unless external dependencies are explicitly included.
//!
//! For every repository the checked-out branch is recorded; a detached HEAD
//! falls back to the tag it points at. Repositories with neither are skipped.
//! Two directories cloned from the same remote both end up in the config.

use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::error::Result;
use crate::manifest::{DependencyEntry, DependencyTable};
use crate::pattern::matches_any;
use crate::repository::GitOperations;

/// Options for [`synthesize_config`].
#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    /// Allow-list of remote URL glob patterns.
    pub include_remotes: Vec<String>,
    /// Take every dependency regardless of its remote.
    pub include_external: bool,
}

/// Select the entries of an existing table that belong in a synthesized
/// config.
pub fn filter_known(known: &DependencyTable, options: &SynthesisOptions) -> DependencyTable {
    if options.include_external {
        debug!("Including external dependencies in generated config.");
        return known.clone();
    }

    known
        .iter()
        .filter(|(name, entry)| {
            let keep = matches_any(&entry.git, &options.include_remotes);
            if keep {
                debug!("Adding \"{}\" to config.", name);
            } else {
                debug!(
                    "Did not add \"{}\" to generated config because it is an external dependency.",
                    name
                );
            }
            keep
        })
        .map(|(name, entry)| (name.clone(), entry.clone()))
        .collect()
}

/// Determine the entry for the repository at `path`, or `None` if it has to
/// be skipped.
pub fn entry_for_repository(
    git: &dyn GitOperations,
    name: &str,
    path: &Path,
    options: &SynthesisOptions,
) -> Option<DependencyEntry> {
    let Some(remote) = git.remote_url(path) else {
        warn!("Skipping {} because remote could not be determined.", name);
        return None;
    };
    debug!("  remote: {}", remote);

    if !options.include_external && !matches_any(&remote, &options.include_remotes) {
        debug!("Skipping {} because it is an external dependency.", name);
        return None;
    }

    let git_tag = if let Some(branch) = git.current_branch(path) {
        debug!("  branch: {}", branch);
        branch
    } else if let Some(tag) = git.exact_tag(path) {
        debug!("  tag: {}", tag);
        tag
    } else {
        warn!(
            "Skipping {} because no branch or tag could be determined.",
            name
        );
        return None;
    };

    Some(DependencyEntry::new(remote, Some(&git_tag)))
}

/// Build a config from `known` dependencies and the repositories found in
/// the first-level subdirectories of `working_dir`.
///
/// Subdirectories whose name is already in the config are not inspected.
pub fn synthesize_config(
    git: &dyn GitOperations,
    known: &DependencyTable,
    working_dir: &Path,
    options: &SynthesisOptions,
) -> Result<DependencyTable> {
    let mut config = filter_known(known, options);

    let mut subdirs: Vec<_> = fs::read_dir(working_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    subdirs.sort();

    for path in subdirs {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if config.contains_key(&name) {
            debug!("Skipping {} which already is in config.", name);
            continue;
        }
        if !path.is_dir() {
            debug!("Skipping {} because it is not a directory.", name);
            continue;
        }
        debug!("Checking {}: {}", path.display(), name);

        if let Some(entry) = entry_for_repository(git, &name, &path, options) {
            config.insert(name, entry);
        }
    }

    Ok(config)
}
