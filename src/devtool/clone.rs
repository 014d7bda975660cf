//! Cloning repositories by name.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::Result;

/// Default organization when `EVEREST_DEFAULT_ORGANIZATION` is not set.
pub const DEFAULT_ORGANIZATION: &str = "EVerest";

/// Default git host when `EVEREST_DEFAULT_FORGE` is not set.
pub const DEFAULT_FORGE: &str = "github.com";

/// Transport used for the clone URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloneMethod {
    #[default]
    Ssh,
    Https,
}

impl fmt::Display for CloneMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloneMethod::Ssh => write!(f, "ssh"),
            CloneMethod::Https => write!(f, "https"),
        }
    }
}

/// A repository to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneRequest {
    pub method: CloneMethod,
    pub forge: String,
    pub organization: String,
    pub repository: String,
    pub branch: String,
}

impl CloneRequest {
    /// `https://<forge>/<org>/<repo>.git` or `git@<forge>:<org>/<repo>.git`.
    pub fn url(&self) -> String {
        let prefix = match self.method {
            CloneMethod::Https => format!("https://{}/", self.forge),
            CloneMethod::Ssh => format!("git@{}:", self.forge),
        };
        format!("{}{}/{}.git", prefix, self.organization, self.repository)
    }

    /// The command line that is executed when cloning into `working_dir`.
    pub fn command_line(&self, working_dir: &Path) -> String {
        let args = crate::git::clone_args(
            &self.url(),
            Some(&self.branch),
            &self.target_dir(working_dir),
        );
        format!("git {}", args.join(" "))
    }

    /// Directory the repository is cloned into, below `working_dir`.
    pub fn target_dir(&self, working_dir: &Path) -> PathBuf {
        working_dir.join(&self.repository)
    }
}

/// Clone `request` into `working_dir`, or only log the command if `dry`.
pub fn clone_repository(request: &CloneRequest, working_dir: &Path, dry: bool) -> Result<()> {
    info!(
        "Cloning repository:\n  Method: {}\n  Forge: {}\n  Organization: {}\n  Repository Name: {}\n  Branch: {}",
        request.method, request.forge, request.organization, request.repository, request.branch
    );
    let command_line = request.command_line(working_dir);
    debug!("Command to execute: {}", command_line);

    if dry {
        info!("Dry run: Would execute: {}", command_line);
        return Ok(());
    }

    crate::git::clone(
        &request.url(),
        Some(&request.branch),
        &request.target_dir(working_dir),
    )
}
