//! Thin wrappers around the system `git` command.
//!
//! Every function runs `git -C <path> …` through `std::process::Command`,
//! which picks up the user's SSH keys, credential helpers and `~/.gitconfig`
//! without any extra handling. Query functions turn a failing command into an
//! absent value; actions return an error carrying git's stderr.

use std::path::Path;
use std::process::{Command, Output};

use log::debug;

use crate::error::{Error, Result};

/// Run `git` with the given arguments, optionally inside `dir`.
fn run(dir: Option<&Path>, args: &[&str]) -> Result<Output> {
    let mut cmd = Command::new("git");
    if let Some(dir) = dir {
        cmd.arg("-C").arg(dir);
    }
    cmd.args(args).output().map_err(|e| Error::GitCommand {
        command: args.join(" "),
        path: dir.map(Path::to_path_buf).unwrap_or_default(),
        stderr: e.to_string(),
    })
}

/// Run a query and return its first stdout line, or `None` on failure.
fn query(path: &Path, args: &[&str]) -> Option<String> {
    let output = run(Some(path), args).ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    Some(stdout.lines().next().unwrap_or_default().trim().to_string())
}

/// Run a query that only reports success or failure through its exit code.
fn succeeds(path: &Path, args: &[&str]) -> bool {
    run(Some(path), args)
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Run an action, turning a non-zero exit into `Error::GitCommand`.
fn action(dir: Option<&Path>, args: &[&str]) -> Result<Output> {
    let output = run(dir, args)?;
    log_output(&output, 4);
    if !output.status.success() {
        return Err(Error::GitCommand {
            command: args.join(" "),
            path: dir.map(Path::to_path_buf).unwrap_or_default(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}

/// Debug-log stdout and stderr of a finished command with the given indentation.
pub fn log_output(output: &Output, indent: usize) {
    let space = " ".repeat(indent);
    for stream in [&output.stdout, &output.stderr] {
        for line in String::from_utf8_lossy(stream).lines() {
            if !line.trim().is_empty() {
                debug!("{}{}", space, line);
            }
        }
    }
}

/// Returns true if `path` is the top level of a git repository.
pub fn is_repo(path: &Path) -> bool {
    query(path, &["rev-parse", "--git-dir"]).is_some_and(|dir| dir == ".git")
}

/// Returns true if the working tree or the index has uncommitted changes.
///
/// Untracked files are ignored. A failing check counts as dirty.
pub fn is_dirty(path: &Path) -> bool {
    !(succeeds(path, &["diff", "--quiet", "--exit-code"])
        && succeeds(path, &["diff", "--cached", "--quiet", "--exit-code"]))
}

/// Returns true if HEAD does not point at a branch.
pub fn is_detached(path: &Path) -> bool {
    !succeeds(path, &["symbolic-ref", "-q", "HEAD"])
}

/// The short name of the checked-out branch.
pub fn current_branch(path: &Path) -> Option<String> {
    query(path, &["symbolic-ref", "--short", "-q", "HEAD"]).filter(|b| !b.is_empty())
}

/// The tag HEAD points at exactly, if any.
pub fn exact_tag(path: &Path) -> Option<String> {
    query(path, &["describe", "--exact-match", "--tags"]).filter(|t| !t.is_empty())
}

/// The URL of the `origin` remote.
pub fn remote_url(path: &Path) -> Option<String> {
    query(path, &["config", "--get", "remote.origin.url"]).filter(|u| !u.is_empty())
}

/// The upstream branch of the current branch, e.g. `origin/main`.
pub fn remote_branch(path: &Path) -> Option<String> {
    query(
        path,
        &["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"],
    )
    .filter(|b| !b.is_empty())
}

/// Number of upstream commits missing locally.
pub fn behind(path: &Path) -> Option<u32> {
    query(path, &["rev-list", "--count", "HEAD..@{u}"]).and_then(|n| n.parse().ok())
}

/// Number of local commits missing upstream.
pub fn ahead(path: &Path) -> Option<u32> {
    query(path, &["rev-list", "--count", "@{u}..HEAD"]).and_then(|n| n.parse().ok())
}

/// Fetch from the default remote.
pub fn fetch(path: &Path) -> Result<()> {
    action(Some(path), &["fetch"]).map(|_| ())
}

/// Pull the current branch from its upstream.
pub fn pull(path: &Path) -> Result<()> {
    action(Some(path), &["pull"]).map(|_| ())
}

/// Arguments of the `git clone` run by [`clone`].
pub fn clone_args(url: &str, git_ref: Option<&str>, target_dir: &Path) -> Vec<String> {
    let mut args = vec!["clone".to_string()];
    if let Some(git_ref) = git_ref {
        args.extend(["--branch".to_string(), git_ref.to_string()]);
    }
    args.extend([url.to_string(), target_dir.to_string_lossy().into_owned()]);
    args
}

/// Clone `url` into `target_dir`, checking out `git_ref` if given.
pub fn clone(url: &str, git_ref: Option<&str>, target_dir: &Path) -> Result<()> {
    let args = clone_args(url, git_ref, target_dir);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    action(None, &args).map(|_| ())
}

/// Check out `git_ref` in the repository at `path`.
pub fn checkout(path: &Path, git_ref: &str) -> Result<()> {
    action(Some(path), &["checkout", git_ref]).map(|_| ())
}
