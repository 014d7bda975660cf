//! # Git Status Reporting
//!
//! Read-only inspection of the repositories in the first-level
//! subdirectories of a directory, plus the companion "pull everything"
//! action. Every value is queried fresh from git; a failing query leaves the
//! field empty instead of aborting the scan.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info};

use crate::error::Result;
use crate::output::OutputConfig;
use crate::repository::GitOperations;

/// State of one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoStatus {
    pub dirty: bool,
    pub detached: bool,
    pub tag: Option<String>,
    pub branch: Option<String>,
    pub remote_branch: Option<String>,
    pub ahead: Option<u32>,
    pub behind: Option<u32>,
    /// Outcome of the optional fetch; `None` when no fetch was requested.
    pub fetch_worked: Option<bool>,
}

/// One first-level subdirectory and its state, if it is a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryStatus {
    pub path: PathBuf,
    pub repo: Option<RepoStatus>,
}

impl DirectoryStatus {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Outcome of pulling one subdirectory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullOutcome {
    pub path: PathBuf,
    /// `None` if the directory is not a repository.
    pub pulled: Option<bool>,
}

/// Sorted first-level subdirectories of `dir`.
fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut subdirs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    subdirs.sort();
    Ok(subdirs)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Query the state of a single repository.
pub fn repo_status(git: &dyn GitOperations, path: &Path, fetch: bool) -> RepoStatus {
    let fetch_worked = fetch.then(|| {
        debug!(
            "\"{}\": fetching information from remote. This might take a few seconds.",
            dir_name(path)
        );
        match git.fetch(path) {
            Ok(()) => true,
            Err(e) => {
                error!("\"{}\" Error during git-fetch: {}", dir_name(path), e);
                false
            }
        }
    });

    RepoStatus {
        remote_branch: git.remote_branch(path),
        behind: git.behind(path),
        ahead: git.ahead(path),
        tag: git.exact_tag(path),
        branch: git.current_branch(path),
        dirty: git.is_dirty(path),
        detached: git.is_detached(path),
        fetch_worked,
    }
}

/// Inspect every first-level subdirectory of `dir`.
pub fn collect_status(
    git: &dyn GitOperations,
    dir: &Path,
    fetch: bool,
) -> Result<Vec<DirectoryStatus>> {
    Ok(subdirectories(dir)?
        .into_iter()
        .map(|path| {
            let repo = git.is_repo(&path).then(|| repo_status(git, &path, fetch));
            DirectoryStatus { path, repo }
        })
        .collect())
}

/// Format the report line for one repository.
pub fn format_status_line(name: &str, status: &RepoStatus, output: &OutputConfig) -> String {
    let mut tag_or_branch = String::new();
    if let Some(tag) = &status.tag {
        tag_or_branch.push_str(&format!(" @ tag: {}", tag));
    }
    if let Some(branch) = &status.branch {
        tag_or_branch.push_str(&format!(" @ branch: {}", branch));
    }

    let mut remote_info = String::new();
    if status.detached {
        remote_info = format!(" [{}]", output.yellow("detached HEAD"));
    } else if let Some(remote_branch) = &status.remote_branch {
        remote_info = format!(" [remote: {}]", output.red(remote_branch));

        let mut behind_ahead = Vec::new();
        if let Some(behind) = status.behind.filter(|n| *n > 0) {
            behind_ahead.push(format!("behind {}", output.red(&behind.to_string())));
        }
        if let Some(ahead) = status.ahead.filter(|n| *n > 0) {
            behind_ahead.push(format!("ahead {}", output.green(&ahead.to_string())));
        }
        if !behind_ahead.is_empty() {
            remote_info.push_str(&format!(" [{}]", behind_ahead.join(" ")));
        }
    }

    let dirty = if status.dirty {
        format!("[{}]", output.red("dirty"))
    } else {
        format!("[{}]", output.green("clean"))
    };

    format!(
        "\"{}\"{}{} {}",
        output.green(name),
        tag_or_branch,
        remote_info,
        dirty
    )
}

/// Log the status report and return `(dirty, repositories)` counts.
pub fn report_status(statuses: &[DirectoryStatus], output: &OutputConfig) -> (usize, usize) {
    let mut dirty_count = 0;
    let mut repo_count = 0;

    for entry in statuses {
        match &entry.repo {
            Some(status) => {
                repo_count += 1;
                if status.dirty {
                    dirty_count += 1;
                }
                info!("{}", format_status_line(&entry.name(), status, output));
            }
            None => debug!("\"{}\" is not a git repository.", entry.name()),
        }
    }

    if dirty_count > 0 {
        info!("{}/{} repositories are dirty.", dirty_count, repo_count);
    }
    (dirty_count, repo_count)
}

/// Pull every repository below `dir`, or only those named in `repos`.
pub fn pull_all(
    git: &dyn GitOperations,
    dir: &Path,
    repos: &[String],
) -> Result<Vec<PullOutcome>> {
    let mut outcomes = Vec::new();

    for path in subdirectories(dir)? {
        let name = dir_name(&path);
        if !repos.is_empty() && !repos.contains(&name) {
            debug!(
                "Skipping {} because it is not in the list of provided repos.",
                name
            );
            continue;
        }

        let pulled = if git.is_repo(&path) {
            info!(
                "\"{}\": pulling from remote. This might take a few seconds.",
                name
            );
            Some(match git.pull(&path) {
                Ok(()) => true,
                Err(e) => {
                    error!("\"{}\" Error during git-pull: {}", name, e);
                    false
                }
            })
        } else {
            None
        };
        outcomes.push(PullOutcome { path, pulled });
    }

    Ok(outcomes)
}

/// Log the pull report and return `(failed, repositories)` counts.
pub fn report_pull(outcomes: &[PullOutcome], output: &OutputConfig) -> (usize, usize) {
    let mut error_count = 0;
    let mut repo_count = 0;

    for outcome in outcomes {
        let name = dir_name(&outcome.path);
        match outcome.pulled {
            Some(pulled) => {
                repo_count += 1;
                let state = if pulled {
                    format!("[{}]", output.green("pulled"))
                } else {
                    error_count += 1;
                    format!("[{}]", output.red("error during git-pull"))
                };
                info!("\"{}\"{}", output.green(&name), state);
            }
            None => debug!("\"{}\" is not a git repository.", name),
        }
    }

    if error_count > 0 {
        info!(
            "{}/{} repositories could not be pulled.",
            error_count, repo_count
        );
    }
    (error_count, repo_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::{MockGitOperations, MockRepo};
    use tempfile::TempDir;

    fn plain() -> OutputConfig {
        OutputConfig::without_color()
    }

    #[test]
    fn test_status_line_on_tracking_branch() {
        let status = RepoStatus {
            branch: Some("main".to_string()),
            remote_branch: Some("origin/main".to_string()),
            behind: Some(2),
            ahead: Some(1),
            ..RepoStatus::default()
        };
        assert_eq!(
            format_status_line("foo", &status, &plain()),
            "\"foo\" @ branch: main [remote: origin/main] [behind 2 ahead 1] [clean]"
        );
    }

    #[test]
    fn test_status_line_up_to_date_has_no_counts() {
        let status = RepoStatus {
            branch: Some("main".to_string()),
            remote_branch: Some("origin/main".to_string()),
            behind: Some(0),
            ahead: Some(0),
            dirty: true,
            ..RepoStatus::default()
        };
        assert_eq!(
            format_status_line("foo", &status, &plain()),
            "\"foo\" @ branch: main [remote: origin/main] [dirty]"
        );
    }

    #[test]
    fn test_status_line_detached_at_tag() {
        let status = RepoStatus {
            tag: Some("v1.0".to_string()),
            detached: true,
            ..RepoStatus::default()
        };
        assert_eq!(
            format_status_line("foo", &status, &plain()),
            "\"foo\" @ tag: v1.0 [detached HEAD] [clean]"
        );
    }

    #[test]
    fn test_collect_status_marks_non_repositories() {
        let temp_dir = TempDir::new().unwrap();
        let repo_dir = temp_dir.path().join("repo");
        fs::create_dir(&repo_dir).unwrap();
        fs::create_dir(temp_dir.path().join("plain")).unwrap();
        fs::write(temp_dir.path().join("file.txt"), "x").unwrap();
        let git = MockGitOperations::new().with_repo(
            &repo_dir,
            MockRepo {
                branch: Some("main".to_string()),
                dirty: true,
                ..MockRepo::default()
            },
        );

        let statuses = collect_status(&git, temp_dir.path(), false).unwrap();

        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].name(), "plain");
        assert_eq!(statuses[0].repo, None);
        let repo = statuses[1].repo.as_ref().unwrap();
        assert!(repo.dirty);
        assert_eq!(repo.fetch_worked, None);
        assert!(git.fetch_calls.borrow().is_empty());

        assert_eq!(report_status(&statuses, &plain()), (1, 1));
    }

    #[test]
    fn test_fetch_failure_does_not_abort_scan() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a");
        let b = temp_dir.path().join("b");
        fs::create_dir(&a).unwrap();
        fs::create_dir(&b).unwrap();
        let git = MockGitOperations::new()
            .with_repo(
                &a,
                MockRepo {
                    fail_fetch: true,
                    ..MockRepo::default()
                },
            )
            .with_repo(&b, MockRepo::default());

        let statuses = collect_status(&git, temp_dir.path(), true).unwrap();

        assert_eq!(statuses[0].repo.as_ref().unwrap().fetch_worked, Some(false));
        assert_eq!(statuses[1].repo.as_ref().unwrap().fetch_worked, Some(true));
        assert_eq!(git.fetch_calls.borrow().len(), 2);
    }

    #[test]
    fn test_pull_all_respects_selection_and_counts_failures() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a");
        let b = temp_dir.path().join("b");
        let c = temp_dir.path().join("c");
        for dir in [&a, &b, &c] {
            fs::create_dir(dir).unwrap();
        }
        let git = MockGitOperations::new()
            .with_repo(&a, MockRepo::default())
            .with_repo(
                &b,
                MockRepo {
                    fail_pull: true,
                    ..MockRepo::default()
                },
            );

        let all = pull_all(&git, temp_dir.path(), &[]).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].pulled, None);
        assert_eq!(report_pull(&all, &plain()), (1, 2));

        let selected = pull_all(&git, temp_dir.path(), &["a".to_string()]).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].pulled, Some(true));
    }
}
