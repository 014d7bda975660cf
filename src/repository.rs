//! # Repository Inspection
//!
//! The workspace checkout engine, the config synthesizer and the status
//! reporter never call `git` directly. They go through the `GitOperations`
//! trait, which has one method per fact or action they need.
//!
//! `DefaultGitOperations` forwards to the functions in [`crate::git`], which
//! run the system `git` binary. Tests substitute their own implementation so
//! that the decision logic can be checked without a version-control binary.

use std::path::Path;

use crate::error::Result;

/// Trait for git operations - allows mocking in tests
pub trait GitOperations {
    /// Whether `path` is the top level of a git repository.
    fn is_repo(&self, path: &Path) -> bool;

    /// Whether the working tree or index has uncommitted changes.
    fn is_dirty(&self, path: &Path) -> bool;

    /// Whether HEAD is detached.
    fn is_detached(&self, path: &Path) -> bool;

    /// The checked-out branch, if HEAD is on a branch.
    fn current_branch(&self, path: &Path) -> Option<String>;

    /// The tag HEAD points at exactly.
    fn exact_tag(&self, path: &Path) -> Option<String>;

    /// The URL of the `origin` remote.
    fn remote_url(&self, path: &Path) -> Option<String>;

    /// The upstream-tracking branch of the current branch.
    fn remote_branch(&self, path: &Path) -> Option<String>;

    /// Commits on the upstream branch missing locally.
    fn behind(&self, path: &Path) -> Option<u32>;

    /// Local commits missing on the upstream branch.
    fn ahead(&self, path: &Path) -> Option<u32>;

    /// Refresh remote-tracking information.
    fn fetch(&self, path: &Path) -> Result<()>;

    /// Pull the current branch.
    fn pull(&self, path: &Path) -> Result<()>;

    /// Clone `url` into `target_dir`, optionally at `git_ref`.
    fn clone_repo(&self, url: &str, git_ref: Option<&str>, target_dir: &Path) -> Result<()>;

    /// Switch the repository at `path` to `git_ref`.
    fn checkout(&self, path: &Path, git_ref: &str) -> Result<()>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn is_repo(&self, path: &Path) -> bool {
        crate::git::is_repo(path)
    }

    fn is_dirty(&self, path: &Path) -> bool {
        crate::git::is_dirty(path)
    }

    fn is_detached(&self, path: &Path) -> bool {
        crate::git::is_detached(path)
    }

    fn current_branch(&self, path: &Path) -> Option<String> {
        crate::git::current_branch(path)
    }

    fn exact_tag(&self, path: &Path) -> Option<String> {
        crate::git::exact_tag(path)
    }

    fn remote_url(&self, path: &Path) -> Option<String> {
        crate::git::remote_url(path)
    }

    fn remote_branch(&self, path: &Path) -> Option<String> {
        crate::git::remote_branch(path)
    }

    fn behind(&self, path: &Path) -> Option<u32> {
        crate::git::behind(path)
    }

    fn ahead(&self, path: &Path) -> Option<u32> {
        crate::git::ahead(path)
    }

    fn fetch(&self, path: &Path) -> Result<()> {
        crate::git::fetch(path)
    }

    fn pull(&self, path: &Path) -> Result<()> {
        crate::git::pull(path)
    }

    fn clone_repo(&self, url: &str, git_ref: Option<&str>, target_dir: &Path) -> Result<()> {
        crate::git::clone(url, git_ref, target_dir)
    }

    fn checkout(&self, path: &Path, git_ref: &str) -> Result<()> {
        crate::git::checkout(path, git_ref)
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! In-memory `GitOperations` used by the unit tests of the modules built
    //! on top of the trait.

    use super::*;
    use crate::error::Error;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// State of one fake repository.
    #[derive(Debug, Clone, Default)]
    pub struct MockRepo {
        pub dirty: bool,
        pub branch: Option<String>,
        pub tag: Option<String>,
        pub remote: Option<String>,
        pub remote_branch: Option<String>,
        pub ahead: Option<u32>,
        pub behind: Option<u32>,
        pub fail_fetch: bool,
        pub fail_pull: bool,
        pub fail_checkout: bool,
    }

    /// Records every mutating call and answers queries from `repos`.
    ///
    /// Cloning creates the target directory on disk so callers that check
    /// for existence observe the effect.
    #[derive(Debug, Default)]
    pub struct MockGitOperations {
        pub repos: RefCell<HashMap<PathBuf, MockRepo>>,
        pub clone_calls: RefCell<Vec<(String, Option<String>, PathBuf)>>,
        pub checkout_calls: RefCell<Vec<(PathBuf, String)>>,
        pub fetch_calls: RefCell<Vec<PathBuf>>,
        pub fail_clone: bool,
    }

    impl MockGitOperations {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_clone() -> Self {
            Self {
                fail_clone: true,
                ..Self::default()
            }
        }

        pub fn with_repo(self, path: &Path, repo: MockRepo) -> Self {
            self.repos.borrow_mut().insert(path.to_path_buf(), repo);
            self
        }

        fn repo(&self, path: &Path) -> Option<MockRepo> {
            self.repos.borrow().get(path).cloned()
        }

        fn failure(command: &str, path: &Path) -> Error {
            Error::GitCommand {
                command: command.to_string(),
                path: path.to_path_buf(),
                stderr: format!("mock {} failure", command),
            }
        }
    }

    impl GitOperations for MockGitOperations {
        fn is_repo(&self, path: &Path) -> bool {
            self.repos.borrow().contains_key(path)
        }

        fn is_dirty(&self, path: &Path) -> bool {
            self.repo(path).is_some_and(|r| r.dirty)
        }

        fn is_detached(&self, path: &Path) -> bool {
            self.repo(path).is_none_or(|r| r.branch.is_none())
        }

        fn current_branch(&self, path: &Path) -> Option<String> {
            self.repo(path).and_then(|r| r.branch)
        }

        fn exact_tag(&self, path: &Path) -> Option<String> {
            self.repo(path).and_then(|r| r.tag)
        }

        fn remote_url(&self, path: &Path) -> Option<String> {
            self.repo(path).and_then(|r| r.remote)
        }

        fn remote_branch(&self, path: &Path) -> Option<String> {
            self.repo(path).and_then(|r| r.remote_branch)
        }

        fn behind(&self, path: &Path) -> Option<u32> {
            self.repo(path).and_then(|r| r.behind)
        }

        fn ahead(&self, path: &Path) -> Option<u32> {
            self.repo(path).and_then(|r| r.ahead)
        }

        fn fetch(&self, path: &Path) -> Result<()> {
            self.fetch_calls.borrow_mut().push(path.to_path_buf());
            if self.repo(path).is_some_and(|r| r.fail_fetch) {
                return Err(Self::failure("fetch", path));
            }
            Ok(())
        }

        fn pull(&self, path: &Path) -> Result<()> {
            if self.repo(path).is_some_and(|r| r.fail_pull) {
                return Err(Self::failure("pull", path));
            }
            Ok(())
        }

        fn clone_repo(&self, url: &str, git_ref: Option<&str>, target_dir: &Path) -> Result<()> {
            self.clone_calls.borrow_mut().push((
                url.to_string(),
                git_ref.map(str::to_string),
                target_dir.to_path_buf(),
            ));
            if self.fail_clone {
                return Err(Self::failure("clone", target_dir));
            }
            std::fs::create_dir_all(target_dir)?;
            let is_tag = git_ref.is_some_and(|r| r.starts_with('v'));
            self.repos.borrow_mut().insert(
                target_dir.to_path_buf(),
                MockRepo {
                    branch: if is_tag {
                        None
                    } else {
                        Some(git_ref.unwrap_or("main").to_string())
                    },
                    tag: if is_tag { git_ref.map(str::to_string) } else { None },
                    remote: Some(url.to_string()),
                    ..MockRepo::default()
                },
            );
            Ok(())
        }

        fn checkout(&self, path: &Path, git_ref: &str) -> Result<()> {
            self.checkout_calls
                .borrow_mut()
                .push((path.to_path_buf(), git_ref.to_string()));
            if self.repo(path).is_some_and(|r| r.fail_checkout) {
                return Err(Self::failure("checkout", path));
            }
            if let Some(repo) = self.repos.borrow_mut().get_mut(path) {
                repo.branch = Some(git_ref.to_string());
            }
            Ok(())
        }
    }
}
