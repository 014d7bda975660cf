//! Shared test utilities for the E2E tests.
//!
//! The tests never touch the network: "remotes" are local repositories
//! created with the system `git` and cloned through their path.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new();
//!     let remote = fixture.remote("foo");
//!     fixture.edm().arg("--git-info").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{git, git_output, TestFixture};
}

/// Run git in `dir` with a fixed identity and fail the test on error.
pub fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args([
            "-c",
            "user.name=EDM Test",
            "-c",
            "user.email=edm@example.com",
            "-c",
            "commit.gpgsign=false",
            "-c",
            "tag.gpgsign=false",
        ])
        .args(args)
        .status()
        .expect("Failed to run git");
    assert!(status.success(), "git {:?} failed in {}", args, dir.display());
}

/// Run git in `dir` and return its trimmed stdout.
#[allow(dead_code)]
pub fn git_output(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .expect("Failed to run git");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A temporary directory holding remotes, workspaces and configs.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Add a file with the given path and content.
    #[allow(dead_code)]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Create a repository at `remotes/<name>` with a commit tagged `v1.0`
    /// followed by a second commit on `main`.
    #[allow(dead_code)]
    pub fn remote(&self, name: &str) -> PathBuf {
        let dir = self.path().join("remotes").join(name);
        std::fs::create_dir_all(&dir).expect("Failed to create remote directory");
        git(&dir, &["init", "-q", "-b", "main"]);
        std::fs::write(dir.join("README.md"), format!("# {}\n", name)).unwrap();
        git(&dir, &["add", "README.md"]);
        git(&dir, &["commit", "-q", "-m", "Initial commit"]);
        git(&dir, &["tag", "v1.0"]);
        std::fs::write(dir.join("CHANGELOG.md"), "unreleased\n").unwrap();
        git(&dir, &["add", "CHANGELOG.md"]);
        git(&dir, &["commit", "-q", "-m", "Work after v1.0"]);
        dir
    }

    /// Clone `remote` to `<dir>/<name>` in the fixture.
    #[allow(dead_code)]
    pub fn clone_into(&self, remote: &Path, dir: &str, name: &str) -> PathBuf {
        let parent = self.path().join(dir);
        std::fs::create_dir_all(&parent).unwrap();
        let target = parent.join(name);
        git(
            &parent,
            &["clone", "-q", &remote.to_string_lossy(), &target.to_string_lossy()],
        );
        target
    }

    /// An `edm` command running in the fixture directory.
    #[allow(dead_code)]
    pub fn edm(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("edm");
        cmd.current_dir(self.path())
            .env("CPM_SOURCE_CACHE", self.path().join("cpm-cache"))
            .env_remove("RUST_LOG")
            .arg("--nocolor");
        cmd
    }

    /// An `everest` command running in the fixture directory.
    #[allow(dead_code)]
    pub fn everest(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("everest");
        cmd.current_dir(self.path())
            .env_remove("RUST_LOG")
            .env_remove("EVEREST_DEFAULT_ORGANIZATION")
            .env_remove("EVEREST_DEFAULT_FORGE")
            .args(["--color", "never"]);
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_remote_has_tag() {
        let fixture = TestFixture::new();
        let remote = fixture.remote("foo");
        assert_eq!(git_output(&remote, &["tag"]), "v1.0");
    }
}
