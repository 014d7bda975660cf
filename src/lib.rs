//! # EDM Tools Library
//!
//! This library implements a dependency manager for projects that are split
//! over many git repositories, and a small helper for the development
//! container those projects are built in. It backs the `edm` and `everest`
//! command-line tools but can be used on its own.
//!
//! ## Quick Example
//!
//! ```
//! use edm_tools::manifest::{merge, parse};
//! use std::path::Path;
//!
//! let mut table = parse(
//!     "libfoo:\n  git: https://example.com/foo.git\n  git_tag: v1.0\n",
//!     Path::new("a/dependencies.yaml"),
//! )
//! .unwrap();
//! let later = parse(
//!     "libfoo:\n  git: https://example.com/foo.git\n  git_tag: v2.0\n",
//!     Path::new("b/dependencies.yaml"),
//! )
//! .unwrap();
//!
//! merge(&mut table, later);
//! assert_eq!(table["libfoo"].git_tag.as_deref(), Some("v2.0"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifests (`manifest`)**: `dependencies.yaml` files map a dependency
//!   name to a git remote and an optional ref. Scanning a tree merges all of
//!   them into one table; later files win.
//! - **Workspaces (`checkout`, `workspace`, `vscode`)**: a workspace is a
//!   directory with one checkout per dependency plus a `workspace.yaml` in
//!   each of them describing its siblings.
//! - **Build glue (`render`)**: the table and the local checkouts are
//!   rendered into CPM declarations for CMake or into a Bazel macro.
//! - **Repository state (`repository`, `git`, `status`, `synthesize`)**: git
//!   is always accessed through the `GitOperations` trait, both to report the
//!   state of a workspace and to derive a config from an existing one.
//! - **Development container (`devtool`)**: cloning by repository name and
//!   `docker compose` service control.
//!
//! ## Execution Flow of a Workspace Run
//!
//! 1.  **Load**: read the workspace config (a manifest).
//! 2.  **Checkout**: clone or update every dependency in the workspace.
//! 3.  **Metadata**: write `workspace.yaml` into every checkout.
//! 4.  **Extras**: copy the config into the workspace and optionally write a
//!     VS Code workspace file.

pub mod checkout;
pub mod defaults;
pub mod devtool;
pub mod error;
pub mod git;
pub mod manifest;
pub mod output;
pub mod pattern;
pub mod render;
pub mod repository;
pub mod setup;
pub mod status;
pub mod synthesize;
pub mod vscode;
pub mod workspace;

#[cfg(test)]
mod manifest_proptest;
