//! Default values for edm-tools.
//!
//! This module provides centralized file names, environment variable names and
//! other defaults used across commands, ensuring consistency and avoiding
//! duplication.

use std::path::PathBuf;

/// File names recognized as dependency manifests.
pub const MANIFEST_FILE_NAMES: [&str; 2] = ["dependencies.yaml", "dependencies.yml"];

/// Directory name of the in-tree CPM source cache.
///
/// Manifests below a directory with this name are ignored unless explicitly
/// included.
pub const DEPS_CACHE_DIR: &str = "_deps";

/// File names recognized as workspace metadata at a repository root.
pub const WORKSPACE_FILE_NAMES: [&str; 2] = ["workspace.yaml", "workspace.yml"];

/// Name of the metadata file written into every checked-out dependency.
pub const WORKSPACE_METADATA_FILE: &str = "workspace.yaml";

/// Name under which the workspace config is copied into the workspace.
pub const WORKSPACE_CONFIG_FILE: &str = "workspace-config.yaml";

/// Remote patterns included in a synthesized config by default.
pub const DEFAULT_INCLUDE_REMOTES: &str = "git@github.com:EVerest/*";

/// Default output file for the generated CPM dependency declarations.
pub const DEFAULT_CMAKE_OUT: &str = "dependencies.cmake";

/// Environment variable pointing at the CPM source cache.
pub const CPM_SOURCE_CACHE_ENV: &str = "CPM_SOURCE_CACHE";

/// Environment variable overriding the organization used by `everest clone`.
pub const DEFAULT_ORGANIZATION_ENV: &str = "EVEREST_DEFAULT_ORGANIZATION";

/// Environment variable overriding the git host used by `everest clone`.
pub const DEFAULT_FORGE_ENV: &str = "EVEREST_DEFAULT_FORGE";

/// Returns the directory that holds the CMake files installed by
/// `edm --register-cmake-module`.
///
/// Uses the platform data directory (`~/.local/share/edm/cmake` on Linux) and
/// falls back to `.edm/cmake` in the current directory.
pub fn default_cmake_module_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from(".edm"))
        .join("edm")
        .join("cmake")
}
