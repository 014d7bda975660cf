//! # Dependency Manifests
//!
//! A manifest is a YAML mapping from dependency name to its git source:
//!
//! ```yaml
//! libfoo:
//!   git: https://github.com/example/libfoo.git
//!   git_tag: v1.0
//! libbar:
//!   git: git@github.com:example/libbar.git
//! ```
//!
//! This module parses manifests into a [`DependencyTable`], discovers every
//! manifest below a source tree and merges them. Merging is shallow and
//! last-write-wins: a later file's entry replaces an earlier one of the same
//! name entirely. Parse failures are reported per file and never stop a scan.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info};
use serde::{Deserialize, Deserializer, Serialize};
use walkdir::WalkDir;

use crate::defaults::{DEPS_CACHE_DIR, MANIFEST_FILE_NAMES};
use crate::error::{Error, Result};

/// One named dependency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyEntry {
    /// Clone URL of the dependency.
    pub git: String,

    /// Branch, tag or commit to check out. Absent means the default branch.
    #[serde(
        default,
        deserialize_with = "optional_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub git_tag: Option<String>,

    /// Any further keys (e.g. `options`, `cmake_condition`), passed through to
    /// the build-glue templates untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl DependencyEntry {
    /// Create an entry with only a URL and an optional ref.
    pub fn new(git: impl Into<String>, git_tag: Option<&str>) -> Self {
        Self {
            git: git.into(),
            git_tag: git_tag.map(str::to_string),
            extra: BTreeMap::new(),
        }
    }
}

/// Mapping from dependency name to its entry.
pub type DependencyTable = BTreeMap<String, DependencyEntry>;

/// Accept any YAML scalar for a ref, so that `git_tag: 2023.1` is not a parse
/// error.
fn optional_scalar_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::Null => Ok(None),
        serde_yaml::Value::String(s) => Ok(Some(s)),
        serde_yaml::Value::Number(n) => Ok(Some(n.to_string())),
        serde_yaml::Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(D::Error::custom(format!(
            "git_tag must be a string, found {:?}",
            other
        ))),
    }
}

/// Parse manifest content. `path` is only used for error reporting.
///
/// An empty document yields an empty table.
pub fn parse(content: &str, path: &Path) -> Result<DependencyTable> {
    let to_error = |e: serde_yaml::Error| Error::ManifestParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(to_error)?;
    if value.is_null() {
        return Ok(DependencyTable::new());
    }
    serde_yaml::from_value(value).map_err(to_error)
}

/// Read and parse the manifest at `path`.
pub fn load(path: &Path) -> Result<DependencyTable> {
    let content = fs::read_to_string(path)?;
    parse(&content, path)
}

/// Write `table` to `path` as YAML.
pub fn save(path: &Path, table: &DependencyTable) -> Result<()> {
    let content = serde_yaml::to_string(table)?;
    fs::write(path, content)?;
    Ok(())
}

/// Merge `other` into `table`; entries of `other` win on name collision.
pub fn merge(table: &mut DependencyTable, other: DependencyTable) {
    table.extend(other);
}

/// Returns true if `path`, relative to `root`, lies below a `_deps` directory.
fn in_deps_cache(root: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .parent()
        .is_some_and(|parent| parent.components().any(|c| c.as_os_str() == DEPS_CACHE_DIR))
}

/// Find every manifest file below `root` in traversal order.
///
/// Directories are visited in file-name order so the result is stable. Files
/// below a `_deps` directory are left out unless `include_deps` is set.
pub fn discover(root: &Path, include_deps: bool) -> Vec<PathBuf> {
    let mut manifests = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git");

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let is_manifest = entry
            .file_name()
            .to_str()
            .is_some_and(|name| MANIFEST_FILE_NAMES.contains(&name));
        if !is_manifest {
            continue;
        }
        if !include_deps && in_deps_cache(root, entry.path()) {
            info!(
                "Ignoring dependencies in \"{}\" because this file is located in a \"{}\" subdirectory.",
                entry.path().display(),
                DEPS_CACHE_DIR
            );
            continue;
        }
        manifests.push(entry.into_path());
    }

    manifests
}

/// Discover and merge all manifests below `root`.
///
/// A manifest that cannot be read or parsed is logged and skipped.
pub fn scan(root: &Path, include_deps: bool) -> DependencyTable {
    let mut table = DependencyTable::new();

    for path in discover(root, include_deps) {
        info!("Parsing dependencies file: {}", path.display());
        match load(&path) {
            Ok(dependencies) => merge(&mut table, dependencies),
            Err(e) => error!("{}", e),
        }
    }

    table
}
