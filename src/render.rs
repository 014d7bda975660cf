//! # Build-Glue Rendering
//!
//! Turns a dependency table into files a build system can consume:
//!
//! - a CMake snippet declaring every dependency for CPM, rendered with
//!   `tera` from an embedded template. Dependencies that were checked out
//!   locally get `CPM_<name>_SOURCE` pointing at the checkout so CPM uses it
//!   instead of downloading;
//! - a Bazel `.bzl` file defining `edm_deps()`, which declares every
//!   dependency as a `git_repository`.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use log::{info, warn};
use tera::{Context, Tera};

use crate::checkout::CheckoutRecord;
use crate::error::Result;
use crate::manifest::DependencyTable;
use crate::workspace::WorkspaceMetadata;

const CPM_TEMPLATE_NAME: &str = "cpm.cmake";
const CPM_TEMPLATE: &str = include_str!("../templates/cpm.cmake.tera");

/// Wrap every element of a list in double quotes.
fn quote_filter(value: &tera::Value, _args: &HashMap<String, tera::Value>) -> tera::Result<tera::Value> {
    let quote = |v: &tera::Value| match v {
        tera::Value::String(s) => tera::Value::String(format!("\"{}\"", s)),
        other => tera::Value::String(format!("\"{}\"", other)),
    };
    match value {
        tera::Value::Array(items) => Ok(tera::Value::Array(items.iter().map(quote).collect())),
        tera::Value::Null => Ok(tera::Value::Array(Vec::new())),
        other => Ok(tera::Value::Array(vec![quote(other)])),
    }
}

/// Render the CPM declarations for `dependencies`.
pub fn render_cpm(
    dependencies: &DependencyTable,
    checkout: &[CheckoutRecord],
    workspace: &WorkspaceMetadata,
) -> Result<String> {
    let mut tera = Tera::default();
    tera.register_filter("quote", quote_filter);
    tera.add_raw_template(CPM_TEMPLATE_NAME, CPM_TEMPLATE)?;

    let mut context = Context::new();
    context.insert("dependencies", dependencies);
    context.insert("checkout", checkout);
    context.insert("workspace", workspace);

    Ok(tera.render(CPM_TEMPLATE_NAME, &context)?)
}

/// Render the CPM declarations and write them to `out`.
pub fn write_cpm(
    out: &Path,
    dependencies: &DependencyTable,
    checkout: &[CheckoutRecord],
    workspace: &WorkspaceMetadata,
) -> Result<()> {
    let rendered = render_cpm(dependencies, checkout, workspace)?;
    info!("Saving dependencies in: {}", out.display());
    fs::write(out, rendered)?;
    Ok(())
}

/// Whether `tag` is a full 40 character commit hash.
pub fn is_commit_hash(tag: &str) -> bool {
    tag.len() == 40 && tag.chars().all(|c| c.is_ascii_hexdigit())
}

/// Map build file labels of the form `@ws//path:BUILD.<name>.bazel` by their
/// file name.
fn build_files_by_name(build_files: &[String]) -> BTreeMap<String, String> {
    build_files
        .iter()
        .filter_map(|label| match label.split(':').nth(1) {
            Some(file) => Some((file.to_string(), label.clone())),
            None => {
                warn!("Ignoring build file \"{}\" without a target name.", label);
                None
            }
        })
        .collect()
}

fn starlark_string(value: Option<&str>) -> String {
    value
        .map(|v| format!("\"{}\"", v))
        .unwrap_or_else(|| "None".to_string())
}

/// Render a `.bzl` file declaring every dependency of `dependencies`.
pub fn render_bazel(dependencies: &DependencyTable, build_files: &[String]) -> String {
    let build_files = build_files_by_name(build_files);

    let mut out = String::from(
        "\nload(\"@bazel_tools//tools/build_defs/repo:utils.bzl\", \"maybe\")\n\
         load(\"@bazel_tools//tools/build_defs/repo:git.bzl\", \"git_repository\")\n\
         \n\
         def edm_deps():\n",
    );

    for (name, entry) in dependencies {
        let tag = entry.git_tag.as_deref();
        let (tag, commit) = match tag {
            Some(t) if is_commit_hash(t) => (None, Some(t)),
            other => (other, None),
        };
        let build_file = build_files
            .get(&format!("BUILD.{}.bazel", name))
            .map(String::as_str);

        out.push_str(&format!(
            "\n    maybe(\n        git_repository,\n        name = \"{}\",\n        remote = \"{}\",\n        tag = {},\n        commit = {},\n        build_file = {},\n    )\n\n",
            name,
            entry.git,
            starlark_string(tag),
            starlark_string(commit),
            starlark_string(build_file),
        ));
    }

    out
}
