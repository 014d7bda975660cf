//! VS Code workspace file generation.
//!
//! Writes `<workspace>/<workspace-name>.code-workspace` listing every checked
//! out dependency as a folder. An existing file is read and only gains the
//! folders it is missing; all other settings in it are preserved.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::checkout::CheckoutRecord;
use crate::error::{Error, Result};

/// Path of the VS Code workspace file for `workspace`.
pub fn workspace_file_path(workspace: &Path) -> PathBuf {
    let name = workspace
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workspace".to_string());
    workspace.join(format!("{}.code-workspace", name))
}

/// Add the folders of `records` to `content`, skipping ones already listed.
///
/// Returns the names of the folders that were added.
pub fn add_folders(content: &mut Map<String, Value>, records: &[CheckoutRecord]) -> Vec<String> {
    let folders = content
        .entry("folders")
        .or_insert_with(|| Value::Array(Vec::new()));
    if !folders.is_array() {
        *folders = Value::Array(Vec::new());
    }
    let Value::Array(folders) = folders else {
        return Vec::new();
    };

    let mut added = Vec::new();
    for record in records {
        let Some(folder) = record.path.file_name().map(|n| n.to_string_lossy().into_owned())
        else {
            continue;
        };
        let present = folders
            .iter()
            .any(|f| f.get("path").and_then(Value::as_str) == Some(folder.as_str()));
        if !present {
            debug!("Dependency \"{}\" added to VS Code workspace file", folder);
            folders.push(json!({ "path": folder }));
            added.push(folder);
        }
    }
    added
}

/// Create or update the VS Code workspace file for `workspace`.
pub fn create_vscode_workspace(workspace: &Path, records: &[CheckoutRecord]) -> Result<PathBuf> {
    let path = workspace_file_path(workspace);

    let mut content = if path.exists() {
        warn!("VS Code workspace file \"{}\" exists.", path.display());
        info!("Updating VS Code workspace file.");
        match serde_json::from_str::<Value>(&fs::read_to_string(&path)?)? {
            Value::Object(map) => map,
            _ => {
                return Err(Error::InvalidJson {
                    path,
                    message: "expected a JSON object".to_string(),
                })
            }
        }
    } else {
        info!("Creating VS Code workspace file at: {}", path.display());
        Map::new()
    };

    add_folders(&mut content, records);

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    Value::Object(content).serialize(&mut serializer)?;
    fs::write(&path, buffer)?;

    Ok(path)
}
