//! # Error Handling
//!
//! This module defines the centralized error type for the `edm-tools`
//! library. It uses `thiserror` to derive a single `Error` enum covering every
//! failure mode the dependency manager and the development tool can hit.
//!
//! The variants follow the recovery policy of the tools:
//!
//! - **`ManifestParse`** is reported per file; callers log it and continue
//!   with the remaining manifests.
//! - **`Checkout`** is the distinguished clone failure. It aborts a whole
//!   workspace setup run and is turned into exit code 1 by the binaries.
//! - **`GitCommand`** covers other git invocations whose failure a caller
//!   decided to surface.
//! - Configuration errors (`ConfigNotFound`, `MissingWorkspace`,
//!   `MultipleWorkspaceFiles`) abort the current mode.
//! - Service errors belong to the `everest` development tool.
//!
//! The `Result` alias is used by every library function.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for edm-tools operations
#[derive(Error, Debug)]
pub enum Error {
    /// A manifest, config or workspace file could not be parsed.
    #[error("Error parsing yaml of \"{}\": {message}", path.display())]
    ManifestParse { path: PathBuf, message: String },

    /// A JSON document has valid syntax but not the expected shape.
    #[error("Unexpected content in \"{}\": {message}", path.display())]
    InvalidJson { path: PathBuf, message: String },

    /// Cloning a dependency into the workspace failed.
    ///
    /// This is fatal for the whole workspace setup.
    #[error("Error while cloning git repository during local dependency checkout of \"{name}\" ({url}{}): {message}", r#ref.as_ref().map(|r| format!("@{}", r)).unwrap_or_default())]
    Checkout {
        name: String,
        url: String,
        r#ref: Option<String>,
        message: String,
    },

    /// A git command exited unsuccessfully.
    #[error("Git command failed in \"{}\": git {command} - {stderr}", path.display())]
    GitCommand {
        command: String,
        path: PathBuf,
        stderr: String,
    },

    /// A config file given on the command line does not exist.
    #[error("Config file \"{}\" does not exist", path.display())]
    ConfigNotFound { path: PathBuf },

    /// An operation needs a workspace directory but none could be determined.
    #[error("{message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    MissingWorkspace {
        message: String,
        hint: Option<String>,
    },

    /// More than one workspace metadata file exists in a repository.
    #[error("There are multiple workspace files ({}), only one file is allowed per repository", files.iter().map(|f| f.display().to_string()).collect::<Vec<_>>().join(", "))]
    MultipleWorkspaceFiles { files: Vec<PathBuf> },

    /// Rendering the build-system glue failed.
    #[error("Template processing error: {message}")]
    Template { message: String },

    /// A container service operation failed.
    #[error("Service operation error: {message}")]
    Service { message: String },

    /// The requested service is not part of the service table.
    #[error("Service {name} not found, try 'everest services list' to get a list of available services")]
    ServiceNotFound { name: String },

    /// The services subcommands only work inside the development container.
    #[error("Not running inside a Docker container, services are only available in the development container")]
    NotInContainer,

    /// The home directory could not be determined for a setup action.
    #[error("Could not determine the {what} directory")]
    NoHomeDirectory { what: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

impl From<tera::Error> for Error {
    fn from(err: tera::Error) -> Self {
        // tera nests the useful part of the message in its source chain
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        Error::Template { message }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
