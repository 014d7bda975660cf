//! One-time setup actions of `edm`.
//!
//! Both actions take the home directory as a parameter; the binaries pass
//! `dirs::home_dir()`.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::Result;

/// CMake package configuration installed by [`register_cmake_module`].
pub const EDM_CMAKE_CONFIG: &str = include_str!("../cmake/EDMConfig.cmake");

/// Path of the CMake user package registry entry for EDM.
pub fn cmake_registry_file(home: &Path) -> PathBuf {
    home.join(".cmake").join("packages").join("EDM").join("edm")
}

/// Install `EDMConfig.cmake` into `module_dir` and register that directory
/// in the CMake user package registry below `home`.
///
/// Returns the registry file.
pub fn register_cmake_module(home: &Path, module_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(module_dir)?;
    fs::write(module_dir.join("EDMConfig.cmake"), EDM_CMAKE_CONFIG)?;

    let registry_file = cmake_registry_file(home);
    if let Some(parent) = registry_file.parent() {
        fs::create_dir_all(parent)?;
    }
    debug!(
        "Storing EDM CMake path \"{}\" in CMake package registry \"{}\".",
        module_dir.display(),
        registry_file.display()
    );
    fs::write(&registry_file, module_dir.to_string_lossy().as_bytes())?;

    Ok(registry_file)
}

/// Directory bash-completion scripts are installed into.
pub fn bash_completion_dir(home: &Path) -> PathBuf {
    home.join(".local").join("share").join("bash-completion")
}

/// Install the completion `script` as `edm.sh` and make sure
/// `~/.bash_completion` loads it.
///
/// An existing `~/.bash_completion` is never modified; the user is told how
/// to source the script instead.
pub fn install_bash_completion(home: &Path, script: &[u8]) -> Result<PathBuf> {
    let dir = bash_completion_dir(home);
    fs::create_dir_all(&dir)?;
    let target = dir.join("edm.sh");
    fs::write(&target, script)?;
    debug!("Updated edm bash completion file");

    let dotfile = home.join(".bash_completion");
    if dotfile.exists() {
        warn!(
            "\"{}\" exists, could not automatically install bash-completion",
            dotfile.display()
        );
        info!("Please add the following to your .bashrc or similar:");
        info!(". {}", target.display());
    } else {
        fs::write(
            &dotfile,
            "for bash_completion_file in ~/.local/share/bash-completion/* ; do\n    \
             [ -f \"$bash_completion_file\" ] && . $bash_completion_file\n\
             done\n",
        )?;
        info!(
            "Updated \"{}\" to point to edm bash completion in \"{}\"",
            dotfile.display(),
            dir.display()
        );
    }

    Ok(target)
}
