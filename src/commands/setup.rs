//! # Setup Actions
//!
//! `--register-cmake-module` makes `find_package(EDM)` work for CMake
//! projects; `--install-bash-completion` installs a completion script
//! generated with `clap_complete`.

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use log::info;

use edm_tools::defaults::default_cmake_module_dir;
use edm_tools::error::Error;
use edm_tools::setup;

use crate::cli::Cli;

/// One-time setup
#[derive(Args, Debug)]
#[command(next_help_heading = "Setup")]
pub struct SetupArgs {
    /// Setup the CMake registry entry for EDM
    #[arg(long)]
    pub register_cmake_module: bool,

    /// Install bash completion if possible
    #[arg(long)]
    pub install_bash_completion: bool,
}

fn home_dir() -> Result<std::path::PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        Error::NoHomeDirectory {
            what: "home".to_string(),
        }
        .into()
    })
}

pub fn register_cmake_module() -> Result<()> {
    info!("Registering EDM CMake module in CMake registry");
    setup::register_cmake_module(&home_dir()?, &default_cmake_module_dir())?;
    Ok(())
}

pub fn install_bash_completion() -> Result<()> {
    let mut script = Vec::new();
    generate(Shell::Bash, &mut Cli::command(), "edm", &mut script);
    setup::install_bash_completion(&home_dir()?, &script)?;
    Ok(())
}
