//! # EVerest Development Tool
//!
//! Binary entry point for `everest`, a helper used inside the development
//! container: it clones repositories by name and starts or stops the
//! auxiliary services of the container's compose project.

mod cli;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
