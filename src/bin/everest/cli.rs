//! CLI argument parsing and command dispatch for `everest`

use std::path::Path;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::debug;

use edm_tools::defaults::{DEFAULT_FORGE_ENV, DEFAULT_ORGANIZATION_ENV};
use edm_tools::devtool::clone::{
    clone_repository, CloneMethod, CloneRequest, DEFAULT_FORGE, DEFAULT_ORGANIZATION,
};
use edm_tools::devtool::services::{
    list_services, require_environment, services_info, start_service, stop_service, DockerCli,
};
use edm_tools::output::{init_logging, OutputConfig};

/// EVerest's Development Tool
#[derive(Parser, Debug)]
#[command(name = "everest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Service related commands
    #[command(subcommand)]
    Services(ServicesCommand),

    /// Clone a repository
    Clone(CloneArgs),
}

#[derive(Subcommand, Debug)]
enum ServicesCommand {
    /// Start a service
    Start {
        /// Name of Service to start
        service_name: String,
    },
    /// Stop a service
    Stop {
        /// Name of Service to stop
        service_name: String,
    },
    /// List all available services
    List,
    /// Show information about the current environment
    Info,
}

#[derive(Args, Debug)]
struct CloneArgs {
    /// Name of the repository to clone
    repository_name: String,

    /// Git repository organization name
    #[arg(long, visible_alias = "org", env = DEFAULT_ORGANIZATION_ENV, default_value = DEFAULT_ORGANIZATION)]
    organization: String,

    /// Branch to checkout
    #[arg(short, long, default_value = "main")]
    branch: String,

    /// Use HTTPS to clone the repository, default is SSH
    #[arg(long)]
    https: bool,

    /// Git host to clone from
    #[arg(long, env = DEFAULT_FORGE_ENV, default_value = DEFAULT_FORGE)]
    forge: String,

    /// Only print the command that would be executed
    #[arg(long)]
    dry: bool,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let output = OutputConfig::from_env_and_flag(&self.color);
        init_logging("everest", self.verbose, &output);

        match self.command {
            Commands::Clone(args) => {
                let request = CloneRequest {
                    method: if args.https {
                        CloneMethod::Https
                    } else {
                        CloneMethod::Ssh
                    },
                    forge: args.forge,
                    organization: args.organization,
                    repository: args.repository_name,
                    branch: args.branch,
                };
                clone_repository(&request, Path::new("."), args.dry)?;
            }
            Commands::Services(command) => {
                let runtime = DockerCli;
                match command {
                    ServicesCommand::Start { service_name } => {
                        let env = require_environment(&runtime)?;
                        start_service(&runtime, &env, &service_name)?;
                    }
                    ServicesCommand::Stop { service_name } => {
                        let env = require_environment(&runtime)?;
                        stop_service(&runtime, &env, &service_name)?;
                    }
                    ServicesCommand::List => {
                        let env = require_environment(&runtime)
                            .inspect_err(|e| debug!("Listing services without environment: {}", e))
                            .ok();
                        list_services(env.as_ref());
                    }
                    ServicesCommand::Info => {
                        let env = require_environment(&runtime)?;
                        services_info(&runtime, &env)?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_clone_defaults() {
        let cli = Cli::parse_from(["everest", "clone", "everest-core"]);
        match cli.command {
            Commands::Clone(args) => {
                assert_eq!(args.branch, "main");
                assert!(!args.https);
                assert!(!args.dry);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_org_alias() {
        let cli = Cli::parse_from(["everest", "clone", "--org", "me", "-b", "dev", "repo"]);
        match cli.command {
            Commands::Clone(args) => {
                assert_eq!(args.organization, "me");
                assert_eq!(args.branch, "dev");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_verbose_after_subcommand() {
        let cli = Cli::parse_from(["everest", "services", "list", "-v"]);
        assert!(cli.verbose);
    }
}
