//! # Container Services
//!
//! The development container is started through `docker compose` together
//! with a few auxiliary services (an MQTT broker, an OCPP backend, a web
//! MQTT client). From inside the container these services are controlled
//! through the compose project the container itself belongs to.
//!
//! Detection works in three steps:
//!
//! 1. `/.dockerenv` marks a process running inside a container.
//! 2. The container id is the hostname; `docker inspect` yields the
//!    container name, image and the `com.docker.compose.project` label.
//! 3. The compose file is expected at `/workspace/.devcontainer/docker-compose.yml`.
//!
//! All docker access goes through the [`ContainerRuntime`] trait so the
//! service table and command construction can be tested without docker.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Marker file present in every docker container.
pub const DOCKER_ENV_MARKER: &str = "/.dockerenv";

/// Compose file of the development container.
pub const COMPOSE_FILE: &str = "/workspace/.devcontainer/docker-compose.yml";

/// Label docker compose puts on every container of a project.
pub const COMPOSE_PROJECT_LABEL: &str = "com.docker.compose.project";

/// Access to the container runtime.
pub trait ContainerRuntime {
    /// Id of the container this process runs in.
    fn container_id(&self) -> Result<String>;

    /// `docker inspect` output for one container.
    fn inspect(&self, container_id: &str) -> Result<String>;

    /// Run `docker <args>` with inherited output.
    fn docker(&self, args: &[String]) -> Result<()>;
}

/// [`ContainerRuntime`] backed by the `docker` and `hostname` binaries.
#[derive(Debug, Default, Clone, Copy)]
pub struct DockerCli;

fn service_error(command: &str, detail: impl fmt::Display) -> Error {
    Error::Service {
        message: format!("{} failed: {}", command, detail),
    }
}

impl ContainerRuntime for DockerCli {
    fn container_id(&self) -> Result<String> {
        let output = Command::new("hostname")
            .output()
            .map_err(|e| service_error("hostname", e))?;
        if !output.status.success() {
            return Err(service_error("hostname", output.status));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn inspect(&self, container_id: &str) -> Result<String> {
        let output = Command::new("docker")
            .args(["inspect", container_id])
            .output()
            .map_err(|e| service_error("docker inspect", e))?;
        if !output.status.success() {
            return Err(service_error(
                "docker inspect",
                String::from_utf8_lossy(&output.stderr).trim(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn docker(&self, args: &[String]) -> Result<()> {
        let status = Command::new("docker")
            .args(args)
            .status()
            .map_err(|e| service_error("docker", e))?;
        if !status.success() {
            return Err(service_error(&format!("docker {}", args.join(" ")), status));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectedContainer {
    name: String,
    image: String,
    config: InspectedConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectedConfig {
    image: String,
    #[serde(default)]
    labels: Option<HashMap<String, String>>,
}

/// The compose identity of the container this process runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerEnvironmentInfo {
    pub container_id: String,
    pub container_name: String,
    pub container_image: String,
    pub container_image_id: String,
    pub compose_files: Vec<PathBuf>,
    pub compose_project_name: String,
}

/// Detect the docker environment.
///
/// Returns `Ok(None)` outside a container. Inside a container a missing
/// compose file or project label is an error.
pub fn detect_environment(
    runtime: &dyn ContainerRuntime,
    marker: &Path,
    compose_file: &Path,
) -> Result<Option<DockerEnvironmentInfo>> {
    if !marker.exists() {
        debug!("Not running in Docker Container");
        return Ok(None);
    }
    debug!("Running in Docker Container");

    let container_id = runtime.container_id()?;
    let inspected: Vec<InspectedContainer> = serde_json::from_str(&runtime.inspect(&container_id)?)?;
    let container = inspected.into_iter().next().ok_or_else(|| Error::Service {
        message: format!("docker inspect returned nothing for container {}", container_id),
    })?;

    if !compose_file.exists() {
        return Err(Error::Service {
            message: format!(
                "{} not found in {}",
                compose_file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                compose_file
                    .parent()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            ),
        });
    }

    let compose_project_name = container
        .config
        .labels
        .as_ref()
        .and_then(|labels| labels.get(COMPOSE_PROJECT_LABEL))
        .cloned()
        .ok_or_else(|| Error::Service {
            message: "Container is not part of a docker-compose project".to_string(),
        })?;

    Ok(Some(DockerEnvironmentInfo {
        container_id,
        container_name: container.name.trim_start_matches('/').to_string(),
        container_image: container.config.image,
        container_image_id: container.image,
        compose_files: vec![compose_file.to_path_buf()],
        compose_project_name,
    }))
}

/// Detect the environment at the standard locations and require a container.
pub fn require_environment(runtime: &dyn ContainerRuntime) -> Result<DockerEnvironmentInfo> {
    detect_environment(runtime, Path::new(DOCKER_ENV_MARKER), Path::new(COMPOSE_FILE))?
        .ok_or(Error::NotInContainer)
}

/// A `docker compose` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeAction {
    Up,
    Down,
    Ps,
}

/// A `docker compose` invocation against the project of the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeCommand {
    pub compose_files: Vec<PathBuf>,
    pub project_name: String,
    pub action: ComposeAction,
    pub services: Vec<String>,
}

impl ComposeCommand {
    pub fn new(env: &DockerEnvironmentInfo, action: ComposeAction, services: &[&str]) -> Self {
        Self {
            compose_files: env.compose_files.clone(),
            project_name: env.compose_project_name.clone(),
            action,
            services: services.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Arguments to pass to `docker`.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["compose".to_string()];
        for file in &self.compose_files {
            args.push("-f".to_string());
            args.push(file.display().to_string());
        }
        args.push("-p".to_string());
        args.push(self.project_name.clone());
        match self.action {
            ComposeAction::Up => {
                args.push("up".to_string());
                args.push("-d".to_string());
                args.extend(self.services.iter().cloned());
            }
            ComposeAction::Down => {
                args.push("down".to_string());
                args.extend(self.services.iter().cloned());
            }
            ComposeAction::Ps => args.push("ps".to_string()),
        }
        args
    }

    pub fn execute(&self, runtime: &dyn ContainerRuntime) -> Result<()> {
        debug!("Executing command: {}", self);
        runtime.docker(&self.args())
    }
}

impl fmt::Display for ComposeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "docker {}", self.args().join(" "))
    }
}

/// Entry of the fixed service table.
struct ServiceSpec {
    name: &'static str,
    description: &'static str,
    start: &'static [&'static str],
    stop: &'static [&'static str],
}

const SERVICES: &[ServiceSpec] = &[
    ServiceSpec {
        name: "mqtt-server",
        description: "MQTT Server",
        start: &["mqtt-server"],
        stop: &["mqtt-server"],
    },
    ServiceSpec {
        name: "steve",
        description: "OCPP server for development of OCPP 1.6",
        start: &["steve"],
        stop: &["steve", "ocpp-db"],
    },
    ServiceSpec {
        name: "mqtt-explorer",
        description: "Web based MQTT Client to inspect mqtt traffic",
        start: &["mqtt-explorer"],
        stop: &["mqtt-explorer"],
    },
];

/// A service with its start and stop commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub name: &'static str,
    pub description: &'static str,
    pub start_command: ComposeCommand,
    pub stop_command: ComposeCommand,
}

/// Names and descriptions of every known service.
pub fn service_table() -> Vec<(&'static str, &'static str)> {
    SERVICES.iter().map(|s| (s.name, s.description)).collect()
}

/// All services bound to the compose project of `env`.
pub fn services(env: &DockerEnvironmentInfo) -> Vec<Service> {
    SERVICES
        .iter()
        .map(|spec| Service {
            name: spec.name,
            description: spec.description,
            start_command: ComposeCommand::new(env, ComposeAction::Up, spec.start),
            stop_command: ComposeCommand::new(env, ComposeAction::Down, spec.stop),
        })
        .collect()
}

/// Look up a service by name.
pub fn find_service(env: &DockerEnvironmentInfo, name: &str) -> Result<Service> {
    services(env)
        .into_iter()
        .find(|service| service.name == name)
        .ok_or_else(|| Error::ServiceNotFound {
            name: name.to_string(),
        })
}

pub fn start_service(
    runtime: &dyn ContainerRuntime,
    env: &DockerEnvironmentInfo,
    name: &str,
) -> Result<()> {
    let service = find_service(env, name)?;
    info!("Starting service {}", service.name);
    service.start_command.execute(runtime)
}

pub fn stop_service(
    runtime: &dyn ContainerRuntime,
    env: &DockerEnvironmentInfo,
    name: &str,
) -> Result<()> {
    let service = find_service(env, name)?;
    info!("Stopping service {}", service.name);
    service.stop_command.execute(runtime)
}

/// Log the service table. With an environment the commands are logged at
/// debug level as well.
pub fn list_services(env: Option<&DockerEnvironmentInfo>) {
    info!("Available services:");
    match env {
        Some(env) => {
            for service in services(env) {
                info!("{}: {}", service.name, service.description);
                debug!("Start Command: {}", service.start_command);
                debug!("Stop Command: {}", service.stop_command);
            }
        }
        None => {
            for (name, description) in service_table() {
                info!("{}: {}", name, description);
            }
        }
    }
}

/// Show the state of the compose project.
pub fn services_info(runtime: &dyn ContainerRuntime, env: &DockerEnvironmentInfo) -> Result<()> {
    ComposeCommand::new(env, ComposeAction::Ps, &[]).execute(runtime)
}
