//! Thin wrapper over the docker CLI

use anyhow::Result;
use tracing::{debug, info};

use super::commands::execute_command;

/// Arguments for one `docker run`
#[derive(Debug, Clone, Default)]
pub struct RunSpec {
    pub name: String,
    pub image: String,
    /// Run in the background instead of waiting for exit
    pub detach: bool,
    pub host_network: bool,
    /// (host path, container path)
    pub volumes: Vec<(String, String)>,
    pub env: Vec<(String, String)>,
    pub command: Vec<String>,
}

impl RunSpec {
    pub fn new(name: &str, image: &str) -> Self {
        Self {
            name: name.to_string(),
            image: image.to_string(),
            host_network: true,
            ..Self::default()
        }
    }

    pub fn volume(mut self, host: impl Into<String>, container: impl Into<String>) -> Self {
        self.volumes.push((host.into(), container.into()));
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    pub fn detached(mut self) -> Self {
        self.detach = true;
        self
    }

    pub fn command<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["run".to_string()];
        if self.detach {
            args.push("-d".to_string());
        } else {
            args.push("--rm".to_string());
        }
        args.push("--name".to_string());
        args.push(self.name.clone());
        if self.host_network {
            args.push("--net=host".to_string());
        }
        for (host, container) in &self.volumes {
            args.push("-v".to_string());
            args.push(format!("{}:{}", host, container));
        }
        for (key, value) in &self.env {
            args.push("-e".to_string());
            args.push(format!("{}={}", key, value));
        }
        args.push(self.image.clone());
        args.extend(self.command.iter().cloned());
        args
    }
}

pub async fn run_container(docker_bin: &str, spec: &RunSpec) -> Result<String> {
    info!("Running container {} from {}", spec.name, spec.image);
    // A stale container with the same name blocks `docker run`
    remove_container(docker_bin, &spec.name).await?;
    execute_command(docker_bin, &spec.to_args()).await
}

pub async fn stop_container(docker_bin: &str, name: &str) -> Result<()> {
    info!("Stopping container: {}", name);
    execute_command(docker_bin, &["stop".to_string(), name.to_string()]).await?;
    Ok(())
}

pub async fn start_container(docker_bin: &str, name: &str) -> Result<()> {
    info!("Starting container: {}", name);
    execute_command(docker_bin, &["start".to_string(), name.to_string()]).await?;
    Ok(())
}

/// Force-remove `name`; a container that does not exist counts as removed
pub async fn remove_container(docker_bin: &str, name: &str) -> Result<()> {
    match execute_command(docker_bin, &["rm".to_string(), "-f".to_string(), name.to_string()]).await {
        Ok(_) => {
            debug!("Removed container: {}", name);
            Ok(())
        }
        Err(e) if e.to_string().contains("No such container") => Ok(()),
        Err(e) => Err(e),
    }
}
