use super::{Config, HostConfigFile};
use crate::errors::ConfigError;
use anyhow::{anyhow, Result};
use glob::glob;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_dir: String) -> Result<Self> {
        let config = Self::load_configuration(&config_dir).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_dir: &str) -> Result<Config> {
        let main_config_path = format!("{}/main.toml", config_dir);
        let main_config_content = fs::read_to_string(&main_config_path)
            .await
            .map_err(|e| ConfigError::LoadFailed {
                path: main_config_path.clone(),
                reason: e.to_string(),
            })?;

        let mut config: Config =
            toml::from_str(&main_config_content).map_err(|e| ConfigError::ParseError {
                path: main_config_path.clone(),
                reason: e.to_string(),
            })?;

        // glob yields paths in sorted order, which becomes the host iteration order
        let pattern = format!("{}/*.toml", config_dir);
        let mut hosts = Vec::new();

        for entry in glob(&pattern).map_err(|e| anyhow!("Glob pattern error: {}", e))? {
            let path = entry.map_err(|e| anyhow!("Glob entry error: {}", e))?;
            let filename = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| anyhow!("Invalid filename"))?;

            if filename == "main.toml" {
                continue;
            }

            let host_name = filename
                .strip_suffix(".toml")
                .ok_or_else(|| anyhow!("Invalid config filename: {}", filename))?;

            debug!("Loading host config: {}", path.display());

            let content = fs::read_to_string(&path)
                .await
                .map_err(|e| ConfigError::LoadFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;

            let host_file: HostConfigFile =
                toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;

            let mut host = host_file.host;
            host.name = host_name.to_string();
            hosts.push(host);
        }

        if config.etcd.backup_image.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "etcd.backup_image".to_string(),
            }
            .into());
        }

        config.hosts = hosts;

        info!(
            "Loaded {} etcd hosts for cluster {} (backup config: {}, s3: {})",
            config.hosts.len(),
            config.cluster_name,
            config.etcd.backup_config.is_some(),
            config.etcd.s3_backup_config().is_some()
        );

        Ok(config)
    }
}
