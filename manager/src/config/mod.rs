pub mod manager;
use serde::{Deserialize, Serialize};
pub use manager::ConfigManager;

use crate::constants::{defaults, http};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub cluster_name: String,
    #[serde(default = "default_job_poll_interval")]
    pub job_poll_interval_seconds: u64,
    #[serde(default = "default_pki_dir")]
    pub pki_dir: String,
    pub etcd: EtcdServiceConfig,
    // Populated from individual host config files, in file order
    #[serde(skip)]
    pub hosts: Vec<HostConfig>,
}

fn default_host() -> String {
    defaults::HOST.to_string()
}

fn default_port() -> u16 {
    defaults::PORT
}

fn default_job_poll_interval() -> u64 {
    http::JOB_POLL_INTERVAL_SECONDS
}

fn default_pki_dir() -> String {
    defaults::PKI_DIR.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtcdServiceConfig {
    /// etcd image used for restore
    pub image: String,
    /// Backup tool image used for save, remove, serve and download
    pub backup_image: String,
    /// Absent means legacy local-only backups
    pub backup_config: Option<BackupConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u32,
    #[serde(default = "default_retention")]
    pub retention: u32,
    pub s3_backup_config: Option<S3BackupConfig>,
}

fn default_interval_hours() -> u32 {
    12
}

fn default_retention() -> u32 {
    6
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct S3BackupConfig {
    pub endpoint: String,
    pub bucket_name: String,
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub folder: Option<String>,
    pub custom_ca: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    pub address: String,
    pub internal_address: Option<String>,
    pub hostname_override: Option<String>,
    #[serde(default = "default_agent_port")]
    pub agent_port: u16,
    pub api_key: String,
    // Set from the file name
    #[serde(skip)]
    pub name: String,
}

fn default_agent_port() -> u16 {
    defaults::AGENT_PORT
}

impl HostConfig {
    pub fn internal_address(&self) -> &str {
        self.internal_address.as_deref().unwrap_or(&self.address)
    }

    pub fn hostname_override(&self) -> &str {
        self.hostname_override.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfigFile {
    pub host: HostConfig,
}

impl EtcdServiceConfig {
    pub fn s3_backup_config(&self) -> Option<&S3BackupConfig> {
        self.backup_config
            .as_ref()
            .and_then(|b| b.s3_backup_config.as_ref())
    }
}
