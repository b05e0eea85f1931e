//! Agent settings read from the environment

use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_API_KEY: &str = "default-development-key";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8745";
pub const DEFAULT_SNAPSHOT_DIR: &str = "/opt/rke/etcd-snapshots";
pub const DEFAULT_DATA_DIR: &str = "/var/lib/etcd";
pub const DEFAULT_SSL_DIR: &str = "/etc/kubernetes/ssl";
pub const DEFAULT_DOCKER_BIN: &str = "docker";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub bind_address: String,
    /// Host directory holding snapshot files
    pub snapshot_dir: PathBuf,
    /// Host directory holding the etcd member data
    pub data_dir: PathBuf,
    /// Host directory holding certificates
    pub ssl_dir: PathBuf,
    pub docker_bin: String,
}

impl Settings {
    pub fn from_env() -> Self {
        let api_key = env_or("AGENT_API_KEY", DEFAULT_API_KEY);
        if api_key == DEFAULT_API_KEY {
            warn!("Using default development API key - set AGENT_API_KEY environment variable for production");
        }

        Self {
            api_key,
            bind_address: env_or("AGENT_BIND_ADDRESS", DEFAULT_BIND_ADDRESS),
            snapshot_dir: PathBuf::from(env_or("ETCD_SNAPSHOT_DIR", DEFAULT_SNAPSHOT_DIR)),
            data_dir: PathBuf::from(env_or("ETCD_DATA_DIR", DEFAULT_DATA_DIR)),
            ssl_dir: PathBuf::from(env_or("SSL_DIR", DEFAULT_SSL_DIR)),
            docker_bin: env_or("DOCKER_BIN", DEFAULT_DOCKER_BIN),
        }
    }

    /// Path of the snapshot file named `snapshot_name`
    pub fn snapshot_path(&self, snapshot_name: &str) -> PathBuf {
        self.snapshot_dir.join(snapshot_name)
    }
}

#[cfg(test)]
pub(crate) fn test_settings() -> Settings {
    Settings {
        api_key: "test-api-key".to_string(),
        bind_address: "127.0.0.1:0".to_string(),
        snapshot_dir: PathBuf::from(DEFAULT_SNAPSHOT_DIR),
        data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        ssl_dir: PathBuf::from(DEFAULT_SSL_DIR),
        docker_bin: DEFAULT_DOCKER_BIN.to_string(),
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}
