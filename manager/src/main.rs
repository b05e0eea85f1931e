use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use recovery_manager::config::ConfigManager;
use recovery_manager::hosts::Host;
use recovery_manager::http::HttpAgentClient;
use recovery_manager::web::{start_web_server, AppState};
use recovery_manager::{OperationTracker, RecoveryService, SnapshotManager};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("recovery_manager=info".parse()?)
        .add_directive("tower_http=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    info!("Starting etcd Recovery Manager");

    let config_dir = std::env::var("RECOVERY_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let config_manager = ConfigManager::new(config_dir).await?;
    let config = config_manager.get_current_config();

    if config.hosts.is_empty() {
        warn!("No etcd hosts configured - every recovery operation will be a no-op or fail");
    }

    let poll_interval = Duration::from_secs(config.job_poll_interval_seconds);
    let mut hosts = Vec::with_capacity(config.hosts.len());
    for host_config in &config.hosts {
        let client = HttpAgentClient::new(host_config, poll_interval)?;
        info!("Registered etcd host {} via agent {}", host_config.address, client.base_url());
        hosts.push(Host::from_config(host_config, Arc::new(client)));
    }

    let snapshot_manager = Arc::new(SnapshotManager::new(config.etcd.clone(), hosts));
    let operation_tracker = Arc::new(OperationTracker::new());
    let recovery_service = Arc::new(RecoveryService::new(
        config.clone(),
        snapshot_manager,
        operation_tracker,
    ));
    info!("Recovery service initialized for cluster {}", config.cluster_name);

    start_web_server(AppState::new(config, recovery_service)).await?;

    Ok(())
}
