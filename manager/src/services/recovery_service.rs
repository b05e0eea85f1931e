//
// Cluster-level recovery operations guarded by the operation tracker
//
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::errors::{ConfigError, RecoveryError};
use crate::operation_tracker::OperationTracker;
use crate::pki;
use crate::snapshot::SnapshotManager;

#[derive(Debug, Clone, Serialize)]
pub struct HostSummary {
    pub address: String,
    pub internal_address: String,
    pub hostname_override: String,
}

#[derive(Clone)]
pub struct RecoveryService {
    config: Arc<Config>,
    snapshot_manager: Arc<SnapshotManager>,
    operation_tracker: Arc<OperationTracker>,
}

impl RecoveryService {
    pub fn new(
        config: Arc<Config>,
        snapshot_manager: Arc<SnapshotManager>,
        operation_tracker: Arc<OperationTracker>,
    ) -> Self {
        Self {
            config,
            snapshot_manager,
            operation_tracker,
        }
    }

    pub fn cluster_name(&self) -> &str {
        &self.config.cluster_name
    }

    pub fn operation_tracker(&self) -> &Arc<OperationTracker> {
        &self.operation_tracker
    }

    pub fn hosts(&self) -> Vec<HostSummary> {
        self.snapshot_manager
            .hosts()
            .iter()
            .map(|host| HostSummary {
                address: host.address.clone(),
                internal_address: host.internal_address.clone(),
                hostname_override: host.hostname_override.clone(),
            })
            .collect()
    }

    pub async fn save_snapshot(&self, snapshot_name: &str) -> Result<(), RecoveryError> {
        self.run_exclusive("snapshot_save", || {
            self.snapshot_manager.save_snapshot(snapshot_name)
        })
        .await
    }

    pub async fn remove_snapshot(&self, snapshot_name: &str) -> Result<(), RecoveryError> {
        self.run_exclusive("snapshot_remove", || {
            self.snapshot_manager.remove_snapshot(snapshot_name)
        })
        .await
    }

    /// Stage and verify the snapshot on every host, then restore it
    pub async fn restore_from_snapshot(&self, snapshot_name: &str) -> Result<(), RecoveryError> {
        self.run_exclusive("snapshot_restore", || async {
            self.snapshot_manager.prepare_backup(snapshot_name).await?;
            self.snapshot_manager.restore_snapshot(snapshot_name).await
        })
        .await
    }

    /// Push the CA and node certificates from the configured PKI directory
    pub async fn restore_certificates(&self) -> Result<(), RecoveryError> {
        self.run_exclusive("certificate_restore", || async {
            let bundle = pki::load_bundle(&self.config.pki_dir).await.map_err(|e| {
                RecoveryError::Config(ConfigError::LoadFailed {
                    path: self.config.pki_dir.clone(),
                    reason: e.to_string(),
                })
            })?;
            pki::deploy_restore_certs(self.snapshot_manager.hosts(), &bundle).await
        })
        .await
    }

    async fn run_exclusive<F, Fut>(&self, operation_type: &str, operation: F) -> Result<(), RecoveryError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), RecoveryError>>,
    {
        let target = self.cluster_name();
        self.operation_tracker
            .try_start_operation(target, operation_type)
            .await?;

        let result = operation().await;
        self.operation_tracker.finish_operation(target).await;

        match &result {
            Ok(()) => info!("{} completed successfully for {}", operation_type, target),
            Err(e) => error!("{} failed for {}: {}", operation_type, target, e),
        }
        result
    }
}
