use tracing::info;

use crate::config::EtcdServiceConfig;
use crate::errors::RecoveryError;
use crate::hosts::{etcd_initial_cluster, Host};

/// Coordinates snapshot operations over an ordered set of etcd hosts
#[derive(Clone)]
pub struct SnapshotManager {
    pub(crate) etcd: EtcdServiceConfig,
    pub(crate) hosts: Vec<Host>,
}

impl SnapshotManager {
    pub fn new(etcd: EtcdServiceConfig, hosts: Vec<Host>) -> Self {
        Self { etcd, hosts }
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    pub fn etcd_config(&self) -> &EtcdServiceConfig {
        &self.etcd
    }

    pub(crate) fn backup_image(&self) -> &str {
        &self.etcd.backup_image
    }

    /// Take a snapshot named `snapshot_name` on every host, in order.
    ///
    /// Stops at the first failing host; hosts already done keep their snapshot.
    pub async fn save_snapshot(&self, snapshot_name: &str) -> Result<(), RecoveryError> {
        info!(
            "[etcd] Saving snapshot [{}] on {} hosts",
            snapshot_name,
            self.hosts.len()
        );
        for host in &self.hosts {
            host.runtime
                .save_snapshot(self.backup_image(), snapshot_name, &self.etcd)
                .await
                .map_err(RecoveryError::HostOperation)?;
        }
        Ok(())
    }

    /// Delete the snapshot named `snapshot_name` from every host, in order.
    pub async fn remove_snapshot(&self, snapshot_name: &str) -> Result<(), RecoveryError> {
        info!(
            "[etcd] Removing snapshot [{}] from {} hosts",
            snapshot_name,
            self.hosts.len()
        );
        for host in &self.hosts {
            host.runtime
                .remove_snapshot(self.backup_image(), snapshot_name, &self.etcd)
                .await
                .map_err(RecoveryError::HostOperation)?;
        }
        Ok(())
    }

    /// Restore `snapshot_name` on every host using one membership descriptor.
    ///
    /// The first failure aborts; later hosts are not attempted and hosts
    /// already restored are left as they are.
    pub async fn restore_snapshot(&self, snapshot_name: &str) -> Result<(), RecoveryError> {
        let initial_cluster = etcd_initial_cluster(&self.hosts);
        info!(
            "[etcd] Restoring snapshot [{}] with initial cluster [{}]",
            snapshot_name, initial_cluster
        );

        for host in &self.hosts {
            host.runtime
                .restore_snapshot(&self.etcd.image, snapshot_name, &initial_cluster)
                .await
                .map_err(RecoveryError::RestoreFailed)?;
            info!("[etcd] Snapshot restored on host [{}]", host.address);
        }
        Ok(())
    }
}
