use tracing::{info, warn};

use super::manager::SnapshotManager;
use super::naming::is_local_snapshot;
use crate::config::{EtcdServiceConfig, S3BackupConfig};
use crate::constants::containers;
use crate::errors::{ErrorAggregate, RecoveryError};
use crate::hosts::Host;

/// Where the hosts get the snapshot file from
#[derive(Debug, PartialEq)]
pub(crate) enum BackupSource<'a> {
    /// One host serves its local copy to the others
    LocalTransfer,
    /// Every host downloads from the object store
    ObjectStore(&'a S3BackupConfig),
}

/// Legacy clusters (no backup config) are always local. Otherwise the
/// provider flag in the snapshot name decides.
pub(crate) fn select_backup_source<'a>(
    etcd: &'a EtcdServiceConfig,
    snapshot_name: &str,
) -> Result<BackupSource<'a>, RecoveryError> {
    match (&etcd.backup_config, is_local_snapshot(snapshot_name)) {
        (None, _) | (Some(_), true) => Ok(BackupSource::LocalTransfer),
        (Some(backup_config), false) => match &backup_config.s3_backup_config {
            Some(s3) => Ok(BackupSource::ObjectStore(s3)),
            None => Err(RecoveryError::S3ConfigMissing),
        },
    }
}

impl SnapshotManager {
    /// Stage `snapshot_name` on every host and check that all copies match.
    pub async fn prepare_backup(&self, snapshot_name: &str) -> Result<(), RecoveryError> {
        // Deliberately reported as "not prepared" rather than as a failed
        // election over zero hosts, whatever the snapshot source.
        if self.hosts.is_empty() {
            return Err(RecoveryError::BackupNotPrepared);
        }

        match select_backup_source(&self.etcd, snapshot_name)? {
            BackupSource::LocalTransfer => self.transfer_local_backup(snapshot_name).await?,
            BackupSource::ObjectStore(s3) => self.download_backup_from_s3(snapshot_name, s3).await?,
        }

        if !self.snapshots_consistent(snapshot_name).await {
            return Err(RecoveryError::InconsistentSnapshots);
        }
        Ok(())
    }

    /// Serve the snapshot from the first host able to start a backup server.
    ///
    /// etcd is stopped on each host visited because the backup server binds
    /// the etcd client port. Hosts after the elected one are not visited, so
    /// their etcd keeps running.
    async fn transfer_local_backup(&self, snapshot_name: &str) -> Result<(), RecoveryError> {
        let image = self.backup_image();
        let mut errors = ErrorAggregate::new();
        let mut backup_server: Option<&Host> = None;

        for host in &self.hosts {
            if let Err(e) = host.runtime.stop_container(containers::ETCD).await {
                warn!(
                    "[etcd] Failed to stop etcd container on host [{}]: {}",
                    host.address, e
                );
            }

            match host.runtime.start_backup_server(image, snapshot_name).await {
                Ok(()) => {
                    info!("[etcd] Backup server started on host [{}]", host.address);
                    backup_server = Some(host);
                    break;
                }
                Err(e) => {
                    warn!(
                        "[etcd] Failed to start backup server on host [{}]: {}",
                        host.address, e
                    );
                    errors.push(e);
                }
            }
        }

        let Some(backup_server) = backup_server else {
            for host in &self.hosts {
                if let Err(e) = host.runtime.start_container(containers::ETCD).await {
                    warn!(
                        "[etcd] Failed to start etcd container on host [{}]: {}",
                        host.address, e
                    );
                }
            }
            return Err(RecoveryError::BackupServerUnavailable(errors));
        };

        for host in &self.hosts {
            if host.address == backup_server.address {
                continue;
            }
            host.runtime
                .download_snapshot_from_backup_server(image, snapshot_name, &backup_server.address)
                .await
                .map_err(RecoveryError::HostOperation)?;
            info!(
                "[etcd] Snapshot [{}] downloaded to host [{}] from [{}]",
                snapshot_name, host.address, backup_server.address
            );
        }

        backup_server
            .runtime
            .remove_container(containers::ETCD_SERVE_BACKUP)
            .await
            .map_err(RecoveryError::HostOperation)?;
        Ok(())
    }

    async fn download_backup_from_s3(
        &self,
        snapshot_name: &str,
        s3: &S3BackupConfig,
    ) -> Result<(), RecoveryError> {
        for host in &self.hosts {
            host.runtime
                .download_snapshot_from_s3(self.backup_image(), snapshot_name, s3)
                .await
                .map_err(RecoveryError::HostOperation)?;
            info!(
                "[etcd] Snapshot [{}] downloaded to host [{}] from S3 bucket [{}]",
                snapshot_name, host.address, s3.bucket_name
            );
        }
        Ok(())
    }
}
