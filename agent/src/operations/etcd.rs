// File: agent/src/operations/etcd.rs
use anyhow::{anyhow, Result};
use std::path::Path;
use tracing::info;

use super::backup::{backup_tool_spec, s3_args, tls_args};
use super::{
    validate_snapshot_name, BACKUP_MOUNT, BACKUP_TOOL, DATA_MOUNT, ETCD_PEER_PORT,
    REMOVE_SNAPSHOT_CONTAINER, RESTORE_CONTAINER, SNAPSHOT_ONCE_CONTAINER, SSL_MOUNT,
};
use crate::services::checksum::file_sha256;
use crate::services::docker::{self, RunSpec};
use crate::settings::Settings;
use crate::types::{RestoreRequest, SnapshotRequest};

const INITIAL_CLUSTER_TOKEN: &str = "etcd-cluster-1";

pub fn save_spec(settings: &Settings, request: &SnapshotRequest) -> RunSpec {
    let spec = backup_tool_spec(settings, SNAPSHOT_ONCE_CONTAINER, &request.image)
        .command([BACKUP_TOOL, "etcd-backup", "save", "--name", request.snapshot_name.as_str()])
        .command(tls_args());
    match &request.s3 {
        Some(s3) => spec.command(s3_args(s3)),
        None => spec,
    }
}

pub fn remove_spec(settings: &Settings, request: &SnapshotRequest) -> RunSpec {
    let spec = backup_tool_spec(settings, REMOVE_SNAPSHOT_CONTAINER, &request.image)
        .command([BACKUP_TOOL, "etcd-backup", "delete", "--name", request.snapshot_name.as_str()]);
    match &request.s3 {
        Some(s3) => spec.command(s3_args(s3)),
        None => spec,
    }
}

/// Scratch directory under the data dir that `etcdctl snapshot restore` writes into
const RESTORE_SCRATCH_DIR: &str = "restore";

/// `etcdctl snapshot restore` arguments; every value is its own argument so
/// nothing passes through a shell
pub fn restore_args(request: &RestoreRequest) -> Vec<String> {
    vec![
        "etcdctl".to_string(),
        "snapshot".to_string(),
        "restore".to_string(),
        format!("{}/{}", BACKUP_MOUNT, request.snapshot_name),
        format!("--data-dir={}/{}", DATA_MOUNT, RESTORE_SCRATCH_DIR),
        format!("--name=etcd-{}", request.hostname_override),
        format!("--initial-cluster={}", request.initial_cluster),
        format!("--initial-cluster-token={}", INITIAL_CLUSTER_TOKEN),
        format!(
            "--initial-advertise-peer-urls=https://{}:{}",
            request.internal_address, ETCD_PEER_PORT
        ),
    ]
}

pub fn restore_spec(settings: &Settings, request: &RestoreRequest) -> RunSpec {
    RunSpec::new(RESTORE_CONTAINER, &request.image)
        .volume(settings.snapshot_dir.display().to_string(), BACKUP_MOUNT)
        .volume(settings.data_dir.display().to_string(), DATA_MOUNT)
        .volume(settings.ssl_dir.display().to_string(), SSL_MOUNT)
        .env("ETCDCTL_API", "3")
        .command(restore_args(request))
}

async fn remove_dir_if_present(path: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(anyhow!("Failed to remove {}: {}", path.display(), e)),
    }
}

/// Replace `<data_dir>/member` with the freshly restored scratch member dir
pub async fn swap_member_dir(data_dir: &Path) -> Result<()> {
    let scratch = data_dir.join(RESTORE_SCRATCH_DIR);
    let restored = scratch.join("member");
    if !tokio::fs::try_exists(&restored).await.unwrap_or(false) {
        return Err(anyhow!("Restored member dir missing: {}", restored.display()));
    }

    let member = data_dir.join("member");
    remove_dir_if_present(&member).await?;
    tokio::fs::rename(&restored, &member)
        .await
        .map_err(|e| anyhow!("Failed to move {} into place: {}", restored.display(), e))?;
    remove_dir_if_present(&scratch).await
}

pub async fn save_snapshot(settings: &Settings, request: &SnapshotRequest) -> Result<String> {
    validate_snapshot_name(&request.snapshot_name)?;
    info!(
        "Saving etcd snapshot {} (s3: {})",
        request.snapshot_name,
        request.s3.is_some()
    );
    let output = docker::run_container(&settings.docker_bin, &save_spec(settings, request)).await?;
    info!("✓ Snapshot {} saved", request.snapshot_name);
    Ok(output)
}

pub async fn remove_snapshot(settings: &Settings, request: &SnapshotRequest) -> Result<String> {
    validate_snapshot_name(&request.snapshot_name)?;
    info!("Removing etcd snapshot {}", request.snapshot_name);
    docker::run_container(&settings.docker_bin, &remove_spec(settings, request)).await
}

/// Replace this member's data with the snapshot contents
pub async fn restore_snapshot(settings: &Settings, request: &RestoreRequest) -> Result<String> {
    validate_snapshot_name(&request.snapshot_name)?;
    if request.initial_cluster.is_empty() {
        return Err(anyhow!("Initial cluster descriptor is empty"));
    }

    let snapshot_path = settings.snapshot_path(&request.snapshot_name);
    if !tokio::fs::try_exists(&snapshot_path).await.unwrap_or(false) {
        return Err(anyhow!("Snapshot file not found: {}", snapshot_path.display()));
    }

    info!(
        "Restoring etcd snapshot {} as member etcd-{}",
        request.snapshot_name, request.hostname_override
    );
    remove_dir_if_present(&settings.data_dir.join(RESTORE_SCRATCH_DIR)).await?;
    let output = docker::run_container(&settings.docker_bin, &restore_spec(settings, request)).await?;
    swap_member_dir(&settings.data_dir).await?;
    info!("✓ Snapshot {} restored", request.snapshot_name);
    Ok(output)
}

/// Checksum of the local snapshot file
pub async fn snapshot_checksum(settings: &Settings, snapshot_name: &str) -> Result<String> {
    validate_snapshot_name(snapshot_name)?;
    let checksum = file_sha256(&settings.snapshot_path(snapshot_name)).await?;
    info!("Checksum of snapshot {} is {}", snapshot_name, checksum);
    Ok(checksum)
}
