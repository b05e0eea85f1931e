// File: agent/src/operations/backup.rs
use anyhow::Result;
use tracing::info;

use super::{
    validate_snapshot_name, BACKUP_MOUNT, BACKUP_TOOL, DOWNLOAD_BACKUP_CONTAINER,
    ETCD_CLIENT_PORT, SERVE_BACKUP_CONTAINER, SSL_MOUNT,
};
use crate::services::docker::{self, RunSpec};
use crate::settings::Settings;
use crate::types::{DownloadBackupRequest, DownloadS3Request, S3Settings, ServeBackupRequest};

/// Container running the backup tool with the snapshot and certificate dirs mounted
pub fn backup_tool_spec(settings: &Settings, container_name: &str, image: &str) -> RunSpec {
    RunSpec::new(container_name, image)
        .volume(settings.snapshot_dir.display().to_string(), BACKUP_MOUNT)
        .volume(settings.ssl_dir.display().to_string(), SSL_MOUNT)
}

/// TLS flags the backup tool uses to talk to peers
pub fn tls_args() -> Vec<String> {
    vec![
        "--cacert".to_string(),
        format!("{}/kube-ca.pem", SSL_MOUNT),
        "--cert".to_string(),
        format!("{}/kube-node.pem", SSL_MOUNT),
        "--key".to_string(),
        format!("{}/kube-node-key.pem", SSL_MOUNT),
    ]
}

/// Backup tool flags selecting the object store
pub fn s3_args(s3: &S3Settings) -> Vec<String> {
    let mut args = vec![
        "--s3-backup".to_string(),
        "--s3-endpoint".to_string(),
        s3.endpoint.clone(),
        "--s3-bucketName".to_string(),
        s3.bucket_name.clone(),
    ];
    let optional = [
        ("--s3-region", &s3.region),
        ("--s3-accessKey", &s3.access_key),
        ("--s3-secretKey", &s3.secret_key),
        ("--s3-folder", &s3.folder),
        ("--s3-endpoint-ca", &s3.custom_ca),
    ];
    for (flag, value) in optional {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            args.push(flag.to_string());
            args.push(value.to_string());
        }
    }
    args
}

pub fn serve_spec(settings: &Settings, request: &ServeBackupRequest) -> RunSpec {
    backup_tool_spec(settings, SERVE_BACKUP_CONTAINER, &request.image)
        .detached()
        .command([BACKUP_TOOL, "etcd-backup", "serve", "--name", request.snapshot_name.as_str()])
        .command(tls_args())
}

pub fn download_spec(settings: &Settings, request: &DownloadBackupRequest) -> RunSpec {
    let endpoint = format!("https://{}:{}", request.server_address, ETCD_CLIENT_PORT);
    backup_tool_spec(settings, DOWNLOAD_BACKUP_CONTAINER, &request.image)
        .command([BACKUP_TOOL, "etcd-backup", "download", "--name", request.snapshot_name.as_str()])
        .command(["--local-endpoint", endpoint.as_str()])
        .command(tls_args())
}

pub fn download_s3_spec(settings: &Settings, request: &DownloadS3Request) -> RunSpec {
    backup_tool_spec(settings, DOWNLOAD_BACKUP_CONTAINER, &request.image)
        .command([BACKUP_TOOL, "etcd-backup", "download", "--name", request.snapshot_name.as_str()])
        .command(s3_args(&request.s3))
}

/// Start the file server for the snapshot on the etcd client port
pub async fn serve_backup(settings: &Settings, request: &ServeBackupRequest) -> Result<String> {
    validate_snapshot_name(&request.snapshot_name)?;
    info!("Serving snapshot {} on port {}", request.snapshot_name, ETCD_CLIENT_PORT);
    docker::run_container(&settings.docker_bin, &serve_spec(settings, request)).await
}

/// Fetch the snapshot from the peer serving it
pub async fn download_from_backup_server(
    settings: &Settings,
    request: &DownloadBackupRequest,
) -> Result<String> {
    validate_snapshot_name(&request.snapshot_name)?;
    info!(
        "Downloading snapshot {} from backup server {}",
        request.snapshot_name, request.server_address
    );
    let output = docker::run_container(&settings.docker_bin, &download_spec(settings, request)).await?;
    info!("✓ Snapshot {} downloaded", request.snapshot_name);
    Ok(output)
}

pub async fn download_from_s3(settings: &Settings, request: &DownloadS3Request) -> Result<String> {
    validate_snapshot_name(&request.snapshot_name)?;
    info!(
        "Downloading snapshot {} from S3 bucket {}",
        request.snapshot_name, request.s3.bucket_name
    );
    let output = docker::run_container(&settings.docker_bin, &download_s3_spec(settings, request)).await?;
    info!("✓ Snapshot {} downloaded from S3", request.snapshot_name);
    Ok(output)
}
