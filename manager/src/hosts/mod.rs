//! etcd member hosts and the remote operations the coordinator needs from them
//!
//! The coordinator never talks to a container runtime directly. Every remote
//! effect goes through [`HostRuntime`], one handle per host. The shipped
//! implementation is [`crate::http::HttpAgentClient`], which forwards each call
//! to the agent running on that host.
//!
//! # Architecture
//!
//! ```text
//! SnapshotManager → Host → HostRuntime → Agent (port 8745) → docker
//! ```

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::config::{EtcdServiceConfig, HostConfig, S3BackupConfig};
use crate::constants::etcd;
use crate::pki::CertificatePki;

/// Remote collaborator calls consumed by the recovery coordinator.
///
/// Implementations must not retry: each call is attempted once and its
/// outcome reported as-is.
#[async_trait]
pub trait HostRuntime: Send + Sync {
    async fn stop_container(&self, container_name: &str) -> Result<()>;

    async fn start_container(&self, container_name: &str) -> Result<()>;

    async fn remove_container(&self, container_name: &str) -> Result<()>;

    /// Start a file-serving container for `snapshot_name` on the etcd client port
    async fn start_backup_server(&self, image: &str, snapshot_name: &str) -> Result<()>;

    /// Fetch `snapshot_name` from the host serving it at `server_address`
    async fn download_snapshot_from_backup_server(
        &self,
        image: &str,
        snapshot_name: &str,
        server_address: &str,
    ) -> Result<()>;

    async fn download_snapshot_from_s3(
        &self,
        image: &str,
        snapshot_name: &str,
        s3: &S3BackupConfig,
    ) -> Result<()>;

    /// Content checksum of the local snapshot file
    async fn snapshot_checksum(&self, snapshot_name: &str) -> Result<String>;

    async fn save_snapshot(
        &self,
        image: &str,
        snapshot_name: &str,
        etcd: &EtcdServiceConfig,
    ) -> Result<()>;

    async fn remove_snapshot(
        &self,
        image: &str,
        snapshot_name: &str,
        etcd: &EtcdServiceConfig,
    ) -> Result<()>;

    async fn restore_snapshot(
        &self,
        image: &str,
        snapshot_name: &str,
        initial_cluster: &str,
    ) -> Result<()>;

    async fn deploy_certificates(&self, certificates: &[CertificatePki]) -> Result<()>;
}

/// One etcd quorum member
#[derive(Clone)]
pub struct Host {
    pub address: String,
    pub internal_address: String,
    pub hostname_override: String,
    pub runtime: Arc<dyn HostRuntime>,
}

impl Host {
    pub fn new(
        address: impl Into<String>,
        internal_address: impl Into<String>,
        hostname_override: impl Into<String>,
        runtime: Arc<dyn HostRuntime>,
    ) -> Self {
        Self {
            address: address.into(),
            internal_address: internal_address.into(),
            hostname_override: hostname_override.into(),
            runtime,
        }
    }

    pub fn from_config(config: &HostConfig, runtime: Arc<dyn HostRuntime>) -> Self {
        Self::new(
            config.address.clone(),
            config.internal_address(),
            config.hostname_override(),
            runtime,
        )
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("address", &self.address)
            .field("internal_address", &self.internal_address)
            .field("hostname_override", &self.hostname_override)
            .finish()
    }
}

/// Initial-membership descriptor for `etcdctl snapshot restore`:
/// `etcd-<name>=https://<internal address>:2380`, comma-separated in host order.
pub fn etcd_initial_cluster(hosts: &[Host]) -> String {
    hosts
        .iter()
        .map(|host| {
            format!(
                "{}{}=https://{}:{}",
                etcd::MEMBER_NAME_PREFIX,
                host.hostname_override,
                host.internal_address,
                etcd::PEER_PORT
            )
        })
        .collect::<Vec<_>>()
        .join(",")
}
