//! In-memory host runtime for testing
//!
//! Records every call it receives and fails the operations it was told to
//! fail, so orchestration tests can assert exactly which hosts were touched.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use recovery_manager::config::{EtcdServiceConfig, S3BackupConfig};
use recovery_manager::hosts::{Host, HostRuntime};
use recovery_manager::pki::CertificatePki;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Remote operations a host can receive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    StopContainer,
    StartContainer,
    RemoveContainer,
    StartBackupServer,
    DownloadFromBackupServer,
    DownloadFromS3,
    Checksum,
    SaveSnapshot,
    RemoveSnapshot,
    RestoreSnapshot,
    DeployCertificates,
}

pub struct MockHostRuntime {
    pub address: String,
    failing: HashSet<Op>,
    checksum: String,
    calls: Mutex<Vec<(Op, String)>>,
}

impl MockHostRuntime {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            failing: HashSet::new(),
            checksum: "d41d8cd98f00b204e9800998ecf8427e".to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make `op` fail on this host
    pub fn failing(mut self, op: Op) -> Self {
        self.failing.insert(op);
        self
    }

    pub fn with_checksum(mut self, checksum: &str) -> Self {
        self.checksum = checksum.to_string();
        self
    }

    /// All calls received, with the main argument of each
    pub fn calls(&self) -> Vec<(Op, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn ops(&self) -> Vec<Op> {
        self.calls().into_iter().map(|(op, _)| op).collect()
    }

    pub fn called(&self, op: Op) -> bool {
        self.call_count(op) > 0
    }

    pub fn call_count(&self, op: Op) -> usize {
        self.calls().iter().filter(|(o, _)| *o == op).count()
    }

    /// Argument of the first call to `op`
    pub fn argument(&self, op: Op) -> Option<String> {
        self.calls()
            .into_iter()
            .find(|(o, _)| *o == op)
            .map(|(_, arg)| arg)
    }

    fn record(&self, op: Op, argument: &str) -> Result<()> {
        self.calls.lock().unwrap().push((op, argument.to_string()));
        if self.failing.contains(&op) {
            Err(anyhow!("{:?} failed on {}", op, self.address))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl HostRuntime for MockHostRuntime {
    async fn stop_container(&self, container_name: &str) -> Result<()> {
        self.record(Op::StopContainer, container_name)
    }

    async fn start_container(&self, container_name: &str) -> Result<()> {
        self.record(Op::StartContainer, container_name)
    }

    async fn remove_container(&self, container_name: &str) -> Result<()> {
        self.record(Op::RemoveContainer, container_name)
    }

    async fn start_backup_server(&self, _image: &str, snapshot_name: &str) -> Result<()> {
        self.record(Op::StartBackupServer, snapshot_name)
    }

    async fn download_snapshot_from_backup_server(
        &self,
        _image: &str,
        _snapshot_name: &str,
        server_address: &str,
    ) -> Result<()> {
        self.record(Op::DownloadFromBackupServer, server_address)
    }

    async fn download_snapshot_from_s3(
        &self,
        _image: &str,
        _snapshot_name: &str,
        s3: &S3BackupConfig,
    ) -> Result<()> {
        self.record(Op::DownloadFromS3, &s3.bucket_name)
    }

    async fn snapshot_checksum(&self, snapshot_name: &str) -> Result<String> {
        self.record(Op::Checksum, snapshot_name)?;
        Ok(self.checksum.clone())
    }

    async fn save_snapshot(
        &self,
        _image: &str,
        snapshot_name: &str,
        _etcd: &EtcdServiceConfig,
    ) -> Result<()> {
        self.record(Op::SaveSnapshot, snapshot_name)
    }

    async fn remove_snapshot(
        &self,
        _image: &str,
        snapshot_name: &str,
        _etcd: &EtcdServiceConfig,
    ) -> Result<()> {
        self.record(Op::RemoveSnapshot, snapshot_name)
    }

    async fn restore_snapshot(
        &self,
        _image: &str,
        _snapshot_name: &str,
        initial_cluster: &str,
    ) -> Result<()> {
        self.record(Op::RestoreSnapshot, initial_cluster)
    }

    async fn deploy_certificates(&self, certificates: &[CertificatePki]) -> Result<()> {
        let names: Vec<&str> = certificates.iter().map(|c| c.name.as_str()).collect();
        self.record(Op::DeployCertificates, &names.join(","))
    }
}

/// Wrap runtimes into hosts named `etcd-<n>` with internal addresses `10.0.0.<n>`
pub fn mock_hosts(runtimes: Vec<MockHostRuntime>) -> (Vec<Host>, Vec<Arc<MockHostRuntime>>) {
    let runtimes: Vec<Arc<MockHostRuntime>> = runtimes.into_iter().map(Arc::new).collect();
    let hosts = runtimes
        .iter()
        .enumerate()
        .map(|(i, runtime)| {
            Host::new(
                runtime.address.clone(),
                format!("10.0.0.{}", i + 1),
                format!("node-{}", i + 1),
                runtime.clone() as Arc<dyn HostRuntime>,
            )
        })
        .collect();
    (hosts, runtimes)
}
