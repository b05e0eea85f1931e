use tracing::{info, warn};

use super::manager::SnapshotManager;

impl SnapshotManager {
    /// Whether every host holds an identical copy of `snapshot_name`.
    ///
    /// Checksums are computed fresh on each call. A host whose checksum cannot
    /// be computed makes the whole check fail.
    pub async fn snapshots_consistent(&self, snapshot_name: &str) -> bool {
        info!("[etcd] Checking if all snapshots are identical");
        let mut checksums = Vec::with_capacity(self.hosts.len());

        for host in &self.hosts {
            match host.runtime.snapshot_checksum(snapshot_name).await {
                Ok(checksum) => {
                    info!(
                        "[etcd] Checksum of etcd snapshot on host [{}] is [{}]",
                        host.address, checksum
                    );
                    checksums.push(checksum);
                }
                Err(e) => {
                    warn!(
                        "[etcd] Failed to get snapshot checksum on host [{}]: {}",
                        host.address, e
                    );
                    return false;
                }
            }
        }

        checksums_match(&checksums)
    }
}

/// True when every checksum equals the first one
pub fn checksums_match(checksums: &[String]) -> bool {
    match checksums.split_first() {
        Some((first, rest)) => rest.iter().all(|checksum| checksum == first),
        None => true,
    }
}
