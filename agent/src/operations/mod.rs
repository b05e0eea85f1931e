//! etcd snapshot operations executed on this host
//!
//! Snapshot save, delete, serve and download run inside the backup tool
//! image; restore runs `etcdctl` inside the etcd image. Snapshot files live
//! in the host snapshot directory, mounted at [`BACKUP_MOUNT`].

pub mod backup;
pub mod certs;
pub mod etcd;

use anyhow::{anyhow, Result};

pub const ETCD_CONTAINER: &str = "etcd";
pub const SERVE_BACKUP_CONTAINER: &str = "etcd-serve-backup";
pub const SNAPSHOT_ONCE_CONTAINER: &str = "etcd-snapshot-once";
pub const REMOVE_SNAPSHOT_CONTAINER: &str = "etcd-remove-snapshot";
pub const DOWNLOAD_BACKUP_CONTAINER: &str = "etcd-download-backup";
pub const RESTORE_CONTAINER: &str = "etcd-restore";

pub const BACKUP_MOUNT: &str = "/backup";
pub const SSL_MOUNT: &str = "/etc/kubernetes/ssl";
pub const DATA_MOUNT: &str = "/var/lib/rancher/etcd";

pub const BACKUP_TOOL: &str = "/opt/rke-tools/rke-etcd-backup";
pub const ETCD_CLIENT_PORT: u16 = 2379;
pub const ETCD_PEER_PORT: u16 = 2380;

/// Snapshot names become file names; reject anything that could escape the
/// snapshot directory.
pub fn validate_snapshot_name(snapshot_name: &str) -> Result<()> {
    if snapshot_name.is_empty()
        || snapshot_name.contains('/')
        || snapshot_name.contains('\\')
        || snapshot_name.starts_with('.')
    {
        return Err(anyhow!("Invalid snapshot name: '{}'", snapshot_name));
    }
    Ok(())
}
