//! etcd snapshot recovery across the host set
//!
//! This module sequences every snapshot operation that touches more than one
//! etcd host: saving and removing snapshots, staging a snapshot file on all
//! hosts, verifying that every copy is identical, and restoring it.
//!
//! # Restore Process
//!
//! 1. Stage the snapshot on every host
//!    - local snapshots: elect one host to serve the file, the rest download it
//!    - S3 snapshots: every host downloads from the object store
//! 2. Compare the snapshot checksum on every host
//! 3. Restore every host with the same initial-membership descriptor
//!
//! Only the certificate distribution in [`crate::pki`] runs hosts
//! concurrently. Everything here visits hosts one at a time, in order, and
//! stops at the first failure without retrying.

mod backup;
mod checksum;
pub mod manager;
pub mod naming;

pub use checksum::checksums_match;
pub use manager::SnapshotManager;
pub use naming::is_local_snapshot;
