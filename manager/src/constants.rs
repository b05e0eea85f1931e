//! Central repository for container names, certificate names and limits
//!
//! Values here mirror what the host agent expects on the other side of the
//! wire, so changing one usually means changing the agent as well.

use std::time::Duration;

/// Container names managed on every etcd host
pub mod containers {
    /// The etcd store-service container
    pub const ETCD: &str = "etcd";

    /// Container serving a snapshot file to the rest of the host set
    pub const ETCD_SERVE_BACKUP: &str = "etcd-serve-backup";
}

/// etcd network constants
pub mod etcd {
    /// Peer port used in the initial-membership descriptor
    pub const PEER_PORT: u16 = 2380;

    /// Prefix of each member name in the initial-membership descriptor
    pub const MEMBER_NAME_PREFIX: &str = "etcd-";
}

/// Certificate names used when restoring trust material
pub mod pki {
    /// Cluster CA certificate
    pub const CA_CERT_NAME: &str = "kube-ca";

    /// Per-node identity certificate
    pub const KUBE_NODE_CERT_NAME: &str = "kube-node";
}

/// Limits and constraints
pub mod limits {
    /// Number of concurrent workers distributing certificates
    pub const WORKER_THREADS: usize = 50;
}

/// HTTP client constants
pub mod http {
    use super::Duration;

    /// Timeout for establishing HTTP connections to agents
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default interval between polls of an agent job
    pub const JOB_POLL_INTERVAL_SECONDS: u64 = 10;
}

/// Default configuration values
pub mod defaults {
    /// Default manager listen address
    pub const HOST: &str = "0.0.0.0";

    /// Default manager listen port
    pub const PORT: u16 = 8095;

    /// Default port of the agent running on each etcd host
    pub const AGENT_PORT: u16 = 8745;

    /// Default directory holding PEM material
    pub const PKI_DIR: &str = "pki";
}
