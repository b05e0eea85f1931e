//! Error types for the recovery coordinator
//!
//! Orchestration entry points return [`RecoveryError`] so callers can tell a
//! consistency failure apart from a transfer failure, and can match the
//! distinguished user-facing messages.

use std::fmt;

/// Message returned when an object-store snapshot is restored on a cluster
/// without object-store configuration. Callers match on this text.
pub const BACKUP_PREPARE_ERROR: &str =
    "failed to prepare backup: restoring S3 backups with no cluster level S3 configuration is not supported";

/// Prefix of every restore failure
pub const RESTORE_ERROR_PREFIX: &str = "[etcd] Failed to restore etcd snapshot";

/// Main error type for recovery operations
#[derive(Debug)]
pub enum RecoveryError {
    /// A remote call against one host failed; the cause is reported verbatim
    HostOperation(anyhow::Error),

    /// No host could start the backup server
    BackupServerUnavailable(ErrorAggregate),

    /// Object-store snapshot requested without object-store configuration
    S3ConfigMissing,

    /// Neither the local nor the object-store path applied
    BackupNotPrepared,

    /// Snapshot checksums differ across hosts, or a host could not be read
    InconsistentSnapshots,

    /// Restoring the snapshot on a host failed
    RestoreFailed(anyhow::Error),

    /// One or more hosts failed to receive certificates
    CertificateDeploy(ErrorAggregate),

    /// Another recovery operation is still running
    Busy { operation: String },

    /// Configuration-related errors
    Config(ConfigError),
}

/// Configuration error variants
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to load configuration file
    LoadFailed { path: String, reason: String },

    /// Configuration parsing error
    ParseError { path: String, reason: String },

    /// Missing required configuration
    MissingRequired { field: String },
}

/// Ordered collection of per-host failures gathered from several workers.
///
/// Every failure is kept; only the message text identifies its origin.
#[derive(Debug, Default)]
pub struct ErrorAggregate {
    errors: Vec<anyhow::Error>,
}

impl ErrorAggregate {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn push(&mut self, error: anyhow::Error) {
        self.errors.push(error);
    }

    /// Append all errors from another aggregate, keeping their order
    pub fn merge(&mut self, other: ErrorAggregate) {
        self.errors.extend(other.errors);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[anyhow::Error] {
        &self.errors
    }

    /// `Ok(())` when nothing failed, the aggregate itself otherwise
    pub fn into_result(self) -> Result<(), ErrorAggregate> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<Vec<anyhow::Error>> for ErrorAggregate {
    fn from(errors: Vec<anyhow::Error>) -> Self {
        Self { errors }
    }
}

impl fmt::Display for ErrorAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", error)?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for RecoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryError::HostOperation(e) => write!(f, "{}", e),
            RecoveryError::BackupServerUnavailable(errors) => {
                write!(f, "failed to start backup server on all etcd nodes: {}", errors)
            }
            RecoveryError::S3ConfigMissing => write!(f, "{}", BACKUP_PREPARE_ERROR),
            RecoveryError::BackupNotPrepared => write!(f, "failed to prepare backup for restore"),
            RecoveryError::InconsistentSnapshots => write!(f, "etcd snapshots are not consistent"),
            RecoveryError::RestoreFailed(e) => write!(f, "{}: {}", RESTORE_ERROR_PREFIX, e),
            RecoveryError::CertificateDeploy(errors) => {
                write!(f, "failed to deploy restore certificates: {}", errors)
            }
            RecoveryError::Busy { operation } => {
                write!(f, "Cluster is currently busy with '{}'", operation)
            }
            RecoveryError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
            ConfigError::ParseError { path, reason } => {
                write!(f, "Failed to parse '{}': {}", path, reason)
            }
            ConfigError::MissingRequired { field } => {
                write!(f, "Missing required field: {}", field)
            }
        }
    }
}

impl std::error::Error for RecoveryError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for ErrorAggregate {}

impl From<ConfigError> for RecoveryError {
    fn from(err: ConfigError) -> Self {
        RecoveryError::Config(err)
    }
}
