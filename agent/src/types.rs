// File: agent/src/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// === REQUEST STRUCTURES ===

#[derive(Debug, Deserialize)]
pub struct ContainerRequest {
    pub container_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ServeBackupRequest {
    pub image: String,
    pub snapshot_name: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadBackupRequest {
    pub image: String,
    pub snapshot_name: String,
    pub server_address: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadS3Request {
    pub image: String,
    pub snapshot_name: String,
    pub s3: S3Settings,
}

#[derive(Debug, Deserialize)]
pub struct ChecksumRequest {
    pub snapshot_name: String,
}

/// Save and remove share one payload; `s3` is set when the cluster backs up to S3
#[derive(Debug, Deserialize)]
pub struct SnapshotRequest {
    pub image: String,
    pub snapshot_name: String,
    pub s3: Option<S3Settings>,
}

#[derive(Debug, Deserialize)]
pub struct RestoreRequest {
    pub image: String,
    pub snapshot_name: String,
    pub initial_cluster: String,
    pub hostname_override: String,
    pub internal_address: String,
}

#[derive(Debug, Deserialize)]
pub struct CertificatesRequest {
    pub certificates: Vec<Certificate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Certificate {
    pub name: String,
    pub certificate_pem: String,
    pub key_pem: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct S3Settings {
    pub endpoint: String,
    pub bucket_name: String,
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub folder: Option<String>,
    pub custom_ca: Option<String>,
}

// === RESPONSE STRUCTURES ===

#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_status: Option<String>,
}

impl ApiResponse {
    pub fn success() -> Self {
        Self {
            success: true,
            output: None,
            error: None,
            status: None,
            job_id: None,
            job_status: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            error: Some(message),
            ..Self::success()
        }
    }

    pub fn success_with_output(output: String) -> Self {
        Self {
            output: Some(output),
            ..Self::success()
        }
    }

    pub fn success_with_status(status: String) -> Self {
        Self {
            status: Some(status),
            ..Self::success()
        }
    }

    pub fn success_with_job(job_id: String, job_status: JobStatus) -> Self {
        Self {
            job_id: Some(job_id),
            job_status: Some(job_status.to_string()),
            ..Self::success()
        }
    }
}

// === JOB TRACKING ===

/// Long-running etcd operations executed as background jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EtcdJob {
    SnapshotSave,
    SnapshotRestore,
    BackupDownload,
    BackupDownloadS3,
}

impl EtcdJob {
    pub fn as_str(&self) -> &'static str {
        match self {
            EtcdJob::SnapshotSave => "snapshot_save",
            EtcdJob::SnapshotRestore => "snapshot_restore",
            EtcdJob::BackupDownload => "backup_download",
            EtcdJob::BackupDownloadS3 => "backup_download_s3",
        }
    }
}

impl std::fmt::Display for EtcdJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInfo {
    pub job_id: String,
    pub job: EtcdJob,
    pub snapshot_name: String,
    pub status: JobStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub output: Option<String>,
    pub error: Option<String>,
}
