//! Background etcd jobs on this host
//!
//! Every job reads or replaces the member's snapshot and data directories, so
//! at most one runs at a time. The registry doubles as the busy guard:
//! [`JobRegistry::begin`] refuses a new job while another is still running.

use chrono::Utc;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::types::{EtcdJob, JobInfo, JobStatus};

/// Jobs remembered for status polling, oldest evicted first
const JOBS_KEPT: usize = 32;

#[derive(Default)]
pub struct JobRegistry {
    jobs: RwLock<VecDeque<JobInfo>>,
    sequence: AtomicU64,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `job` for `snapshot_name` as running and return its id.
    ///
    /// Fails with a description of the running job when etcd is busy.
    pub async fn begin(&self, job: EtcdJob, snapshot_name: &str) -> Result<String, String> {
        let mut jobs = self.jobs.write().await;
        if let Some(running) = jobs.iter().find(|j| j.status == JobStatus::Running) {
            return Err(format!(
                "etcd is busy with {} of {} (job {})",
                running.job, running.snapshot_name, running.job_id
            ));
        }

        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let job_id = format!("{}-{}-{}", job, snapshot_name, sequence);
        jobs.push_back(JobInfo {
            job_id: job_id.clone(),
            job,
            snapshot_name: snapshot_name.to_string(),
            status: JobStatus::Running,
            started_at: Utc::now(),
            finished_at: None,
            output: None,
            error: None,
        });

        // The running job is always the newest entry, so only finished jobs are evicted
        let excess = jobs.len().saturating_sub(JOBS_KEPT);
        jobs.drain(..excess);

        info!("Started {} of snapshot {} as job {}", job, snapshot_name, job_id);
        Ok(job_id)
    }

    /// Record the outcome of a running job
    pub async fn finish(&self, job_id: &str, outcome: anyhow::Result<String>) {
        let mut jobs = self.jobs.write().await;
        let Some(info) = jobs.iter_mut().find(|j| j.job_id == job_id) else {
            warn!("Finished job {} is no longer tracked", job_id);
            return;
        };

        info.finished_at = Some(Utc::now());
        match outcome {
            Ok(output) => {
                info!("✓ Job {} completed", job_id);
                info.status = JobStatus::Completed;
                info.output = Some(output);
            }
            Err(e) => {
                warn!("Job {} failed: {}", job_id, e);
                info.status = JobStatus::Failed;
                info.error = Some(e.to_string());
            }
        }
    }

    pub async fn get(&self, job_id: &str) -> Option<JobInfo> {
        self.jobs
            .read()
            .await
            .iter()
            .find(|j| j.job_id == job_id)
            .cloned()
    }

    /// The job currently holding etcd, if any
    pub async fn running(&self) -> Option<JobInfo> {
        self.jobs
            .read()
            .await
            .iter()
            .find(|j| j.status == JobStatus::Running)
            .cloned()
    }
}
