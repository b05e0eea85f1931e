use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use crate::config::{EtcdServiceConfig, HostConfig, S3BackupConfig};
use crate::constants::http::CONNECT_TIMEOUT;
use crate::hosts::HostRuntime;
use crate::pki::CertificatePki;

/// Agent client for one etcd host
pub struct HttpAgentClient {
    client: Client,
    base_url: String,
    api_key: String,
    host_address: String,
    internal_address: String,
    hostname_override: String,
    poll_interval: Duration,
}

impl HttpAgentClient {
    pub fn new(host: &HostConfig, poll_interval: Duration) -> Result<Self> {
        // No request timeout - snapshot operations run as long as they need
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: format!("http://{}:{}", host.address, host.agent_port),
            api_key: host.api_key.clone(),
            host_address: host.address.clone(),
            internal_address: host.internal_address().to_string(),
            hostname_override: host.hostname_override().to_string(),
            poll_interval,
        })
    }

    /// Point the client at a different agent URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Operations the agent runs as background jobs
    fn is_long_running_operation(endpoint: &str) -> bool {
        matches!(
            endpoint,
            "/snapshot/save" | "/snapshot/restore" | "/backup/download" | "/backup/download-s3"
        )
    }

    async fn execute_operation(&self, endpoint: &str, payload: Value) -> Result<Value> {
        let agent_url = format!("{}{}", self.base_url, endpoint);
        debug!("Starting operation on [{}]: {}", self.host_address, endpoint);

        let response = self
            .client
            .post(&agent_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request {} failed on host [{}]: {}", endpoint, self.host_address, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Operation {} failed on host [{}] with status {}: {}",
                endpoint,
                self.host_address,
                status,
                error_text
            ));
        }

        let result: Value = response.json().await.map_err(|e| {
            anyhow!("Failed to parse response from host [{}]: {}", self.host_address, e)
        })?;

        if !result.get("success").and_then(|v| v.as_bool()).unwrap_or(false) {
            let error_msg = result
                .get("error")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown error");
            return Err(anyhow!(
                "Operation {} failed on host [{}]: {}",
                endpoint,
                self.host_address,
                error_msg
            ));
        }

        if Self::is_long_running_operation(endpoint) {
            if let Some(job_id) = result.get("job_id").and_then(|v| v.as_str()) {
                info!("Long operation {} started with job_id {} on [{}]", endpoint, job_id, self.host_address);
                return self.poll_for_completion(job_id).await;
            }
            warn!(
                "Long operation endpoint {} did not return job_id, treating as synchronous",
                endpoint
            );
        }

        Ok(result)
    }

    /// Poll the agent until the job completes or fails
    async fn poll_for_completion(&self, job_id: &str) -> Result<Value> {
        let status_url = format!("{}/operation/status/{}", self.base_url, job_id);

        loop {
            sleep(self.poll_interval).await;

            let response = self
                .client
                .get(&status_url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .send()
                .await
                .map_err(|e| {
                    anyhow!("Failed to poll job {} on host [{}]: {}", job_id, self.host_address, e)
                })?;

            if !response.status().is_success() {
                return Err(anyhow!(
                    "Status check for job {} on host [{}] failed with status {}",
                    job_id,
                    self.host_address,
                    response.status()
                ));
            }

            let status_result: Value = response.json().await.map_err(|e| {
                anyhow!("Failed to parse status of job {} on host [{}]: {}", job_id, self.host_address, e)
            })?;

            let job_status = status_result
                .get("job_status")
                .and_then(|v| v.as_str())
                .unwrap_or("");

            match job_status {
                "Completed" => {
                    info!("Job {} completed on [{}]", job_id, self.host_address);
                    return Ok(status_result);
                }
                "Running" => {
                    debug!("Job {} still running on [{}]", job_id, self.host_address);
                }
                _ => {
                    let error_msg = status_result
                        .get("error")
                        .and_then(|v| v.as_str())
                        .unwrap_or("Job failed with unknown error");
                    return Err(anyhow!(
                        "Job {} failed on host [{}]: {}",
                        job_id,
                        self.host_address,
                        error_msg
                    ));
                }
            }
        }
    }
}

#[async_trait]
impl HostRuntime for HttpAgentClient {
    async fn stop_container(&self, container_name: &str) -> Result<()> {
        self.execute_operation("/container/stop", json!({ "container_name": container_name }))
            .await?;
        Ok(())
    }

    async fn start_container(&self, container_name: &str) -> Result<()> {
        self.execute_operation("/container/start", json!({ "container_name": container_name }))
            .await?;
        Ok(())
    }

    async fn remove_container(&self, container_name: &str) -> Result<()> {
        self.execute_operation("/container/remove", json!({ "container_name": container_name }))
            .await?;
        Ok(())
    }

    async fn start_backup_server(&self, image: &str, snapshot_name: &str) -> Result<()> {
        let payload = json!({ "image": image, "snapshot_name": snapshot_name });
        self.execute_operation("/backup/serve", payload).await?;
        Ok(())
    }

    async fn download_snapshot_from_backup_server(
        &self,
        image: &str,
        snapshot_name: &str,
        server_address: &str,
    ) -> Result<()> {
        let payload = json!({
            "image": image,
            "snapshot_name": snapshot_name,
            "server_address": server_address
        });
        self.execute_operation("/backup/download", payload).await?;
        Ok(())
    }

    async fn download_snapshot_from_s3(
        &self,
        image: &str,
        snapshot_name: &str,
        s3: &S3BackupConfig,
    ) -> Result<()> {
        let payload = json!({ "image": image, "snapshot_name": snapshot_name, "s3": s3 });
        self.execute_operation("/backup/download-s3", payload).await?;
        Ok(())
    }

    async fn snapshot_checksum(&self, snapshot_name: &str) -> Result<String> {
        let result = self
            .execute_operation("/snapshot/checksum", json!({ "snapshot_name": snapshot_name }))
            .await?;

        result
            .get("output")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("Host [{}] returned no checksum", self.host_address))
    }

    async fn save_snapshot(
        &self,
        image: &str,
        snapshot_name: &str,
        etcd: &EtcdServiceConfig,
    ) -> Result<()> {
        let payload = json!({
            "image": image,
            "snapshot_name": snapshot_name,
            "s3": etcd.s3_backup_config()
        });
        self.execute_operation("/snapshot/save", payload).await?;
        Ok(())
    }

    async fn remove_snapshot(
        &self,
        image: &str,
        snapshot_name: &str,
        etcd: &EtcdServiceConfig,
    ) -> Result<()> {
        let payload = json!({
            "image": image,
            "snapshot_name": snapshot_name,
            "s3": etcd.s3_backup_config()
        });
        self.execute_operation("/snapshot/remove", payload).await?;
        Ok(())
    }

    async fn restore_snapshot(
        &self,
        image: &str,
        snapshot_name: &str,
        initial_cluster: &str,
    ) -> Result<()> {
        let payload = json!({
            "image": image,
            "snapshot_name": snapshot_name,
            "initial_cluster": initial_cluster,
            "hostname_override": self.hostname_override,
            "internal_address": self.internal_address
        });
        self.execute_operation("/snapshot/restore", payload).await?;
        Ok(())
    }

    async fn deploy_certificates(&self, certificates: &[CertificatePki]) -> Result<()> {
        self.execute_operation("/certificates/deploy", json!({ "certificates": certificates }))
            .await?;
        Ok(())
    }
}
