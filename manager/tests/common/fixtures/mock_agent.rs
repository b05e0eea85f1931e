//! Mock HTTP agent server for testing
//!
//! This provides a fake agent that responds to the agent API endpoints
//! without requiring a real agent running on an etcd host.

use serde_json::json;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_API_KEY: &str = "test-api-key";

/// Mock agent server that simulates agent HTTP responses
pub struct MockAgentServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockAgentServer {
    /// Create a new mock agent server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    /// Mock a synchronous endpoint that succeeds
    pub async fn mock_success(&self, endpoint: &str) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .and(header("Authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "output": "ok"
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a long-running endpoint that starts job `job_id`
    pub async fn mock_job_started(&self, endpoint: &str, job_id: &str) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "job_id": job_id,
                "job_status": "Running"
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock the checksum endpoint
    pub async fn mock_checksum(&self, checksum: &str) {
        Mock::given(method("POST"))
            .and(path("/snapshot/checksum"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "output": format!("{}\n", checksum)
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock job status as completed
    pub async fn mock_job_completed(&self, job_id: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/operation/status/{}", job_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "job_id": job_id,
                "job_status": "Completed",
                "output": "done"
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock job status as running for the first `times` polls
    pub async fn mock_job_running(&self, job_id: &str, times: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/operation/status/{}", job_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "job_id": job_id,
                "job_status": "Running"
            })))
            .up_to_n_times(times)
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Mock job status as failed
    pub async fn mock_job_failed(&self, job_id: &str, error: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/operation/status/{}", job_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "job_id": job_id,
                "job_status": "Failed",
                "error": error
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock agent error response
    pub async fn mock_error(&self, endpoint: &str, status_code: u16, error_msg: &str) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(json!({
                "success": false,
                "error": error_msg
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock an endpoint that answers 200 but reports failure in the body
    pub async fn mock_reported_failure(&self, endpoint: &str, error_msg: &str) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": error_msg
            })))
            .mount(&self.server)
            .await;
    }

    /// Number of requests the server received for `endpoint`
    pub async fn request_count(&self, endpoint: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == endpoint)
            .count()
    }

    /// JSON bodies received for `endpoint`
    pub async fn request_bodies(&self, endpoint: &str) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == endpoint)
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }
}
