//! Integration tests for the agent HTTP API
//!
//! The docker binary is replaced with `true`/`false` so container commands
//! succeed or fail without a container runtime.

use agent::settings::Settings;
use agent::{create_router, AppState};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

const API_KEY: &str = "test-api-key";

fn test_settings(root: &Path, docker_bin: &str) -> Settings {
    Settings {
        api_key: API_KEY.to_string(),
        bind_address: "127.0.0.1:0".to_string(),
        snapshot_dir: root.join("snapshots"),
        data_dir: root.join("data"),
        ssl_dir: root.join("ssl"),
        docker_bin: docker_bin.to_string(),
    }
}

fn router(root: &Path, docker_bin: &str) -> Router {
    create_router(Arc::new(AppState::new(test_settings(root, docker_bin))))
}

async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Authorization", format!("Bearer {}", API_KEY))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    read(router.clone().oneshot(request).await.unwrap()).await
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {}", API_KEY))
        .body(Body::empty())
        .unwrap();
    read(router.clone().oneshot(request).await.unwrap()).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn wait_for_job(router: &Router, job_id: &str) -> Value {
    for _ in 0..100 {
        let (_, body) = get(router, &format!("/operation/status/{}", job_id)).await;
        if body["job_status"] != "Running" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("job {} did not finish", job_id);
}

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let dir = TempDir::new().unwrap();
    let app = router(dir.path(), "true");

    let request = Request::builder()
        .method("POST")
        .uri("/container/stop")
        .header("Content-Type", "application/json")
        .body(Body::from(json!({ "container_name": "etcd" }).to_string()))
        .unwrap();
    let (status, body) = read(app.clone().oneshot(request).await.unwrap()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing API key");

    let request = Request::builder()
        .uri("/operation/status/anything")
        .header("Authorization", "Bearer wrong-key")
        .body(Body::empty())
        .unwrap();
    let (status, body) = read(app.oneshot(request).await.unwrap()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid API key");
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let dir = TempDir::new().unwrap();
    let app = router(dir.path(), "true");

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let (status, body) = read(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_container_commands_report_docker_failures() {
    let dir = TempDir::new().unwrap();

    let (_, body) = post(&router(dir.path(), "true"), "/container/stop", json!({ "container_name": "etcd" })).await;
    assert_eq!(body["success"], true);

    let (_, body) = post(&router(dir.path(), "false"), "/container/start", json!({ "container_name": "etcd" })).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Command failed"));
}

#[tokio::test]
async fn test_checksum_of_local_snapshot() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("snapshots")).unwrap();
    std::fs::write(dir.path().join("snapshots/c-demo-rl-1"), b"test").unwrap();
    let app = router(dir.path(), "true");

    let (_, body) = post(&app, "/snapshot/checksum", json!({ "snapshot_name": "c-demo-rl-1" })).await;
    assert_eq!(body["success"], true);
    assert_eq!(
        body["output"],
        "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
    );

    let (_, body) = post(&app, "/snapshot/checksum", json!({ "snapshot_name": "c-demo-rl-2" })).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_save_runs_as_job_until_completed() {
    let dir = TempDir::new().unwrap();
    let app = router(dir.path(), "true");

    let (_, body) = post(
        &app,
        "/snapshot/save",
        json!({ "image": "rke-tools:v0.1", "snapshot_name": "c-demo-ml-1", "s3": null }),
    )
    .await;
    assert_eq!(body["success"], true);
    assert_eq!(body["job_status"], "Running");

    let job_id = body["job_id"].as_str().unwrap().to_string();
    assert!(job_id.starts_with("snapshot_save-c-demo-ml-1-"));
    let status = wait_for_job(&app, &job_id).await;
    assert_eq!(status["job_status"], "Completed");
}

#[tokio::test]
async fn test_failed_download_job_reports_error() {
    let dir = TempDir::new().unwrap();
    let app = router(dir.path(), "false");

    let (_, body) = post(
        &app,
        "/backup/download",
        json!({
            "image": "rke-tools:v0.1",
            "snapshot_name": "c-demo-rl-1",
            "server_address": "10.0.0.1"
        }),
    )
    .await;
    let job_id = body["job_id"].as_str().unwrap().to_string();

    let status = wait_for_job(&app, &job_id).await;
    assert_eq!(status["job_status"], "Failed");
    assert_eq!(status["success"], false);
    assert!(status["error"].as_str().is_some());
}

#[tokio::test]
async fn test_restore_without_snapshot_file_fails() {
    let dir = TempDir::new().unwrap();
    let app = router(dir.path(), "true");

    let (_, body) = post(
        &app,
        "/snapshot/restore",
        json!({
            "image": "etcd:v3.5",
            "snapshot_name": "c-demo-rl-1",
            "initial_cluster": "etcd-a=https://10.0.0.1:2380",
            "hostname_override": "a",
            "internal_address": "10.0.0.1"
        }),
    )
    .await;
    let job_id = body["job_id"].as_str().unwrap().to_string();

    let status = wait_for_job(&app, &job_id).await;
    assert_eq!(status["job_status"], "Failed");
    assert!(status["error"].as_str().unwrap().contains("Snapshot file not found"));
}

#[tokio::test]
async fn test_unknown_job_is_reported() {
    let dir = TempDir::new().unwrap();
    let (_, body) = get(&router(dir.path(), "true"), "/operation/status/nope").await;

    assert_eq!(body["success"], false);
    assert!(body.get("job_status").is_none());
}

#[tokio::test]
async fn test_certificates_are_written_to_ssl_dir() {
    let dir = TempDir::new().unwrap();
    let app = router(dir.path(), "true");

    let (_, body) = post(
        &app,
        "/certificates/deploy",
        json!({
            "certificates": [
                { "name": "kube-ca", "certificate_pem": "ca", "key_pem": null },
                { "name": "kube-node", "certificate_pem": "node", "key_pem": "node-key" }
            ]
        }),
    )
    .await;

    assert_eq!(body["success"], true);
    assert_eq!(std::fs::read_to_string(dir.path().join("ssl/kube-ca.pem")).unwrap(), "ca");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("ssl/kube-node-key.pem")).unwrap(),
        "node-key"
    );
}
