//! HTTP request handlers for the agent server

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
};
use serde_json::json;
use std::sync::Arc;

use crate::operations::{backup, certs, etcd};
use crate::services::docker;
use crate::types::*;
use crate::AppState;

type HandlerResult = Result<ResponseJson<ApiResponse>, StatusCode>;

fn respond(result: anyhow::Result<String>) -> HandlerResult {
    match result {
        Ok(output) => Ok(ResponseJson(ApiResponse::success_with_output(output))),
        Err(e) => Ok(ResponseJson(ApiResponse::error(e.to_string()))),
    }
}

fn respond_job(result: Result<String, String>) -> HandlerResult {
    match result {
        Ok(job_id) => Ok(ResponseJson(ApiResponse::success_with_job(
            job_id,
            JobStatus::Running,
        ))),
        Err(err) => Ok(ResponseJson(ApiResponse::error(err))),
    }
}

pub async fn health(State(state): State<Arc<AppState>>) -> HandlerResult {
    let running = state.jobs.running().await;
    let mut response = ApiResponse::success_with_status("healthy".to_string());
    response.output = Some(
        json!({
            "running_job": running.as_ref().map(|j| j.job_id.as_str()),
            "snapshot_name": running.as_ref().map(|j| j.snapshot_name.as_str()),
        })
        .to_string(),
    );
    Ok(ResponseJson(response))
}

// === Container handlers ===

pub async fn stop_container(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ContainerRequest>,
) -> HandlerResult {
    let result = docker::stop_container(&state.settings.docker_bin, &request.container_name).await;
    respond(result.map(|_| format!("{} stopped", request.container_name)))
}

pub async fn start_container(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ContainerRequest>,
) -> HandlerResult {
    let result = docker::start_container(&state.settings.docker_bin, &request.container_name).await;
    respond(result.map(|_| format!("{} started", request.container_name)))
}

pub async fn remove_container(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ContainerRequest>,
) -> HandlerResult {
    let result = docker::remove_container(&state.settings.docker_bin, &request.container_name).await;
    respond(result.map(|_| format!("{} removed", request.container_name)))
}

// === Backup transfer handlers ===

pub async fn serve_backup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ServeBackupRequest>,
) -> HandlerResult {
    respond(backup::serve_backup(&state.settings, &request).await)
}

pub async fn download_backup_async(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DownloadBackupRequest>,
) -> HandlerResult {
    let settings = state.settings.clone();
    let snapshot_name = request.snapshot_name.clone();
    respond_job(
        state
            .spawn_job(EtcdJob::BackupDownload, &snapshot_name, move || async move {
                backup::download_from_backup_server(&settings, &request).await
            })
            .await,
    )
}

pub async fn download_backup_s3_async(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DownloadS3Request>,
) -> HandlerResult {
    let settings = state.settings.clone();
    let snapshot_name = request.snapshot_name.clone();
    respond_job(
        state
            .spawn_job(EtcdJob::BackupDownloadS3, &snapshot_name, move || async move {
                backup::download_from_s3(&settings, &request).await
            })
            .await,
    )
}

// === Snapshot handlers ===

pub async fn snapshot_checksum(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChecksumRequest>,
) -> HandlerResult {
    respond(etcd::snapshot_checksum(&state.settings, &request.snapshot_name).await)
}

pub async fn save_snapshot_async(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SnapshotRequest>,
) -> HandlerResult {
    let settings = state.settings.clone();
    let snapshot_name = request.snapshot_name.clone();
    respond_job(
        state
            .spawn_job(EtcdJob::SnapshotSave, &snapshot_name, move || async move {
                etcd::save_snapshot(&settings, &request).await
            })
            .await,
    )
}

pub async fn remove_snapshot(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SnapshotRequest>,
) -> HandlerResult {
    respond(etcd::remove_snapshot(&state.settings, &request).await)
}

pub async fn restore_snapshot_async(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RestoreRequest>,
) -> HandlerResult {
    let settings = state.settings.clone();
    let snapshot_name = request.snapshot_name.clone();
    respond_job(
        state
            .spawn_job(EtcdJob::SnapshotRestore, &snapshot_name, move || async move {
                etcd::restore_snapshot(&settings, &request).await
            })
            .await,
    )
}

// === Certificate handlers ===

pub async fn deploy_certificates(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CertificatesRequest>,
) -> HandlerResult {
    let result = certs::deploy_certificates(&state.settings.ssl_dir, &request.certificates).await;
    respond(result.map(|_| format!("{} certificates deployed", request.certificates.len())))
}

// === Job status handlers ===

pub async fn get_job_status(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> HandlerResult {
    let Some(info) = state.jobs.get(&job_id).await else {
        return Ok(ResponseJson(ApiResponse::error(format!(
            "Job {} not found",
            job_id
        ))));
    };

    let mut response = ApiResponse::success_with_job(info.job_id, info.status);
    match info.status {
        JobStatus::Completed => response.output = info.output,
        JobStatus::Failed => {
            response.success = false;
            response.error = info.error;
        }
        JobStatus::Running => {
            response.output = Some(format!(
                "{} of {} still running",
                info.job, info.snapshot_name
            ));
        }
    }
    Ok(ResponseJson(response))
}
