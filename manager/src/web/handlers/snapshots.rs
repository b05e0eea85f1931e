// Snapshot management endpoints

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};
use tracing::info;

use super::common::{error_response, ApiResponse, ApiResult};
use crate::web::AppState;

/// Save a snapshot on every etcd host
pub async fn save_snapshot(
    Path(snapshot_name): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Value> {
    info!("Snapshot save requested: {}", snapshot_name);
    state
        .recovery_service
        .save_snapshot(&snapshot_name)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(json!({
        "snapshot_name": snapshot_name,
        "status": "saved"
    }))))
}

/// Remove a snapshot from every etcd host
pub async fn remove_snapshot(
    Path(snapshot_name): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Value> {
    info!("Snapshot removal requested: {}", snapshot_name);
    state
        .recovery_service
        .remove_snapshot(&snapshot_name)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(json!({
        "snapshot_name": snapshot_name,
        "status": "removed"
    }))))
}

/// Stage, verify and restore a snapshot across the cluster
pub async fn restore_snapshot(
    Path(snapshot_name): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Value> {
    info!("Snapshot restore requested: {}", snapshot_name);
    state
        .recovery_service
        .restore_from_snapshot(&snapshot_name)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(json!({
        "snapshot_name": snapshot_name,
        "status": "restored"
    }))))
}
