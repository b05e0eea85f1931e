// Host listing and operation tracking endpoints

use axum::{extract::State, response::Json};

use super::common::{ApiResponse, ApiResult};
use crate::operation_tracker::OperationStatus;
use crate::services::recovery_service::HostSummary;
use crate::web::AppState;

pub async fn get_hosts(State(state): State<AppState>) -> ApiResult<Vec<HostSummary>> {
    Ok(Json(ApiResponse::success(state.recovery_service.hosts())))
}

pub async fn get_operation_status(State(state): State<AppState>) -> ApiResult<OperationStatus> {
    let status = state
        .recovery_service
        .operation_tracker()
        .get_operation_status()
        .await;
    Ok(Json(ApiResponse::success(status)))
}
