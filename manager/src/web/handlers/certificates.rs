// Certificate restore endpoint

use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use tracing::info;

use super::common::{error_response, ApiResponse, ApiResult};
use crate::web::AppState;

pub async fn restore_certificates(State(state): State<AppState>) -> ApiResult<Value> {
    info!("Certificate restore requested for {}", state.config.cluster_name);
    state
        .recovery_service
        .restore_certificates()
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(json!({
        "cluster_name": state.config.cluster_name,
        "status": "deployed"
    }))))
}
