// Common types and utilities for API handlers

use axum::{http::StatusCode, response::Json};
use chrono::Utc;
use serde::Serialize;

use crate::errors::RecoveryError;

// Helper type for API responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<()>>)>;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

pub fn status_for(error: &RecoveryError) -> StatusCode {
    match error {
        RecoveryError::Busy { .. } => StatusCode::CONFLICT,
        RecoveryError::S3ConfigMissing => StatusCode::BAD_REQUEST,
        RecoveryError::InconsistentSnapshots => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(error: RecoveryError) -> (StatusCode, Json<ApiResponse<()>>) {
    (status_for(&error), Json(ApiResponse::error(error.to_string())))
}
