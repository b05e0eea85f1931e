//! API key check for the agent's protected routes
//!
//! Applied with `route_layer` to everything except `/health`. Requests must
//! carry `Authorization: Bearer <AGENT_API_KEY>`.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::warn;

use crate::types::ApiResponse;
use crate::AppState;

pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(key) if key == state.settings.api_key => next.run(request).await,
        Some(_) => {
            warn!("Rejected {} with invalid API key", request.uri().path());
            unauthorized("Invalid API key")
        }
        None => unauthorized("Missing API key"),
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::error(message.to_string())),
    )
        .into_response()
}
