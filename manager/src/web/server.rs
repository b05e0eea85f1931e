use crate::web::{handlers, AppState};
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub async fn start_web_server(state: AppState) -> Result<()> {
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // === SNAPSHOT ROUTES ===
        .route(
            "/api/snapshots/{snapshot_name}",
            post(handlers::save_snapshot).delete(handlers::remove_snapshot),
        )
        .route(
            "/api/snapshots/{snapshot_name}/restore",
            post(handlers::restore_snapshot),
        )
        // === CERTIFICATE ROUTES ===
        .route(
            "/api/certificates/restore",
            post(handlers::restore_certificates),
        )
        // === CLUSTER ROUTES ===
        .route("/api/hosts", get(handlers::get_hosts))
        .route(
            "/api/operations/status",
            get(handlers::get_operation_status),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
