//! Host-side agent for etcd snapshot recovery
//!
//! Runs next to etcd on every cluster member and executes the container and
//! file operations the recovery manager requests over HTTP. Long operations
//! (save, restore, downloads) run as background jobs polled through
//! `/operation/status/{job_id}`.

pub mod handlers;
pub mod middleware;
pub mod operations;
pub mod services;
pub mod settings;
pub mod types;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::sync::Arc;

use services::jobs::JobRegistry;
use settings::Settings;
use types::EtcdJob;

pub struct AppState {
    pub settings: Arc<Settings>,
    pub jobs: JobRegistry,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            jobs: JobRegistry::new(),
        }
    }

    /// Run `operation` as a background job on `snapshot_name` and return the job id
    /// right away.
    ///
    /// Fails without starting anything while another etcd job is running.
    pub async fn spawn_job<F, Fut>(
        self: &Arc<Self>,
        job: EtcdJob,
        snapshot_name: &str,
        operation: F,
    ) -> Result<String, String>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        let job_id = self.jobs.begin(job, snapshot_name).await?;

        let state = Arc::clone(self);
        let spawned_job_id = job_id.clone();
        tokio::spawn(async move {
            let outcome = operation().await;
            state.jobs.finish(&spawned_job_id, outcome).await;
        });

        Ok(job_id)
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        // === CONTAINER ROUTES ===
        .route("/container/stop", post(handlers::stop_container))
        .route("/container/start", post(handlers::start_container))
        .route("/container/remove", post(handlers::remove_container))
        // === BACKUP TRANSFER ROUTES ===
        .route("/backup/serve", post(handlers::serve_backup))
        .route("/backup/download", post(handlers::download_backup_async))
        .route("/backup/download-s3", post(handlers::download_backup_s3_async))
        // === SNAPSHOT ROUTES ===
        .route("/snapshot/checksum", post(handlers::snapshot_checksum))
        .route("/snapshot/save", post(handlers::save_snapshot_async))
        .route("/snapshot/remove", post(handlers::remove_snapshot))
        .route("/snapshot/restore", post(handlers::restore_snapshot_async))
        // === CERTIFICATE ROUTES ===
        .route("/certificates/deploy", post(handlers::deploy_certificates))
        // === JOB ROUTES ===
        .route("/operation/status/{job_id}", get(handlers::get_job_status))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_api_key));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(protected)
        .with_state(state)
}
