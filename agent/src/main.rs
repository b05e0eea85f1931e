// File: agent/src/main.rs
use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use agent::settings::Settings;
use agent::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("agent=info")),
        )
        .init();

    let settings = Settings::from_env();
    let bind_address = settings.bind_address.clone();

    info!(
        "Starting etcd recovery agent (snapshots: {}, data: {}, ssl: {})",
        settings.snapshot_dir.display(),
        settings.data_dir.display(),
        settings.ssl_dir.display()
    );

    let app = create_router(Arc::new(AppState::new(settings)));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Recovery agent listening on {}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
