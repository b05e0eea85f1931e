pub mod handlers;
pub mod server;

pub use server::{create_router, start_web_server};

use std::sync::Arc;

use crate::config::Config;
use crate::services::RecoveryService;

// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub recovery_service: Arc<RecoveryService>,
}

impl AppState {
    pub fn new(config: Arc<Config>, recovery_service: Arc<RecoveryService>) -> Self {
        Self {
            config,
            recovery_service,
        }
    }
}
