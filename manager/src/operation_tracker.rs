//! Tracks the recovery operation currently running on each cluster
//!
//! Snapshot staging and restore assume a single writer: two concurrent
//! restores would race for the backup-server election and the etcd data dirs.
//! The tracker rejects a second operation while one is in flight.
//!
//! ```ignore
//! tracker.try_start_operation("c-abc12", "snapshot_restore").await?;
//! // perform operation...
//! tracker.finish_operation("c-abc12").await;
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::errors::RecoveryError;

#[derive(Debug, Clone, Serialize)]
pub struct ActiveOperation {
    pub operation_type: String,
    pub target_name: String,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OperationStatus {
    pub active_operations: HashMap<String, ActiveOperation>,
    pub total_active: usize,
}

#[derive(Default)]
pub struct OperationTracker {
    active_operations: Arc<RwLock<HashMap<String, ActiveOperation>>>, // target_name -> operation
}

impl OperationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operation on `target_name`, failing if one is already running
    #[instrument(skip(self), fields(target = %target_name, operation = %operation_type))]
    pub async fn try_start_operation(
        &self,
        target_name: &str,
        operation_type: &str,
    ) -> Result<(), RecoveryError> {
        let mut active = self.active_operations.write().await;

        if let Some(current_op) = active.get(target_name) {
            return Err(RecoveryError::Busy {
                operation: current_op.operation_type.clone(),
            });
        }

        active.insert(
            target_name.to_string(),
            ActiveOperation {
                operation_type: operation_type.to_string(),
                target_name: target_name.to_string(),
                started_at: Utc::now(),
            },
        );
        info!("Started operation '{}' on {}", operation_type, target_name);
        Ok(())
    }

    #[instrument(skip(self), fields(target = %target_name))]
    pub async fn finish_operation(&self, target_name: &str) {
        let mut active = self.active_operations.write().await;
        if let Some(op) = active.remove(target_name) {
            let duration = Utc::now().signed_duration_since(op.started_at);
            info!(
                "Finished operation '{}' on {} (took {}s)",
                op.operation_type,
                target_name,
                duration.num_seconds()
            );
        }
    }

    pub async fn get_operation_status(&self) -> OperationStatus {
        let active = self.active_operations.read().await;
        OperationStatus {
            active_operations: active.clone(),
            total_active: active.len(),
        }
    }

    pub async fn is_busy(&self, target_name: &str) -> bool {
        self.active_operations.read().await.contains_key(target_name)
    }
}
