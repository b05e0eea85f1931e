pub mod config;
pub mod constants;
pub mod errors;
pub mod hosts;
pub mod http;
pub mod operation_tracker;
pub mod pki;
pub mod services;
pub mod snapshot;
pub mod web;

// Re-export commonly used types
pub use config::{Config, ConfigManager, EtcdServiceConfig};
pub use errors::{ErrorAggregate, RecoveryError};
pub use hosts::{Host, HostRuntime};
pub use http::HttpAgentClient;
pub use operation_tracker::OperationTracker;
pub use services::RecoveryService;
pub use snapshot::SnapshotManager;
