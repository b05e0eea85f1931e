
pub mod recovery_service;

pub use recovery_service::RecoveryService;
