//! HTTP request handlers for the Manager API.
//!
//! This module is organized by domain:
//! - `common` - Shared response types and error mapping
//! - `snapshots` - Snapshot save, remove and restore
//! - `certificates` - Restore certificate distribution
//! - `operations` - Host listing and operation tracking

pub mod certificates;
pub mod common;
pub mod operations;
pub mod snapshots;

pub use certificates::*;
pub use operations::*;
pub use snapshots::*;
