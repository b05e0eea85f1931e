//! This module provides reusable test utilities:
//! - In-memory host runtimes that record every remote call
//! - A mock HTTP agent server
//! - Test configuration builders
//! - Common test data

// Allow unused code in test fixtures - not every test binary uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_agent;
pub mod mock_host;
pub mod test_config;
pub mod test_data;

// Re-export commonly used items
pub use mock_agent::MockAgentServer;
pub use mock_host::{mock_hosts, MockHostRuntime, Op};
pub use test_config::TestConfigBuilder;
pub use test_data::*;
