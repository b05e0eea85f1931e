//! HTTP communication with the agents running on etcd hosts
//!
//! Each etcd host runs an agent on port 8745 that executes container,
//! snapshot and certificate operations locally. [`HttpAgentClient`] is the
//! [`crate::hosts::HostRuntime`] implementation backed by that agent.
//!
//! # Communication Pattern
//!
//! 1. Manager sends an operation request to the agent
//! 2. Agent returns a job ID for long-running operations
//! 3. Manager polls for completion status
//! 4. Operation completes or fails with the agent's error text
//!
//! Nothing is retried. A failed request or a failed status poll fails the
//! operation.

pub mod agent_client;

pub use agent_client::HttpAgentClient;
