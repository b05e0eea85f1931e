pub mod checksum;
pub mod commands;
pub mod docker;
pub mod jobs;
