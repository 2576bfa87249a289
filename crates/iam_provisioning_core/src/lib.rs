//! Shared account-provisioning domain primitives.
//!
//! This crate owns the deterministic parts of the bulk provisioning job:
//! manifest parsing, credential generation, message rendering, the error
//! taxonomy, and the job state machine. It intentionally excludes AWS SDK
//! and Lambda runtime concerns.

pub mod contract;
pub mod error;
pub mod job;
pub mod manifest;
pub mod password;
pub mod templates;
