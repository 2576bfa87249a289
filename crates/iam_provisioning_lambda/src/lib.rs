//! AWS-oriented adapters and handlers for the bulk account-provisioning job.
//!
//! This crate owns runtime integration details (Lambda entry point, AWS SDK
//! clients, environment settings) and exposes a single runtime module
//! boundary for the contract, manifest, password, and template primitives.

pub mod adapters;
pub mod handlers;
pub mod runtime;
pub mod settings;
