//! Capability traits for the external services the job talks to.
//!
//! Handlers depend only on these traits; `aws` holds the SDK-backed
//! implementations used by the Lambda binary.

pub mod alerts;
pub mod aws;
pub mod identity;
pub mod mailer;
pub mod object_store;
pub mod parameter_store;
