pub mod accounts;
pub mod config;
pub mod job;
pub mod manifest;
pub mod notifier;
