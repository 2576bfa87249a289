pub use iam_provisioning_core::{contract, error, job, manifest, password, templates};
