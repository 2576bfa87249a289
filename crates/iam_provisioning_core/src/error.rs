use thiserror::Error;

use crate::job::JobStage;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisioningError {
    #[error("failed to read parameter '{name}': {message}")]
    Configuration { name: String, message: String },

    #[error("{key} does not exist in bucket {bucket}")]
    ObjectNotFound { bucket: String, key: String },

    #[error("storage access failed: {0}")]
    StorageAccess(String),

    #[error("manifest row '{row}' must contain username, group and email")]
    MalformedRow { row: String },

    #[error("user '{username}' already exists")]
    DuplicateUser { username: String },

    #[error("user '{username}' did not become visible after {attempts} attempts")]
    ProvisioningTimeout { username: String, attempts: u32 },

    #[error("group '{group}' does not exist")]
    GroupNotFound { group: String },

    #[error("identity service call failed: {0}")]
    IdentityService(String),

    #[error("failed to send credential email to {to_address}: {message}")]
    EmailDelivery { to_address: String, message: String },

    #[error("failed to publish operator alert: {0}")]
    AlertPublish(String),

    #[error("invalid job transition from {from} to {to}")]
    InvalidTransition { from: JobStage, to: JobStage },
}

impl ProvisioningError {
    pub fn configuration(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration_error",
            Self::ObjectNotFound { .. } => "object_not_found_error",
            Self::StorageAccess(_) => "storage_access_error",
            Self::MalformedRow { .. } => "malformed_row_error",
            Self::DuplicateUser { .. } => "duplicate_user_error",
            Self::ProvisioningTimeout { .. } => "provisioning_timeout_error",
            Self::GroupNotFound { .. } => "group_not_found_error",
            Self::IdentityService(_) => "identity_service_error",
            Self::EmailDelivery { .. } => "email_delivery_error",
            Self::AlertPublish(_) => "alert_publish_error",
            Self::InvalidTransition { .. } => "invalid_transition_error",
        }
    }

    /// Whether the failure should be forwarded to the operator channel.
    ///
    /// Alert failures are only logged; reporting them through the same
    /// broken channel would mask the error that triggered the alert.
    pub fn is_alertable(&self) -> bool {
        !matches!(self, Self::AlertPublish(_))
    }
}
