use crate::runtime::error::ProvisioningError;

pub trait AccountIdentity {
    fn account_id(&self) -> Result<String, ProvisioningError>;
}

pub trait AlertPublisher {
    /// Publishes a `json`-structured message; failures map to `AlertPublish`.
    fn publish(&self, topic_arn: &str, subject: &str, message: &str)
        -> Result<(), ProvisioningError>;
}
