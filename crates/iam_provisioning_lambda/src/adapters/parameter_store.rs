use crate::runtime::error::ProvisioningError;

pub trait ParameterStore {
    /// Returns the decrypted value, or `ProvisioningError::Configuration`.
    fn get_parameter(&self, name: &str) -> Result<String, ProvisioningError>;
}
