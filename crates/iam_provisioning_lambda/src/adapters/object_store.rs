use crate::runtime::error::ProvisioningError;

pub trait ManifestStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ProvisioningError>;
    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), ProvisioningError>;
}
