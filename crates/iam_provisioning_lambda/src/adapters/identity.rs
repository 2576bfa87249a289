use crate::runtime::error::ProvisioningError;

pub trait IdentityDirectory {
    /// Fails with `DuplicateUser` when the name is taken.
    fn create_user(&self, username: &str) -> Result<(), ProvisioningError>;
    fn user_exists(&self, username: &str) -> Result<bool, ProvisioningError>;
    fn create_login_profile(
        &self,
        username: &str,
        password: &str,
        password_reset_required: bool,
    ) -> Result<(), ProvisioningError>;
    /// Fails with `GroupNotFound` when the group is missing.
    fn add_user_to_group(&self, username: &str, group_name: &str) -> Result<(), ProvisioningError>;
}
