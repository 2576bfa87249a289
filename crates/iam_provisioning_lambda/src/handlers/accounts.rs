use std::time::Instant;

use tracing::{debug, info};

use crate::adapters::identity::IdentityDirectory;
use crate::handlers::notifier::CredentialNotifier;
use crate::runtime::contract::WaiterConfig;
use crate::runtime::error::ProvisioningError;
use crate::runtime::manifest::ManifestRow;
use crate::runtime::password::generate_password;

pub struct AccountProvisioner<'a> {
    directory: &'a dyn IdentityDirectory,
    notifier: &'a CredentialNotifier<'a>,
    waiter: WaiterConfig,
    password_source: fn() -> String,
}

impl<'a> AccountProvisioner<'a> {
    pub fn new(
        directory: &'a dyn IdentityDirectory,
        notifier: &'a CredentialNotifier<'a>,
        waiter: WaiterConfig,
    ) -> Self {
        Self {
            directory,
            notifier,
            waiter,
            password_source: generate_password,
        }
    }

    pub fn with_password_source(mut self, password_source: fn() -> String) -> Self {
        self.password_source = password_source;
        self
    }

    /// Provisions every row in order and returns the created usernames.
    ///
    /// The first error aborts the batch. Users created before the failing
    /// row are left in place.
    pub fn provision_accounts(&self, rows: &[String]) -> Result<Vec<String>, ProvisioningError> {
        let started_at = Instant::now();
        let mut provisioned = Vec::with_capacity(rows.len());

        for raw in rows {
            let row = ManifestRow::parse(raw)?;
            self.provision_row(&row)?;
            provisioned.push(row.username);
        }

        info!(
            component = "account_provisioner",
            event = "batch_provisioned",
            users = provisioned.len(),
            duration_ms = started_at.elapsed().as_millis() as u64
        );
        Ok(provisioned)
    }

    fn provision_row(&self, row: &ManifestRow) -> Result<(), ProvisioningError> {
        let password = (self.password_source)();

        self.directory.create_user(&row.username)?;
        info!(
            component = "account_provisioner",
            event = "user_created",
            username = %row.username
        );

        wait_for_user(self.directory, &row.username, self.waiter)?;

        self.directory
            .create_login_profile(&row.username, &password, true)?;
        self.directory
            .add_user_to_group(&row.username, &row.group_name)?;
        info!(
            component = "account_provisioner",
            event = "user_added_to_group",
            username = %row.username,
            group = %row.group_name
        );

        self.notifier
            .send_credential_email(&row.username, &password, &row.email_address)
    }
}

/// Polls until the user is visible; checks once immediately, then after each
/// `waiter.delay`, for at most `waiter.max_attempts` checks.
pub fn wait_for_user(
    directory: &dyn IdentityDirectory,
    username: &str,
    waiter: WaiterConfig,
) -> Result<(), ProvisioningError> {
    for attempt in 1..=waiter.max_attempts {
        if directory.user_exists(username)? {
            debug!(
                component = "account_provisioner",
                event = "user_visible",
                username,
                attempt
            );
            return Ok(());
        }
        if attempt < waiter.max_attempts && !waiter.delay.is_zero() {
            std::thread::sleep(waiter.delay);
        }
    }

    Err(ProvisioningError::ProvisioningTimeout {
        username: username.to_string(),
        attempts: waiter.max_attempts,
    })
}
