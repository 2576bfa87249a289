#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use iam_provisioning_lambda::adapters::alerts::{AccountIdentity, AlertPublisher};
use iam_provisioning_lambda::adapters::identity::IdentityDirectory;
use iam_provisioning_lambda::adapters::mailer::{Mailer, OutboundEmail};
use iam_provisioning_lambda::adapters::object_store::ManifestStore;
use iam_provisioning_lambda::adapters::parameter_store::ParameterStore;
use iam_provisioning_lambda::handlers::job::JobServices;
use iam_provisioning_lambda::runtime::error::ProvisioningError;
use iam_provisioning_lambda::settings::RuntimeSettings;

pub const BUCKET: &str = "manifest-bucket";
pub const OBJECT_KEY: &str = "users.csv";
pub const SOURCE_MAIL: &str = "ope@example.com";
pub const ACCOUNT_ID: &str = "123456789012";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedAlert {
    pub topic_arn: String,
    pub subject: String,
    pub message: String,
}

/// In-memory stand-in for every external service, recording each call in
/// order as `service:operation`.
pub struct FakeCloud {
    parameters: Mutex<HashMap<String, String>>,
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    users: Mutex<HashSet<String>>,
    groups: Mutex<HashSet<String>>,
    login_profiles: Mutex<HashMap<String, (String, bool)>>,
    memberships: Mutex<Vec<(String, String)>>,
    emails: Mutex<Vec<OutboundEmail>>,
    alerts: Mutex<Vec<PublishedAlert>>,
    calls: Mutex<Vec<String>>,
    fail_mail: Mutex<bool>,
    fail_alerts: Mutex<bool>,
    fail_delete: Mutex<bool>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self {
            parameters: Mutex::new(HashMap::new()),
            objects: Mutex::new(HashMap::new()),
            users: Mutex::new(HashSet::new()),
            groups: Mutex::new(HashSet::new()),
            login_profiles: Mutex::new(HashMap::new()),
            memberships: Mutex::new(Vec::new()),
            emails: Mutex::new(Vec::new()),
            alerts: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            fail_mail: Mutex::new(false),
            fail_alerts: Mutex::new(false),
            fail_delete: Mutex::new(false),
        }
    }

    /// All three parameters set, the manifest uploaded, and the given groups.
    pub fn with_manifest(manifest: &str, groups: &[&str]) -> Self {
        let cloud = Self::new();
        cloud.set_parameter("SRC_BUCKET_NAME", BUCKET);
        cloud.set_parameter("SRC_OBJECT_KEY_NAME", OBJECT_KEY);
        cloud.set_parameter("SRC_SNS_MAIL", SOURCE_MAIL);
        cloud.put_object(BUCKET, OBJECT_KEY, manifest.as_bytes());
        for group in groups {
            cloud.add_group(group);
        }
        cloud
    }

    pub fn services(&self) -> JobServices<'_> {
        JobServices {
            parameters: self,
            manifests: self,
            identities: self,
            mailer: self,
            alerts: self,
            account: self,
        }
    }

    pub fn set_parameter(&self, name: &str, value: &str) {
        self.parameters
            .lock()
            .expect("poisoned mutex")
            .insert(name.to_string(), value.to_string());
    }

    pub fn put_object(&self, bucket: &str, key: &str, body: &[u8]) {
        self.objects
            .lock()
            .expect("poisoned mutex")
            .insert((bucket.to_string(), key.to_string()), body.to_vec());
    }

    pub fn add_group(&self, group: &str) {
        self.groups
            .lock()
            .expect("poisoned mutex")
            .insert(group.to_string());
    }

    pub fn add_existing_user(&self, username: &str) {
        self.users
            .lock()
            .expect("poisoned mutex")
            .insert(username.to_string());
    }

    pub fn fail_mail(&self) {
        *self.fail_mail.lock().expect("poisoned mutex") = true;
    }

    pub fn fail_alerts(&self) {
        *self.fail_alerts.lock().expect("poisoned mutex") = true;
    }

    pub fn fail_delete(&self) {
        *self.fail_delete.lock().expect("poisoned mutex") = true;
    }

    pub fn object_exists(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .lock()
            .expect("poisoned mutex")
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    pub fn user_exists_now(&self, username: &str) -> bool {
        self.users.lock().expect("poisoned mutex").contains(username)
    }

    pub fn login_profile(&self, username: &str) -> Option<(String, bool)> {
        self.login_profiles
            .lock()
            .expect("poisoned mutex")
            .get(username)
            .cloned()
    }

    pub fn memberships(&self) -> Vec<(String, String)> {
        self.memberships.lock().expect("poisoned mutex").clone()
    }

    pub fn emails(&self) -> Vec<OutboundEmail> {
        self.emails.lock().expect("poisoned mutex").clone()
    }

    pub fn alerts(&self) -> Vec<PublishedAlert> {
        self.alerts.lock().expect("poisoned mutex").clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("poisoned mutex").clone()
    }

    pub fn calls_to(&self, service: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(&format!("{service}:")))
            .count()
    }

    fn record(&self, call: &str) {
        self.calls
            .lock()
            .expect("poisoned mutex")
            .push(call.to_string());
    }
}

impl ParameterStore for FakeCloud {
    fn get_parameter(&self, name: &str) -> Result<String, ProvisioningError> {
        self.record("ssm:get_parameter");
        self.parameters
            .lock()
            .expect("poisoned mutex")
            .get(name)
            .cloned()
            .ok_or_else(|| ProvisioningError::configuration(name, "ParameterNotFound"))
    }
}

impl ManifestStore for FakeCloud {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ProvisioningError> {
        self.record("s3:get_object");
        self.objects
            .lock()
            .expect("poisoned mutex")
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| ProvisioningError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), ProvisioningError> {
        self.record("s3:delete_object");
        if *self.fail_delete.lock().expect("poisoned mutex") {
            return Err(ProvisioningError::StorageAccess(
                "simulated AccessDenied".to_string(),
            ));
        }
        self.objects
            .lock()
            .expect("poisoned mutex")
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}

impl IdentityDirectory for FakeCloud {
    fn create_user(&self, username: &str) -> Result<(), ProvisioningError> {
        self.record("iam:create_user");
        if !self
            .users
            .lock()
            .expect("poisoned mutex")
            .insert(username.to_string())
        {
            return Err(ProvisioningError::DuplicateUser {
                username: username.to_string(),
            });
        }
        Ok(())
    }

    fn user_exists(&self, username: &str) -> Result<bool, ProvisioningError> {
        self.record("iam:get_user");
        Ok(self.user_exists_now(username))
    }

    fn create_login_profile(
        &self,
        username: &str,
        password: &str,
        password_reset_required: bool,
    ) -> Result<(), ProvisioningError> {
        self.record("iam:create_login_profile");
        self.login_profiles.lock().expect("poisoned mutex").insert(
            username.to_string(),
            (password.to_string(), password_reset_required),
        );
        Ok(())
    }

    fn add_user_to_group(&self, username: &str, group_name: &str) -> Result<(), ProvisioningError> {
        self.record("iam:add_user_to_group");
        if !self
            .groups
            .lock()
            .expect("poisoned mutex")
            .contains(group_name)
        {
            return Err(ProvisioningError::GroupNotFound {
                group: group_name.to_string(),
            });
        }
        self.memberships
            .lock()
            .expect("poisoned mutex")
            .push((username.to_string(), group_name.to_string()));
        Ok(())
    }
}

impl Mailer for FakeCloud {
    fn send_text_email(&self, email: &OutboundEmail) -> Result<(), ProvisioningError> {
        self.record("ses:send_email");
        if *self.fail_mail.lock().expect("poisoned mutex") {
            return Err(ProvisioningError::EmailDelivery {
                to_address: email.to_address.clone(),
                message: "MessageRejected: Email address is not verified".to_string(),
            });
        }
        self.emails
            .lock()
            .expect("poisoned mutex")
            .push(email.clone());
        Ok(())
    }
}

impl AlertPublisher for FakeCloud {
    fn publish(
        &self,
        topic_arn: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), ProvisioningError> {
        self.record("sns:publish");
        if *self.fail_alerts.lock().expect("poisoned mutex") {
            return Err(ProvisioningError::AlertPublish(
                "simulated AuthorizationError".to_string(),
            ));
        }
        self.alerts.lock().expect("poisoned mutex").push(PublishedAlert {
            topic_arn: topic_arn.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}

impl AccountIdentity for FakeCloud {
    fn account_id(&self) -> Result<String, ProvisioningError> {
        self.record("sts:get_caller_identity");
        Ok(ACCOUNT_ID.to_string())
    }
}

pub fn test_settings() -> RuntimeSettings {
    let mut settings =
        RuntimeSettings::from_lookup(|_| None).expect("default settings should load");
    settings.waiter.delay = Duration::ZERO;
    settings
}
