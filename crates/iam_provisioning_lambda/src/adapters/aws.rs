//! AWS SDK implementations of the capability traits.
//!
//! The traits are synchronous; each call bridges onto the current Tokio
//! runtime with `block_in_place`, so these types must be used from a
//! multi-threaded runtime.

use std::future::Future;

use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_ses::types::{Body, Content, Destination, Message};

use crate::adapters::alerts::{AccountIdentity, AlertPublisher};
use crate::adapters::identity::IdentityDirectory;
use crate::adapters::mailer::{Mailer, OutboundEmail};
use crate::adapters::object_store::ManifestStore;
use crate::adapters::parameter_store::ParameterStore;
use crate::runtime::error::ProvisioningError;

const MAIL_CHARSET: &str = "UTF-8";
const SNS_MESSAGE_STRUCTURE: &str = "json";

fn block_on_sdk<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Every client the job needs, built from one shared SDK config.
#[derive(Clone)]
pub struct AwsServices {
    pub parameters: SsmParameterStore,
    pub manifests: S3ManifestStore,
    pub identities: IamDirectory,
    pub mailer: SesMailer,
    pub alerts: SnsAlertPublisher,
    pub account: StsAccountIdentity,
}

impl AwsServices {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            parameters: SsmParameterStore {
                client: aws_sdk_ssm::Client::new(config),
            },
            manifests: S3ManifestStore {
                client: aws_sdk_s3::Client::new(config),
            },
            identities: IamDirectory {
                client: aws_sdk_iam::Client::new(config),
            },
            mailer: SesMailer {
                client: aws_sdk_ses::Client::new(config),
            },
            alerts: SnsAlertPublisher {
                client: aws_sdk_sns::Client::new(config),
            },
            account: StsAccountIdentity {
                client: aws_sdk_sts::Client::new(config),
            },
        }
    }
}

#[derive(Clone)]
pub struct SsmParameterStore {
    client: aws_sdk_ssm::Client,
}

impl ParameterStore for SsmParameterStore {
    fn get_parameter(&self, name: &str) -> Result<String, ProvisioningError> {
        let client = self.client.clone();
        let parameter_name = name.to_string();

        block_on_sdk(async move {
            let output = client
                .get_parameter()
                .name(&parameter_name)
                .with_decryption(true)
                .send()
                .await
                .map_err(|error| {
                    ProvisioningError::configuration(
                        &parameter_name,
                        DisplayErrorContext(&error).to_string(),
                    )
                })?;

            output
                .parameter()
                .and_then(|parameter| parameter.value())
                .map(str::to_string)
                .ok_or_else(|| {
                    ProvisioningError::configuration(&parameter_name, "parameter has no value")
                })
        })
    }
}

#[derive(Clone)]
pub struct S3ManifestStore {
    client: aws_sdk_s3::Client,
}

impl ManifestStore for S3ManifestStore {
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ProvisioningError> {
        let client = self.client.clone();
        let bucket = bucket.to_string();
        let object_key = key.to_string();

        block_on_sdk(async move {
            let output = client
                .get_object()
                .bucket(&bucket)
                .key(&object_key)
                .send()
                .await
                .map_err(|error| {
                    if error
                        .as_service_error()
                        .is_some_and(|service_error| service_error.is_no_such_key())
                    {
                        ProvisioningError::ObjectNotFound {
                            bucket: bucket.clone(),
                            key: object_key.clone(),
                        }
                    } else {
                        ProvisioningError::StorageAccess(format!(
                            "failed to get object {bucket}/{object_key}: {}",
                            DisplayErrorContext(&error)
                        ))
                    }
                })?;

            let body = output.body.collect().await.map_err(|error| {
                ProvisioningError::StorageAccess(format!(
                    "failed to read object {bucket}/{object_key}: {error}"
                ))
            })?;
            Ok(body.into_bytes().to_vec())
        })
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), ProvisioningError> {
        let client = self.client.clone();
        let bucket = bucket.to_string();
        let object_key = key.to_string();

        block_on_sdk(async move {
            client
                .delete_object()
                .bucket(&bucket)
                .key(&object_key)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| {
                    ProvisioningError::StorageAccess(format!(
                        "failed to delete object {bucket}/{object_key}: {}",
                        DisplayErrorContext(&error)
                    ))
                })
        })
    }
}

#[derive(Clone)]
pub struct IamDirectory {
    client: aws_sdk_iam::Client,
}

impl IdentityDirectory for IamDirectory {
    fn create_user(&self, username: &str) -> Result<(), ProvisioningError> {
        let client = self.client.clone();
        let username = username.to_string();

        block_on_sdk(async move {
            client
                .create_user()
                .user_name(&username)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| {
                    if error
                        .as_service_error()
                        .is_some_and(|service_error| service_error.is_entity_already_exists_exception())
                    {
                        ProvisioningError::DuplicateUser {
                            username: username.clone(),
                        }
                    } else {
                        ProvisioningError::IdentityService(format!(
                            "failed to create user {username}: {}",
                            DisplayErrorContext(&error)
                        ))
                    }
                })
        })
    }

    fn user_exists(&self, username: &str) -> Result<bool, ProvisioningError> {
        let client = self.client.clone();
        let username = username.to_string();

        block_on_sdk(async move {
            match client.get_user().user_name(&username).send().await {
                Ok(_) => Ok(true),
                Err(error)
                    if error
                        .as_service_error()
                        .is_some_and(|service_error| service_error.is_no_such_entity_exception()) =>
                {
                    Ok(false)
                }
                Err(error) => Err(ProvisioningError::IdentityService(format!(
                    "failed to look up user {username}: {}",
                    DisplayErrorContext(&error)
                ))),
            }
        })
    }

    fn create_login_profile(
        &self,
        username: &str,
        password: &str,
        password_reset_required: bool,
    ) -> Result<(), ProvisioningError> {
        let client = self.client.clone();
        let username = username.to_string();
        let password = password.to_string();

        block_on_sdk(async move {
            client
                .create_login_profile()
                .user_name(&username)
                .password(password)
                .password_reset_required(password_reset_required)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| {
                    ProvisioningError::IdentityService(format!(
                        "failed to create login profile for {username}: {}",
                        DisplayErrorContext(&error)
                    ))
                })
        })
    }

    fn add_user_to_group(&self, username: &str, group_name: &str) -> Result<(), ProvisioningError> {
        let client = self.client.clone();
        let username = username.to_string();
        let group_name = group_name.to_string();

        block_on_sdk(async move {
            client
                .add_user_to_group()
                .group_name(&group_name)
                .user_name(&username)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| {
                    if error
                        .as_service_error()
                        .is_some_and(|service_error| service_error.is_no_such_entity_exception())
                    {
                        ProvisioningError::GroupNotFound {
                            group: group_name.clone(),
                        }
                    } else {
                        ProvisioningError::IdentityService(format!(
                            "failed to add {username} to group {group_name}: {}",
                            DisplayErrorContext(&error)
                        ))
                    }
                })
        })
    }
}

#[derive(Clone)]
pub struct SesMailer {
    client: aws_sdk_ses::Client,
}

impl SesMailer {
    fn build_message(email: &OutboundEmail) -> Result<Message, String> {
        let subject = Content::builder()
            .charset(MAIL_CHARSET)
            .data(&email.subject)
            .build()
            .map_err(|error| format!("invalid subject: {error}"))?;
        let text = Content::builder()
            .charset(MAIL_CHARSET)
            .data(&email.body)
            .build()
            .map_err(|error| format!("invalid body: {error}"))?;

        Ok(Message::builder()
            .subject(subject)
            .body(Body::builder().text(text).build())
            .build())
    }
}

impl Mailer for SesMailer {
    fn send_text_email(&self, email: &OutboundEmail) -> Result<(), ProvisioningError> {
        let delivery_error = |message: String| ProvisioningError::EmailDelivery {
            to_address: email.to_address.clone(),
            message,
        };

        let message = Self::build_message(email).map_err(delivery_error)?;
        let destination = Destination::builder()
            .to_addresses(&email.to_address)
            .build();
        let client = self.client.clone();
        let source = email.source.clone();

        block_on_sdk(async move {
            client
                .send_email()
                .destination(destination)
                .message(message)
                .source(source)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| DisplayErrorContext(&error).to_string())
        })
        .map_err(delivery_error)
    }
}

#[derive(Clone)]
pub struct SnsAlertPublisher {
    client: aws_sdk_sns::Client,
}

impl AlertPublisher for SnsAlertPublisher {
    fn publish(
        &self,
        topic_arn: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), ProvisioningError> {
        let client = self.client.clone();
        let topic_arn = topic_arn.to_string();
        let subject = subject.to_string();
        let message = message.to_string();

        block_on_sdk(async move {
            client
                .publish()
                .topic_arn(&topic_arn)
                .subject(subject)
                .message(message)
                .message_structure(SNS_MESSAGE_STRUCTURE)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| {
                    ProvisioningError::AlertPublish(format!(
                        "failed to publish to {topic_arn}: {}",
                        DisplayErrorContext(&error)
                    ))
                })
        })
    }
}

#[derive(Clone)]
pub struct StsAccountIdentity {
    client: aws_sdk_sts::Client,
}

impl AccountIdentity for StsAccountIdentity {
    fn account_id(&self) -> Result<String, ProvisioningError> {
        let client = self.client.clone();

        block_on_sdk(async move {
            let output = client.get_caller_identity().send().await.map_err(|error| {
                ProvisioningError::AlertPublish(format!(
                    "failed to resolve caller account: {}",
                    DisplayErrorContext(&error)
                ))
            })?;

            output.account().map(str::to_string).ok_or_else(|| {
                ProvisioningError::AlertPublish("caller identity has no account id".to_string())
            })
        })
    }
}
