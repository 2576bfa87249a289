use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::adapters::alerts::{AccountIdentity, AlertPublisher};
use crate::adapters::mailer::{Mailer, OutboundEmail};
use crate::runtime::contract::{alert_topic_arn, CREDENTIAL_MAIL_SUBJECT};
use crate::runtime::error::ProvisioningError;
use crate::runtime::templates::{
    alert_message_json, render_alert_body, render_credential_mail, MessageTemplate,
};
use crate::settings::RuntimeSettings;

/// Sends each new user their temporary credential.
pub struct CredentialNotifier<'a> {
    mailer: &'a dyn Mailer,
    template: &'a MessageTemplate,
    source_mail: &'a str,
}

impl<'a> CredentialNotifier<'a> {
    pub fn new(mailer: &'a dyn Mailer, template: &'a MessageTemplate, source_mail: &'a str) -> Self {
        Self {
            mailer,
            template,
            source_mail,
        }
    }

    pub fn send_credential_email(
        &self,
        username: &str,
        password: &str,
        to_address: &str,
    ) -> Result<(), ProvisioningError> {
        let email = OutboundEmail {
            source: self.source_mail.to_string(),
            to_address: to_address.to_string(),
            subject: CREDENTIAL_MAIL_SUBJECT.to_string(),
            body: render_credential_mail(self.template, username, password),
        };
        self.mailer.send_text_email(&email)?;

        info!(
            component = "notifier",
            event = "credential_email_sent",
            username,
            to_address
        );
        Ok(())
    }
}

/// Best-effort operator alerts on the operations topic.
pub struct OperatorAlerts<'a> {
    publisher: &'a dyn AlertPublisher,
    account: &'a dyn AccountIdentity,
    settings: &'a RuntimeSettings,
    clock: fn() -> DateTime<Utc>,
}

impl<'a> OperatorAlerts<'a> {
    pub fn new(
        publisher: &'a dyn AlertPublisher,
        account: &'a dyn AccountIdentity,
        settings: &'a RuntimeSettings,
    ) -> Self {
        Self {
            publisher,
            account,
            settings,
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Publishes the alert; a publish failure is logged and dropped.
    pub fn send_operator_alert(&self, error_message: &str) {
        if let Err(publish_error) = self.try_send_operator_alert(error_message) {
            error!(
                component = "notifier",
                event = "operator_alert_failed",
                error_kind = publish_error.kind(),
                error = %publish_error,
                original_error = error_message
            );
        }
    }

    pub fn try_send_operator_alert(&self, error_message: &str) -> Result<(), ProvisioningError> {
        let account_id = self.account.account_id()?;
        let topic_arn = alert_topic_arn(
            &self.settings.partition,
            &self.settings.region,
            &account_id,
            &self.settings.alert_topic_name,
        );
        let body = render_alert_body(
            &self.settings.error_mail_template,
            error_message,
            (self.clock)(),
            self.settings.alert_utc_offset,
        );

        self.publisher.publish(
            &topic_arn,
            &self.settings.alert_subject,
            &alert_message_json(&body),
        )?;

        info!(
            component = "notifier",
            event = "operator_alert_published",
            topic_arn = %topic_arn
        );
        Ok(())
    }
}
