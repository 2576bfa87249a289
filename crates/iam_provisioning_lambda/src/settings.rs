use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::FixedOffset;

use crate::runtime::contract::{
    WaiterConfig, DEFAULT_ALERT_SUBJECT, DEFAULT_ALERT_TOPIC_NAME, DEFAULT_ALERT_UTC_OFFSET_HOURS,
    DEFAULT_PARTITION, DEFAULT_REGION, DEFAULT_USER_WAIT_DELAY_SECS,
    DEFAULT_USER_WAIT_MAX_ATTEMPTS,
};
use crate::runtime::error::ProvisioningError;
use crate::runtime::templates::{utc_offset_hours, MessageTemplate};

const USER_MAIL_TEMPLATE: &str = include_str!("../mail_template/user_mail_template.txt");
const ERROR_MAIL_TEMPLATE: &str = include_str!("../mail_template/error_mail_template.txt");

pub const ENV_ALERT_TOPIC_NAME: &str = "OPE_SNS_TOPIC_NAME";
pub const ENV_ALERT_SUBJECT: &str = "ALERT_SUBJECT";
pub const ENV_ALERT_UTC_OFFSET_HOURS: &str = "ALERT_UTC_OFFSET_HOURS";
pub const ENV_PARTITION: &str = "AWS_PARTITION";
pub const ENV_REGION: &str = "AWS_REGION";
pub const ENV_USER_WAIT_DELAY_SECS: &str = "USER_WAIT_DELAY_SECS";
pub const ENV_USER_WAIT_MAX_ATTEMPTS: &str = "USER_WAIT_MAX_ATTEMPTS";
pub const ENV_USER_MAIL_TEMPLATE_PATH: &str = "USER_MAIL_TEMPLATE_PATH";
pub const ENV_ERROR_MAIL_TEMPLATE_PATH: &str = "ERROR_MAIL_TEMPLATE_PATH";

/// Invocation-independent settings read from the Lambda environment.
///
/// Job parameters (bucket, key, source address) are not here: they are read
/// from the parameter store on every invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    pub alert_topic_name: String,
    pub alert_subject: String,
    pub alert_utc_offset: FixedOffset,
    pub partition: String,
    pub region: String,
    pub waiter: WaiterConfig,
    pub user_mail_template: MessageTemplate,
    pub error_mail_template: MessageTemplate,
}

impl RuntimeSettings {
    pub fn from_env() -> Result<Self, ProvisioningError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable source; unset or blank
    /// variables fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ProvisioningError> {
        let value = |name: &str| lookup(name).filter(|raw| !raw.trim().is_empty());

        let offset_hours = parse_or(
            ENV_ALERT_UTC_OFFSET_HOURS,
            value(ENV_ALERT_UTC_OFFSET_HOURS),
            DEFAULT_ALERT_UTC_OFFSET_HOURS,
        )?;
        let delay_secs = parse_or(
            ENV_USER_WAIT_DELAY_SECS,
            value(ENV_USER_WAIT_DELAY_SECS),
            DEFAULT_USER_WAIT_DELAY_SECS,
        )?;
        let max_attempts = parse_or(
            ENV_USER_WAIT_MAX_ATTEMPTS,
            value(ENV_USER_WAIT_MAX_ATTEMPTS),
            DEFAULT_USER_WAIT_MAX_ATTEMPTS,
        )?;
        if max_attempts == 0 {
            return Err(ProvisioningError::configuration(
                ENV_USER_WAIT_MAX_ATTEMPTS,
                "must be at least 1",
            ));
        }

        Ok(Self {
            alert_topic_name: value(ENV_ALERT_TOPIC_NAME)
                .unwrap_or_else(|| DEFAULT_ALERT_TOPIC_NAME.to_string()),
            alert_subject: value(ENV_ALERT_SUBJECT)
                .unwrap_or_else(|| DEFAULT_ALERT_SUBJECT.to_string()),
            alert_utc_offset: utc_offset_hours(offset_hours)?,
            partition: value(ENV_PARTITION).unwrap_or_else(|| DEFAULT_PARTITION.to_string()),
            region: value(ENV_REGION).unwrap_or_else(|| DEFAULT_REGION.to_string()),
            waiter: WaiterConfig {
                delay: Duration::from_secs(delay_secs),
                max_attempts,
            },
            user_mail_template: load_template(
                ENV_USER_MAIL_TEMPLATE_PATH,
                value(ENV_USER_MAIL_TEMPLATE_PATH),
                USER_MAIL_TEMPLATE,
            )?,
            error_mail_template: load_template(
                ENV_ERROR_MAIL_TEMPLATE_PATH,
                value(ENV_ERROR_MAIL_TEMPLATE_PATH),
                ERROR_MAIL_TEMPLATE,
            )?,
        })
    }
}

fn parse_or<T: FromStr>(
    name: &str,
    raw: Option<String>,
    default: T,
) -> Result<T, ProvisioningError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            ProvisioningError::configuration(name, format!("'{raw}' is not a valid value"))
        }),
    }
}

fn load_template(
    name: &str,
    path: Option<String>,
    embedded: &str,
) -> Result<MessageTemplate, ProvisioningError> {
    let Some(path) = path else {
        return Ok(MessageTemplate::new(embedded));
    };

    std::fs::read_to_string(Path::new(&path))
        .map(MessageTemplate::new)
        .map_err(|error| {
            ProvisioningError::configuration(name, format!("failed to read {path}: {error}"))
        })
}
