use chrono::{DateTime, FixedOffset, Utc};
use serde_json::json;

use crate::error::ProvisioningError;

pub const USERNAME_PLACEHOLDER: &str = "var_username";
pub const PASSWORD_PLACEHOLDER: &str = "var_password";
pub const ERROR_DATE_PLACEHOLDER: &str = "ver_error_date";
pub const ERROR_PLACEHOLDER: &str = "ver_error";

pub const ALERT_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Plain-text message body with literal placeholder tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    text: String,
}

impl MessageTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces every occurrence of each placeholder, in the order given.
    pub fn render(&self, substitutions: &[(&str, &str)]) -> String {
        substitutions
            .iter()
            .fold(self.text.clone(), |body, (placeholder, value)| {
                body.replace(placeholder, value)
            })
    }
}

pub fn render_credential_mail(template: &MessageTemplate, username: &str, password: &str) -> String {
    template.render(&[
        (USERNAME_PLACEHOLDER, username),
        (PASSWORD_PLACEHOLDER, password),
    ])
}

/// Renders the operator alert body.
///
/// `ver_error` is a prefix of `ver_error_date`, so the date is substituted
/// first.
pub fn render_alert_body(
    template: &MessageTemplate,
    error_message: &str,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> String {
    let timestamp = format_alert_timestamp(now, offset);
    template.render(&[
        (ERROR_DATE_PLACEHOLDER, timestamp.as_str()),
        (ERROR_PLACEHOLDER, error_message),
    ])
}

pub fn format_alert_timestamp(now: DateTime<Utc>, offset: FixedOffset) -> String {
    now.with_timezone(&offset)
        .format(ALERT_TIMESTAMP_FORMAT)
        .to_string()
}

pub fn utc_offset_hours(hours: i32) -> Result<FixedOffset, ProvisioningError> {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| {
            ProvisioningError::configuration(
                "ALERT_UTC_OFFSET_HOURS",
                format!("{hours} is not a valid UTC offset"),
            )
        })
}

/// SNS `json` message structure: every protocol falls back to `default`.
pub fn alert_message_json(body: &str) -> String {
    json!({ "default": format!("{body}\n") }).to_string()
}
