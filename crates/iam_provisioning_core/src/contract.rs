use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const PARAM_BUCKET_NAME: &str = "SRC_BUCKET_NAME";
pub const PARAM_OBJECT_KEY_NAME: &str = "SRC_OBJECT_KEY_NAME";
pub const PARAM_SOURCE_MAIL: &str = "SRC_SNS_MAIL";

pub const CREDENTIAL_MAIL_SUBJECT: &str = "Your IAM user has been registered.";
pub const DEFAULT_ALERT_SUBJECT: &str = "[Lambda Error] iam-user-provisioning";
pub const DEFAULT_ALERT_TOPIC_NAME: &str = "OPE_SNS_TOPIC";
pub const DEFAULT_ALERT_UTC_OFFSET_HOURS: i32 = 9;
pub const DEFAULT_PARTITION: &str = "aws";
pub const DEFAULT_REGION: &str = "ap-northeast-1";

pub const DEFAULT_USER_WAIT_DELAY_SECS: u64 = 3;
pub const DEFAULT_USER_WAIT_MAX_ATTEMPTS: u32 = 5;

/// Parameters resolved from the parameter store at the start of a job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobConfig {
    pub bucket: String,
    pub object_key: String,
    pub source_mail: String,
}

/// Bounded poll used while a freshly created user propagates.
///
/// The first existence check runs immediately; `delay` is slept between
/// checks, so a full wait makes `max_attempts` checks and
/// `max_attempts - 1` sleeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaiterConfig {
    pub delay: Duration,
    pub max_attempts: u32,
}

impl Default for WaiterConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(DEFAULT_USER_WAIT_DELAY_SECS),
            max_attempts: DEFAULT_USER_WAIT_MAX_ATTEMPTS,
        }
    }
}

pub fn alert_topic_arn(partition: &str, region: &str, account_id: &str, topic: &str) -> String {
    format!("arn:{partition}:sns:{region}:{account_id}:{topic}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_arn_joins_account_and_topic() {
        assert_eq!(
            alert_topic_arn("aws", "ap-northeast-1", "123456789012", "OPE_SNS_TOPIC"),
            "arn:aws:sns:ap-northeast-1:123456789012:OPE_SNS_TOPIC"
        );
    }

    #[test]
    fn default_waiter_matches_user_exists_waiter() {
        let waiter = WaiterConfig::default();
        assert_eq!(waiter.delay, Duration::from_secs(3));
        assert_eq!(waiter.max_attempts, 5);
    }
}
