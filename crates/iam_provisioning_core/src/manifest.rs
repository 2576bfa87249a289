use serde::{Deserialize, Serialize};

use crate::error::ProvisioningError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManifestRow {
    pub username: String,
    pub group_name: String,
    pub email_address: String,
}

impl ManifestRow {
    /// Splits one `username,group_name,email_address` token.
    ///
    /// Fields past the third are ignored. No trimming, quoting or escaping is
    /// applied.
    pub fn parse(raw: &str) -> Result<Self, ProvisioningError> {
        let mut fields = raw.split(',');
        match (fields.next(), fields.next(), fields.next()) {
            (Some(username), Some(group_name), Some(email_address)) => Ok(Self {
                username: username.to_string(),
                group_name: group_name.to_string(),
                email_address: email_address.to_string(),
            }),
            _ => Err(ProvisioningError::MalformedRow {
                row: raw.to_string(),
            }),
        }
    }
}

/// Splits a manifest body into raw rows on any whitespace.
///
/// Rows are not newline delimited: a row containing a space becomes two
/// rows.
pub fn split_manifest_rows(body: &str) -> Vec<String> {
    body.split_whitespace().map(str::to_string).collect()
}

pub fn decode_manifest(bytes: &[u8]) -> Result<Vec<String>, ProvisioningError> {
    let body = std::str::from_utf8(bytes).map_err(|error| {
        ProvisioningError::StorageAccess(format!("manifest is not valid UTF-8: {error}"))
    })?;
    Ok(split_manifest_rows(body))
}
