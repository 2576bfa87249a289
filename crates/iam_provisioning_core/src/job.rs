use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::contract::JobConfig;
use crate::error::ProvisioningError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStage {
    Idle,
    ConfigResolved,
    ManifestLoaded,
    UsersProvisioned,
    ManifestCleaned,
    Failed,
}

impl JobStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ConfigResolved => "config_resolved",
            Self::ManifestLoaded => "manifest_loaded",
            Self::UsersProvisioned => "users_provisioned",
            Self::ManifestCleaned => "manifest_cleaned",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::ManifestCleaned | Self::Failed)
    }

    fn successor(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::ConfigResolved),
            Self::ConfigResolved => Some(Self::ManifestLoaded),
            Self::ManifestLoaded => Some(Self::UsersProvisioned),
            Self::UsersProvisioned => Some(Self::ManifestCleaned),
            Self::ManifestCleaned | Self::Failed => None,
        }
    }
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One invocation of the provisioning workflow.
///
/// Stages only move forward one step at a time; `Failed` can be entered from
/// any non-terminal stage. Nothing here is persisted between invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningJob {
    stage: JobStage,
    config: Option<JobConfig>,
    rows: Vec<String>,
    provisioned_users: Vec<String>,
}

impl Default for ProvisioningJob {
    fn default() -> Self {
        Self::new()
    }
}

impl ProvisioningJob {
    pub fn new() -> Self {
        Self {
            stage: JobStage::Idle,
            config: None,
            rows: Vec::new(),
            provisioned_users: Vec::new(),
        }
    }

    pub fn stage(&self) -> JobStage {
        self.stage
    }

    pub fn config(&self) -> Option<&JobConfig> {
        self.config.as_ref()
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn config_resolved(&mut self, config: JobConfig) -> Result<(), ProvisioningError> {
        self.advance(JobStage::ConfigResolved)?;
        self.config = Some(config);
        Ok(())
    }

    pub fn manifest_loaded(&mut self, rows: Vec<String>) -> Result<(), ProvisioningError> {
        self.advance(JobStage::ManifestLoaded)?;
        self.rows = rows;
        Ok(())
    }

    pub fn users_provisioned(&mut self, usernames: Vec<String>) -> Result<(), ProvisioningError> {
        self.advance(JobStage::UsersProvisioned)?;
        self.provisioned_users = usernames;
        Ok(())
    }

    pub fn manifest_cleaned(&mut self) -> Result<(), ProvisioningError> {
        self.advance(JobStage::ManifestCleaned)
    }

    /// Moves the job to `Failed`, recording the last stage it reached.
    pub fn fail(&mut self, error: ProvisioningError) -> JobFailure {
        let stage = self.stage;
        self.stage = JobStage::Failed;
        JobFailure { stage, error }
    }

    pub fn report(&self) -> Result<JobReport, ProvisioningError> {
        match (&self.config, self.stage) {
            (Some(config), JobStage::ManifestCleaned) => Ok(JobReport {
                stage: self.stage,
                bucket: config.bucket.clone(),
                object_key: config.object_key.clone(),
                rows_processed: self.rows.len(),
                provisioned_users: self.provisioned_users.clone(),
            }),
            _ => Err(ProvisioningError::InvalidTransition {
                from: self.stage,
                to: JobStage::ManifestCleaned,
            }),
        }
    }

    fn advance(&mut self, next: JobStage) -> Result<(), ProvisioningError> {
        if self.stage.successor() != Some(next) {
            return Err(ProvisioningError::InvalidTransition {
                from: self.stage,
                to: next,
            });
        }
        self.stage = next;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobReport {
    pub stage: JobStage,
    pub bucket: String,
    pub object_key: String,
    pub rows_processed: usize,
    pub provisioned_users: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("provisioning job failed after reaching {stage}: {error}")]
pub struct JobFailure {
    pub stage: JobStage,
    #[source]
    pub error: ProvisioningError,
}
