use std::time::Instant;

use tracing::{error, info};

use crate::adapters::alerts::{AccountIdentity, AlertPublisher};
use crate::adapters::identity::IdentityDirectory;
use crate::adapters::mailer::Mailer;
use crate::adapters::object_store::ManifestStore;
use crate::adapters::parameter_store::ParameterStore;
use crate::handlers::accounts::AccountProvisioner;
use crate::handlers::config::resolve_job_config;
use crate::handlers::manifest::{delete_manifest, load_manifest};
use crate::handlers::notifier::{CredentialNotifier, OperatorAlerts};
use crate::runtime::error::ProvisioningError;
use crate::runtime::job::{JobFailure, JobReport, ProvisioningJob};
use crate::settings::RuntimeSettings;

/// One capability per external service the job touches.
#[derive(Clone, Copy)]
pub struct JobServices<'a> {
    pub parameters: &'a dyn ParameterStore,
    pub manifests: &'a dyn ManifestStore,
    pub identities: &'a dyn IdentityDirectory,
    pub mailer: &'a dyn Mailer,
    pub alerts: &'a dyn AlertPublisher,
    pub account: &'a dyn AccountIdentity,
}

/// Runs resolve config → load manifest → provision → delete manifest.
///
/// Any failure is reported to the operator topic once and returned; the
/// manifest is deleted only after every row succeeded.
pub fn run_job(
    services: JobServices<'_>,
    settings: &RuntimeSettings,
) -> Result<JobReport, JobFailure> {
    let alerts = OperatorAlerts::new(services.alerts, services.account, settings);
    run_job_with_alerts(services, settings, &alerts)
}

pub fn run_job_with_alerts(
    services: JobServices<'_>,
    settings: &RuntimeSettings,
    alerts: &OperatorAlerts<'_>,
) -> Result<JobReport, JobFailure> {
    let started_at = Instant::now();
    let mut job = ProvisioningJob::new();
    info!(component = "job", event = "job_started");

    match execute(&mut job, services, settings) {
        Ok(report) => {
            info!(
                component = "job",
                event = "job_completed",
                bucket = %report.bucket,
                object_key = %report.object_key,
                users = report.provisioned_users.len(),
                duration_ms = started_at.elapsed().as_millis() as u64
            );
            Ok(report)
        }
        Err(failure_error) => {
            let failure = job.fail(failure_error);
            error!(
                component = "job",
                event = "job_failed",
                stage = %failure.stage,
                error_kind = failure.error.kind(),
                error = %failure.error,
                duration_ms = started_at.elapsed().as_millis() as u64
            );
            if failure.error.is_alertable() {
                alerts.send_operator_alert(&failure.to_string());
            }
            Err(failure)
        }
    }
}

fn execute(
    job: &mut ProvisioningJob,
    services: JobServices<'_>,
    settings: &RuntimeSettings,
) -> Result<JobReport, ProvisioningError> {
    let config = resolve_job_config(services.parameters)?;
    job.config_resolved(config.clone())?;

    let rows = load_manifest(services.manifests, &config.bucket, &config.object_key)?;
    job.manifest_loaded(rows)?;

    let notifier = CredentialNotifier::new(
        services.mailer,
        &settings.user_mail_template,
        &config.source_mail,
    );
    let provisioner = AccountProvisioner::new(services.identities, &notifier, settings.waiter);
    let usernames = provisioner.provision_accounts(job.rows())?;
    job.users_provisioned(usernames)?;

    delete_manifest(services.manifests, &config.bucket, &config.object_key)?;
    job.manifest_cleaned()?;

    job.report()
}
