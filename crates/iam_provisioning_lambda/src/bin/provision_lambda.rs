use aws_config::{BehaviorVersion, Region};
use iam_provisioning_lambda::adapters::aws::AwsServices;
use iam_provisioning_lambda::handlers::job::{run_job, JobServices};
use iam_provisioning_lambda::runtime::job::JobReport;
use iam_provisioning_lambda::settings::RuntimeSettings;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

async fn handle_request(event: LambdaEvent<Value>) -> Result<JobReport, Error> {
    info!(
        component = "entry_point",
        event = "invocation_received",
        request_id = %event.context.request_id
    );

    let settings = RuntimeSettings::from_env().map_err(|error| Error::from(error.to_string()))?;
    let aws_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(settings.region.clone()))
        .load()
        .await;
    let aws = AwsServices::new(&aws_config);
    let services = JobServices {
        parameters: &aws.parameters,
        manifests: &aws.manifests,
        identities: &aws.identities,
        mailer: &aws.mailer,
        alerts: &aws.alerts,
        account: &aws.account,
    };

    tokio::task::block_in_place(|| run_job(services, &settings))
        .map_err(|failure| Error::from(failure.to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_current_span(false)
        .init();

    lambda_runtime::run(service_fn(handle_request)).await
}
