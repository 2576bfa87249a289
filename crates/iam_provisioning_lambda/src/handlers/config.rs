use tracing::info;

use crate::adapters::parameter_store::ParameterStore;
use crate::runtime::contract::{
    JobConfig, PARAM_BUCKET_NAME, PARAM_OBJECT_KEY_NAME, PARAM_SOURCE_MAIL,
};
use crate::runtime::error::ProvisioningError;

/// Reads the job parameters in order, stopping at the first failure.
pub fn resolve_job_config(store: &dyn ParameterStore) -> Result<JobConfig, ProvisioningError> {
    let bucket = store.get_parameter(PARAM_BUCKET_NAME)?;
    let object_key = store.get_parameter(PARAM_OBJECT_KEY_NAME)?;
    let source_mail = store.get_parameter(PARAM_SOURCE_MAIL)?;

    info!(
        component = "config_resolver",
        event = "config_resolved",
        bucket = %bucket,
        object_key = %object_key
    );

    Ok(JobConfig {
        bucket,
        object_key,
        source_mail,
    })
}
