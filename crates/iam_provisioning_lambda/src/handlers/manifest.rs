use tracing::info;

use crate::adapters::object_store::ManifestStore;
use crate::runtime::error::ProvisioningError;
use crate::runtime::manifest::decode_manifest;

pub fn load_manifest(
    store: &dyn ManifestStore,
    bucket: &str,
    key: &str,
) -> Result<Vec<String>, ProvisioningError> {
    let body = store.get_object(bucket, key)?;
    let rows = decode_manifest(&body)?;

    info!(
        component = "manifest_loader",
        event = "manifest_loaded",
        bucket,
        key,
        bytes = body.len(),
        rows = rows.len()
    );
    Ok(rows)
}

pub fn delete_manifest(
    store: &dyn ManifestStore,
    bucket: &str,
    key: &str,
) -> Result<(), ProvisioningError> {
    store.delete_object(bucket, key)?;

    info!(
        component = "manifest_cleaner",
        event = "manifest_deleted",
        bucket,
        key
    );
    Ok(())
}
