//! Bucket handle construction.

use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::ObjectStore;
use std::sync::Arc;

use crate::config::StorageConfig;
use crate::content::server::ContentError;

/// Open the configured Cloud Storage bucket.
///
/// Credentials are resolved from the environment (service account file,
/// application default credentials, or the instance metadata server).
pub fn open_bucket(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, ContentError> {
    let store = GoogleCloudStorageBuilder::from_env()
        .with_bucket_name(&config.bucket)
        .build()?;
    tracing::info!(bucket = %config.bucket, "Object store ready");
    Ok(Arc::new(store))
}
