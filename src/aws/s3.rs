//! S3 storage for code archives.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{PipelineError, RemoteError, Result};

use super::api::ArtifactStore;

/// S3-backed [`ArtifactStore`].
#[derive(Debug, Clone)]
pub struct S3ArtifactStore {
    /// S3 client.
    client: Client,
}

impl S3ArtifactStore {
    /// Wraps an existing S3 client.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn upload(&self, local_path: &Path, bucket: &str, key: &str) -> Result<()> {
        debug!("Reading archive: {}", local_path.display());

        let body = ByteStream::from_path(local_path).await.map_err(|e| {
            PipelineError::internal(format!("Failed to read {}: {e}", local_path.display()))
        })?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .content_type("application/zip")
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                RemoteError::api(
                    "s3",
                    "PutObject",
                    service_err.code(),
                    DisplayErrorContext(&service_err).to_string(),
                )
            })?;

        info!("Uploaded {} to s3://{bucket}/{key}", local_path.display());
        Ok(())
    }
}
