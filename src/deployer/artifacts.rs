//! Upload of local code archives to the artifact bucket.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::aws::ArtifactStore;
use crate::config::ConfigDocument;
use crate::error::{RemoteError, Result};

use super::report::{ArtifactUploadResult, PublishReport};

/// Default local directory holding `<name>.zip` archives.
pub const DEFAULT_ARTIFACTS_DIR: &str = "dist";

/// Publishes one archive per declared function.
pub struct ArtifactPublisher<'a, A: ArtifactStore> {
    store: &'a A,
}

impl<'a, A: ArtifactStore> ArtifactPublisher<'a, A> {
    /// Creates a new publisher.
    #[must_use]
    pub const fn new(store: &'a A) -> Self {
        Self { store }
    }

    /// Uploads `<dir>/<name>.zip` to `lambda/<name>.zip` in the base bucket
    /// for every function.
    ///
    /// # Errors
    ///
    /// Returns an error if the function list or the bucket is missing from
    /// the configuration. Upload failures are recorded per function.
    pub async fn publish(&self, document: &ConfigDocument, dir: &Path) -> Result<PublishReport> {
        let functions = document.functions()?;
        let bucket = if functions.is_empty() {
            document.base_bucket().unwrap_or_default()
        } else {
            document.base_bucket()?
        };

        let mut uploads = Vec::with_capacity(functions.len());

        for function in &functions {
            let local_path = archive_path(dir, &function.name);
            let key = function.code_key();

            let outcome = if tokio::fs::try_exists(&local_path).await.unwrap_or(false) {
                self.store.upload(&local_path, &bucket, &key).await
            } else {
                Err(RemoteError::ArtifactMissing {
                    path: local_path.clone(),
                }
                .into())
            };

            let error = match outcome {
                Ok(()) => None,
                Err(e) => {
                    warn!("Failed to upload archive for {}: {e}", function.name);
                    Some(e.to_string())
                }
            };

            uploads.push(ArtifactUploadResult {
                function_name: function.name.clone(),
                local_path,
                s3_key: key,
                success: error.is_none(),
                error,
            });
        }

        let report = PublishReport { bucket, uploads };
        info!(
            "Uploaded {}/{} archives",
            report.uploaded_count(),
            report.uploads.len()
        );
        Ok(report)
    }
}

/// Local archive path for a function.
#[must_use]
pub fn archive_path(dir: &Path, function_name: &str) -> PathBuf {
    dir.join(format!("{function_name}.zip"))
}
