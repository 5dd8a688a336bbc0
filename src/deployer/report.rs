//! Per-run outcome reports.
//!
//! Every remote step records its own outcome here instead of aborting the
//! run, so callers can see exactly which items failed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

/// Outcome of the stack create/update step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StackOutcome {
    /// The stack did not exist and was created.
    Created {
        /// Stack ARN.
        stack_id: Option<String>,
    },
    /// The stack existed and an update was accepted.
    Updated {
        /// Stack ARN.
        stack_id: Option<String>,
    },
    /// The stack existed and nothing had changed.
    Unchanged,
    /// The step failed; the stack was not deployed.
    Failed {
        /// Operation that failed (`describe`, `create`, `update`).
        operation: String,
        /// Error message.
        error: String,
    },
}

/// Outcome of one function code update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionUpdateResult {
    /// Function name.
    pub function_name: String,
    /// Bucket holding the archive.
    pub s3_bucket: String,
    /// Key of the archive.
    pub s3_key: String,
    /// Whether the update succeeded.
    pub success: bool,
    /// SHA-256 of the deployed package, if reported.
    pub code_sha256: Option<String>,
    /// Error message (if failed).
    pub error: Option<String>,
    /// AWS error code (if the service reported one).
    pub error_code: Option<String>,
}

/// Result of a deployment run.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentReport {
    /// Identifier of this run, also found in the logs.
    pub run_id: Uuid,
    /// Stack name.
    pub stack_name: String,
    /// Template file that was submitted.
    pub template_path: PathBuf,
    /// SHA-256 of the submitted template body.
    pub template_digest: String,
    /// SHA-256 over the function descriptors.
    pub functions_digest: String,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Stack step outcome.
    pub stack: StackOutcome,
    /// Function code updates, in declaration order.
    pub functions: Vec<FunctionUpdateResult>,
}

/// Outcome of one archive upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactUploadResult {
    /// Function name.
    pub function_name: String,
    /// Local archive path.
    pub local_path: PathBuf,
    /// Destination key.
    pub s3_key: String,
    /// Whether the upload succeeded.
    pub success: bool,
    /// Error message (if failed).
    pub error: Option<String>,
}

/// Result of an upload run.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    /// Destination bucket.
    pub bucket: String,
    /// Uploads, in declaration order.
    pub uploads: Vec<ArtifactUploadResult>,
}

impl StackOutcome {
    /// Returns true unless the stack step failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Short label for display.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Updated { .. } => "updated",
            Self::Unchanged => "unchanged",
            Self::Failed { .. } => "failed",
        }
    }
}

impl DeploymentReport {
    /// Returns true if the stack step and every function update succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.stack.is_success() && self.functions.iter().all(|f| f.success)
    }

    /// Names of the functions whose update failed.
    #[must_use]
    pub fn failed_functions(&self) -> Vec<&str> {
        self.functions
            .iter()
            .filter(|f| !f.success)
            .map(|f| f.function_name.as_str())
            .collect()
    }

    /// Number of functions updated successfully.
    #[must_use]
    pub fn updated_count(&self) -> usize {
        self.functions.iter().filter(|f| f.success).count()
    }
}

impl PublishReport {
    /// Returns true if every upload succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.uploads.iter().all(|u| u.success)
    }

    /// Number of successful uploads.
    #[must_use]
    pub fn uploaded_count(&self) -> usize {
        self.uploads.iter().filter(|u| u.success).count()
    }
}

impl std::fmt::Display for StackOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created { stack_id } | Self::Updated { stack_id } => {
                write!(f, "{}", self.label())?;
                if let Some(id) = stack_id {
                    write!(f, " ({id})")?;
                }
                Ok(())
            }
            Self::Unchanged => write!(f, "unchanged (no updates to perform)"),
            Self::Failed { operation, error } => write!(f, "failed during {operation}: {error}"),
        }
    }
}

impl std::fmt::Display for DeploymentReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.is_success() { "successful" } else { "finished with errors" };
        writeln!(f, "Deployment {status} (run {}):", self.run_id)?;
        writeln!(f, "  Stack {}: {}", self.stack_name, self.stack)?;
        writeln!(
            f,
            "  Functions updated: {}/{}",
            self.updated_count(),
            self.functions.len()
        )?;

        for function in self.functions.iter().filter(|f| !f.success) {
            writeln!(
                f,
                "    - {}: {}",
                function.function_name,
                function.error.as_deref().unwrap_or("unknown error")
            )?;
        }

        Ok(())
    }
}

impl std::fmt::Display for PublishReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Uploaded {}/{} archives to s3://{}",
            self.uploaded_count(),
            self.uploads.len(),
            self.bucket
        )?;
        for upload in self.uploads.iter().filter(|u| !u.success) {
            writeln!(
                f,
                "    - {}: {}",
                upload.function_name,
                upload.error.as_deref().unwrap_or("unknown error")
            )?;
        }
        Ok(())
    }
}
