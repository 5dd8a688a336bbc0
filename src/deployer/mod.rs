//! Deployment of the stack, function code and code archives.
//!
//! This module contains the remote-facing workflows:
//! - Stack create/update and function code updates
//! - Upload of local archives to the artifact bucket
//! - The per-run reports both produce

mod artifacts;
mod report;
mod stack;

pub use artifacts::{ArtifactPublisher, DEFAULT_ARTIFACTS_DIR, archive_path};
pub use report::{
    ArtifactUploadResult, DeploymentReport, FunctionUpdateResult, PublishReport, StackOutcome,
};
pub use stack::{DEFAULT_TEMPLATE_DIR, StackDeployer};
