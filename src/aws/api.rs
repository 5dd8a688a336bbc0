//! Service interfaces used by the deployer and the artifact publisher.
//!
//! Each trait covers the handful of remote procedures the tooling needs.
//! The AWS SDK backed implementations live next to this module; tests use
//! mock implementations.

use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;

use crate::config::StackParameter;
use crate::error::Result;

/// Input of a create or update stack call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackRequest {
    /// Stack name.
    pub stack_name: String,
    /// Raw template body.
    pub template_body: String,
    /// Stack parameters.
    pub parameters: Vec<StackParameter>,
    /// Capability flags.
    pub capabilities: Vec<String>,
}

/// What `describe_stack` reports about an existing stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackSummary {
    /// Stack ARN.
    pub stack_id: Option<String>,
    /// Current stack status (e.g. `UPDATE_COMPLETE`).
    pub status: Option<String>,
}

/// Result of an update stack call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The update was accepted.
    Updated {
        /// Stack ARN.
        stack_id: Option<String>,
    },
    /// CloudFormation reported that the template and parameters are unchanged.
    NoChanges,
}

/// Result of a function code update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionCodeUpdate {
    /// Function name as reported by Lambda.
    pub function_name: String,
    /// SHA-256 of the deployed package.
    pub code_sha256: Option<String>,
    /// Last modification timestamp.
    pub last_modified: Option<String>,
}

/// CloudFormation stack operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StackApi: Send + Sync {
    /// Describes a stack by name.
    ///
    /// Returns `None` if no stack with that name exists.
    async fn describe_stack(&self, stack_name: &str) -> Result<Option<StackSummary>>;

    /// Creates a stack and returns its id.
    async fn create_stack(&self, request: &StackRequest) -> Result<Option<String>>;

    /// Updates an existing stack.
    async fn update_stack(&self, request: &StackRequest) -> Result<UpdateOutcome>;
}

/// Lambda code deployment.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FunctionCodeApi: Send + Sync {
    /// Points a function at the archive stored at `bucket`/`key`.
    async fn update_function_code(
        &self,
        function_name: &str,
        bucket: &str,
        key: &str,
    ) -> Result<FunctionCodeUpdate>;
}

/// Object storage for code archives.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Uploads a local file to `bucket`/`key`.
    async fn upload(&self, local_path: &Path, bucket: &str, key: &str) -> Result<()>;
}
