//! Stack deployer.
//!
//! Creates or updates the configured stack from its template file, then
//! points every declared function at its code archive. Remote failures are
//! recorded in the [`DeploymentReport`] and never abort the run; only
//! configuration and template file errors are returned as `Err`.

use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::aws::{FunctionCodeApi, StackApi, StackRequest, UpdateOutcome};
use crate::config::{ConfigDocument, ConfigHasher, FunctionSpec};
use crate::error::{PipelineError, RemoteError, Result, TemplateError};

use super::report::{DeploymentReport, FunctionUpdateResult, StackOutcome};

/// Default directory the configured `template_file` is resolved against.
pub const DEFAULT_TEMPLATE_DIR: &str = "infra/cloudformation";

/// Deployer for one stack and its functions.
pub struct StackDeployer<'a, S: StackApi, F: FunctionCodeApi> {
    /// Stack operations.
    stacks: &'a S,
    /// Function code operations.
    functions: &'a F,
    /// Directory holding template files.
    template_dir: PathBuf,
    /// Whether to push function code after the stack step.
    update_code: bool,
    /// Digest computation.
    hasher: ConfigHasher,
}

impl<'a, S: StackApi, F: FunctionCodeApi> StackDeployer<'a, S, F> {
    /// Creates a new deployer.
    #[must_use]
    pub fn new(stacks: &'a S, functions: &'a F) -> Self {
        Self {
            stacks,
            functions,
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            update_code: true,
            hasher: ConfigHasher::new(),
        }
    }

    /// Sets the directory template files are resolved against.
    #[must_use]
    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = dir.into();
        self
    }

    /// Sets whether function code is updated after the stack step.
    #[must_use]
    pub const fn with_code_updates(mut self, update_code: bool) -> Self {
        self.update_code = update_code;
        self
    }

    /// Resolves a configured template file name.
    #[must_use]
    pub fn template_path(&self, template_file: &str) -> PathBuf {
        self.template_dir.join(template_file)
    }

    /// Deploys the stack and updates function code.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration lacks a required field or the
    /// template file cannot be read. Remote failures are reported in the
    /// returned [`DeploymentReport`] instead.
    pub async fn deploy(&self, document: &ConfigDocument) -> Result<DeploymentReport> {
        let started_at = Utc::now();
        let run_id = Uuid::new_v4();

        let stack_name = document.stack_name()?;
        let cfn = document.cloudformation()?;
        let functions = document.functions()?;
        let bucket = if self.update_code && !functions.is_empty() {
            document.base_bucket()?
        } else {
            String::new()
        };

        let template_path = self.template_path(&cfn.template_file);
        let template_body = read_template(&template_path).await?;

        info!(
            "Deploying stack {stack_name} from {} (run {run_id})",
            template_path.display()
        );

        let request = StackRequest {
            stack_name: stack_name.clone(),
            template_body,
            parameters: cfn.parameters,
            capabilities: cfn.capabilities,
        };

        let stack = self.deploy_stack(&request).await;

        let function_results = if self.update_code {
            self.update_functions(&functions, &bucket).await
        } else {
            debug!("Skipping function code updates");
            Vec::new()
        };

        Ok(DeploymentReport {
            run_id,
            stack_name,
            template_path,
            template_digest: self.hasher.hash_template(&request.template_body),
            functions_digest: self.hasher.hash_functions(&functions),
            started_at,
            finished_at: Utc::now(),
            stack,
            functions: function_results,
        })
    }

    /// Creates the stack if it is absent, updates it otherwise.
    pub async fn deploy_stack(&self, request: &StackRequest) -> StackOutcome {
        let existing = match self.stacks.describe_stack(&request.stack_name).await {
            Ok(summary) => summary,
            Err(PipelineError::Remote(RemoteError::StackNotFound { .. })) => None,
            Err(e) => {
                error!("Error deploying stack: {e}");
                return StackOutcome::Failed {
                    operation: String::from("describe"),
                    error: e.to_string(),
                };
            }
        };

        if let Some(summary) = existing {
            info!(
                "Stack {} exists ({}). Updating...",
                request.stack_name,
                summary.status.as_deref().unwrap_or("unknown status")
            );

            match self.stacks.update_stack(request).await {
                Ok(UpdateOutcome::Updated { stack_id }) => StackOutcome::Updated {
                    stack_id: stack_id.or(summary.stack_id),
                },
                Ok(UpdateOutcome::NoChanges) => {
                    info!("Stack {} is already up to date", request.stack_name);
                    StackOutcome::Unchanged
                }
                Err(e) => {
                    error!("Error deploying stack: {e}");
                    StackOutcome::Failed {
                        operation: String::from("update"),
                        error: e.to_string(),
                    }
                }
            }
        } else {
            info!("Creating stack {}...", request.stack_name);

            match self.stacks.create_stack(request).await {
                Ok(stack_id) => StackOutcome::Created { stack_id },
                Err(e) => {
                    error!("Error creating stack: {e}");
                    StackOutcome::Failed {
                        operation: String::from("create"),
                        error: e.to_string(),
                    }
                }
            }
        }
    }

    /// Updates each function's code in order. A failure is recorded and the
    /// next function is still attempted.
    pub async fn update_functions(
        &self,
        functions: &[FunctionSpec],
        bucket: &str,
    ) -> Vec<FunctionUpdateResult> {
        let mut results = Vec::with_capacity(functions.len());

        for function in functions {
            let key = function.code_key();
            let result = self
                .functions
                .update_function_code(&function.name, bucket, &key)
                .await;

            let (success, code_sha256, error, error_code) = match result {
                Ok(update) => {
                    info!("Lambda {} updated successfully.", function.name);
                    (true, update.code_sha256, None, None)
                }
                Err(e) => {
                    warn!("Failed to update Lambda {}: {e}", function.name);
                    let error_code = match &e {
                        PipelineError::Remote(remote) => remote.code().map(str::to_string),
                        _ => None,
                    };
                    (false, None, Some(e.to_string()), error_code)
                }
            };

            results.push(FunctionUpdateResult {
                function_name: function.name.clone(),
                s3_bucket: bucket.to_string(),
                s3_key: key,
                success,
                code_sha256,
                error,
                error_code,
            });
        }

        results
    }
}

/// Reads a template file as raw text.
async fn read_template(path: &Path) -> Result<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(body) => Ok(body),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(PipelineError::Template(TemplateError::FileNotFound {
                path: path.to_path_buf(),
            }))
        }
        Err(e) => Err(e.into()),
    }
}
