//! CloudFormation stack operations over the AWS SDK.

use async_trait::async_trait;
use aws_sdk_cloudformation::Client;
use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_cloudformation::types::{Capability, Parameter};
use tracing::debug;

use crate::error::{RemoteError, Result};

use super::api::{StackApi, StackRequest, StackSummary, UpdateOutcome};

const SERVICE: &str = "cloudformation";

/// Error code CloudFormation uses both for missing stacks and no-op updates.
const VALIDATION_ERROR: &str = "ValidationError";

/// CloudFormation-backed [`StackApi`].
#[derive(Debug, Clone)]
pub struct CloudFormationStacks {
    client: Client,
}

impl CloudFormationStacks {
    /// Wraps an existing CloudFormation client.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    fn parameters(request: &StackRequest) -> Vec<Parameter> {
        request
            .parameters
            .iter()
            .map(|p| {
                Parameter::builder()
                    .parameter_key(&p.name)
                    .parameter_value(&p.value)
                    .build()
            })
            .collect()
    }

    fn capabilities(request: &StackRequest) -> Vec<Capability> {
        request
            .capabilities
            .iter()
            .map(|c| Capability::from(c.as_str()))
            .collect()
    }
}

/// Returns true if the error says the stack does not exist.
///
/// CloudFormation has no dedicated not-found code; a missing stack is a
/// `ValidationError` whose message reads "Stack with id X does not exist".
pub(crate) fn is_stack_missing(code: Option<&str>, message: Option<&str>) -> bool {
    code == Some(VALIDATION_ERROR) && message.is_some_and(|m| m.contains("does not exist"))
}

/// Returns true if the error rejects an update that would change nothing.
pub(crate) fn is_no_op_update(code: Option<&str>, message: Option<&str>) -> bool {
    code == Some(VALIDATION_ERROR)
        && message.is_some_and(|m| m.contains("No updates are to be performed"))
}

fn remote_error<E>(operation: &'static str, err: &E) -> RemoteError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    RemoteError::api(
        SERVICE,
        operation,
        err.code(),
        DisplayErrorContext(err).to_string(),
    )
}

#[async_trait]
impl StackApi for CloudFormationStacks {
    async fn describe_stack(&self, stack_name: &str) -> Result<Option<StackSummary>> {
        debug!("Describing stack: {stack_name}");

        match self.client.describe_stacks().stack_name(stack_name).send().await {
            Ok(output) => Ok(output.stacks().first().map(|stack| StackSummary {
                stack_id: stack.stack_id().map(str::to_string),
                status: stack.stack_status().map(|s| s.as_str().to_string()),
            })),
            Err(sdk_err) => {
                let service_err = sdk_err.into_service_error();
                if is_stack_missing(service_err.code(), service_err.message()) {
                    debug!("Stack {stack_name} does not exist");
                    Ok(None)
                } else {
                    Err(remote_error("DescribeStacks", &service_err).into())
                }
            }
        }
    }

    async fn create_stack(&self, request: &StackRequest) -> Result<Option<String>> {
        let output = self
            .client
            .create_stack()
            .stack_name(&request.stack_name)
            .template_body(&request.template_body)
            .set_parameters(Some(Self::parameters(request)))
            .set_capabilities(Some(Self::capabilities(request)))
            .send()
            .await
            .map_err(|e| remote_error("CreateStack", &e.into_service_error()))?;

        Ok(output.stack_id().map(str::to_string))
    }

    async fn update_stack(&self, request: &StackRequest) -> Result<UpdateOutcome> {
        let result = self
            .client
            .update_stack()
            .stack_name(&request.stack_name)
            .template_body(&request.template_body)
            .set_parameters(Some(Self::parameters(request)))
            .set_capabilities(Some(Self::capabilities(request)))
            .send()
            .await;

        match result {
            Ok(output) => Ok(UpdateOutcome::Updated {
                stack_id: output.stack_id().map(str::to_string),
            }),
            Err(sdk_err) => {
                let service_err = sdk_err.into_service_error();
                if is_no_op_update(service_err.code(), service_err.message()) {
                    Ok(UpdateOutcome::NoChanges)
                } else {
                    Err(remote_error("UpdateStack", &service_err).into())
                }
            }
        }
    }
}
