//! Lambda code updates over the AWS SDK.

use async_trait::async_trait;
use aws_sdk_lambda::Client;
use aws_sdk_lambda::error::{DisplayErrorContext, ProvideErrorMetadata};
use tracing::debug;

use crate::error::{RemoteError, Result};

use super::api::{FunctionCodeApi, FunctionCodeUpdate};

/// Lambda-backed [`FunctionCodeApi`].
#[derive(Debug, Clone)]
pub struct LambdaFunctions {
    client: Client,
}

impl LambdaFunctions {
    /// Wraps an existing Lambda client.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FunctionCodeApi for LambdaFunctions {
    async fn update_function_code(
        &self,
        function_name: &str,
        bucket: &str,
        key: &str,
    ) -> Result<FunctionCodeUpdate> {
        debug!("Updating code of {function_name} from s3://{bucket}/{key}");

        let output = self
            .client
            .update_function_code()
            .function_name(function_name)
            .s3_bucket(bucket)
            .s3_key(key)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                RemoteError::api(
                    "lambda",
                    "UpdateFunctionCode",
                    service_err.code(),
                    DisplayErrorContext(&service_err).to_string(),
                )
            })?;

        Ok(FunctionCodeUpdate {
            function_name: output.function_name().unwrap_or(function_name).to_string(),
            code_sha256: output.code_sha256().map(str::to_string),
            last_modified: output.last_modified().map(str::to_string),
        })
    }
}
