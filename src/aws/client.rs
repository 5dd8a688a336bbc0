//! Construction of the AWS service clients.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::debug;

use super::cloudformation::CloudFormationStacks;
use super::lambda::LambdaFunctions;
use super::s3::S3ArtifactStore;

/// The set of service clients used by one run.
///
/// Built once from the configured region and handed to each component by
/// reference.
#[derive(Debug, Clone)]
pub struct AwsClients {
    stacks: CloudFormationStacks,
    functions: LambdaFunctions,
    artifacts: S3ArtifactStore,
}

impl AwsClients {
    /// Loads AWS configuration from the environment and builds the clients.
    ///
    /// Uses the default region chain when `region` is `None`.
    pub async fn from_region(region: Option<&str>) -> Self {
        let loader = aws_config::defaults(BehaviorVersion::latest());
        let config = if let Some(region_str) = region {
            debug!("Using AWS region: {region_str}");
            loader.region(Region::new(region_str.to_string())).load().await
        } else {
            loader.load().await
        };

        Self::from_sdk_config(&config)
    }

    /// Builds the clients from an already loaded SDK configuration.
    #[must_use]
    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self {
            stacks: CloudFormationStacks::new(aws_sdk_cloudformation::Client::new(config)),
            functions: LambdaFunctions::new(aws_sdk_lambda::Client::new(config)),
            artifacts: S3ArtifactStore::new(aws_sdk_s3::Client::new(config)),
        }
    }

    /// CloudFormation stack operations.
    #[must_use]
    pub const fn stacks(&self) -> &CloudFormationStacks {
        &self.stacks
    }

    /// Lambda code updates.
    #[must_use]
    pub const fn functions(&self) -> &LambdaFunctions {
        &self.functions
    }

    /// S3 archive uploads.
    #[must_use]
    pub const fn artifacts(&self) -> &S3ArtifactStore {
        &self.artifacts
    }
}
