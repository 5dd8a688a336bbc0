//! AWS API integration module.
//!
//! This module provides the service interfaces the deployer depends on and
//! their implementations over the CloudFormation, Lambda and S3 SDKs.

mod api;
mod client;
mod cloudformation;
mod lambda;
mod s3;

pub use api::{
    ArtifactStore, FunctionCodeApi, FunctionCodeUpdate, StackApi, StackRequest, StackSummary,
    UpdateOutcome,
};
#[cfg(test)]
pub use api::{MockArtifactStore, MockFunctionCodeApi, MockStackApi};
pub use client::AwsClients;
pub use cloudformation::CloudFormationStacks;
pub use lambda::LambdaFunctions;
pub use s3::S3ArtifactStore;
