//! CloudFormation template document types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::FunctionSpec;

/// Template format version written into every generated template.
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// CloudFormation resource type for compute functions.
pub const LAMBDA_FUNCTION_TYPE: &str = "AWS::Lambda::Function";

/// A generated CloudFormation template.
///
/// Resources are keyed by function name. The map is ordered by key, so the
/// serialized document lists resources alphabetically rather than in
/// declaration order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CloudFormationTemplate {
    /// Template format version.
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,
    /// Logical resource id to resource.
    #[serde(rename = "Resources")]
    pub resources: BTreeMap<String, LambdaResource>,
}

/// An `AWS::Lambda::Function` resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LambdaResource {
    /// Resource type.
    #[serde(rename = "Type")]
    pub resource_type: String,
    /// Resource properties.
    #[serde(rename = "Properties")]
    pub properties: FunctionProperties,
}

/// Properties of a Lambda function resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionProperties {
    /// Function name.
    pub function_name: String,
    /// Description.
    pub description: String,
    /// Handler entrypoint.
    pub handler: String,
    /// Execution role ARN.
    pub role: String,
    /// Runtime identifier.
    pub runtime: String,
    /// Timeout in seconds.
    pub timeout: u32,
    /// Memory size in MB.
    pub memory_size: u32,
    /// Location of the code archive.
    pub code: FunctionCode,
}

/// Code location of a Lambda function.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionCode {
    /// Bucket holding the archive.
    #[serde(rename = "S3Bucket")]
    pub s3_bucket: String,
    /// Key of the archive.
    #[serde(rename = "S3Key")]
    pub s3_key: String,
}

impl CloudFormationTemplate {
    /// Creates an empty template.
    #[must_use]
    pub fn new() -> Self {
        Self {
            format_version: String::from(TEMPLATE_FORMAT_VERSION),
            resources: BTreeMap::new(),
        }
    }

    /// Returns the number of resources.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Returns the resource names, sorted.
    #[must_use]
    pub fn resource_names(&self) -> Vec<&str> {
        self.resources.keys().map(String::as_str).collect()
    }
}

impl Default for CloudFormationTemplate {
    fn default() -> Self {
        Self::new()
    }
}

impl LambdaResource {
    /// Builds the resource for one function descriptor.
    #[must_use]
    pub fn from_function(function: &FunctionSpec, bucket: &str) -> Self {
        Self {
            resource_type: String::from(LAMBDA_FUNCTION_TYPE),
            properties: FunctionProperties {
                function_name: function.name.clone(),
                description: function.description.clone(),
                handler: function.handler.clone(),
                role: function.role.clone(),
                runtime: function.runtime.clone(),
                timeout: function.timeout,
                memory_size: function.memory_size,
                code: FunctionCode {
                    s3_bucket: bucket.to_string(),
                    s3_key: function.code_key(),
                },
            },
        }
    }
}
