//! CloudFormation template generation.
//!
//! This module turns the declared compute functions into a CloudFormation
//! document with one `AWS::Lambda::Function` resource per function.

mod generator;
mod types;

pub use generator::{DEFAULT_OUTPUT_PATH, TemplateGenerator};
pub use types::{
    CloudFormationTemplate, FunctionCode, FunctionProperties, LAMBDA_FUNCTION_TYPE,
    LambdaResource, TEMPLATE_FORMAT_VERSION,
};
