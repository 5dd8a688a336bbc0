// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// Tests unwrap freely
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Pipeline Stack
//!
//! Generates a CloudFormation template for a set of Lambda functions and
//! deploys it, then points each function at its code archive in S3.
//!
//! ## Overview
//!
//! One YAML configuration drives every step:
//!
//! - Generate one `AWS::Lambda::Function` resource per declared function
//! - Create the stack if it is absent, update it otherwise
//! - Update each function's code from `s3://<bucket>/lambda/<name>.zip`
//! - Upload local archives to that location
//!
//! Remote failures never abort a run. Each stack and function outcome is
//! recorded in a report and logged.
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading, typed views and validation
//! - [`template`]: CloudFormation template generation
//! - [`aws`]: CloudFormation, Lambda and S3 service interfaces
//! - [`deployer`]: Stack deployment and archive upload
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! region: us-east-1
//! stack_name: demo
//! cloudformation:
//!   template_file: generated_pipeline.yaml
//!   capabilities: [CAPABILITY_IAM]
//!   parameters:
//!     - name: Env
//!       value: prod
//! lambda:
//!   functions:
//!     - name: fnA
//!       description: Ingest step
//!       handler: app.handler
//!       role: arn:aws:iam::123456789012:role/pipeline
//!       runtime: python3.12
//!       timeout: 30
//!       memory_size: 128
//! s3:
//!   base_bucket: bucket1
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod aws;
pub mod cli;
pub mod config;
pub mod deployer;
pub mod error;
pub mod template;

// ============================================================================
// Re-exports
// ============================================================================

pub use aws::{ArtifactStore, AwsClients, FunctionCodeApi, StackApi};
pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ConfigDocument, ConfigHasher, ConfigParser, ConfigValidator, FunctionSpec};
pub use deployer::{
    ArtifactPublisher, DeploymentReport, PublishReport, StackDeployer, StackOutcome,
};
pub use error::{PipelineError, Result};
pub use template::{CloudFormationTemplate, TemplateGenerator};
