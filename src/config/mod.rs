//! Configuration module for the pipeline stack tooling.
//!
//! This module handles all configuration-related functionality:
//! - Parsing `config.yaml` into an untyped document
//! - Typed views of the sections each component needs
//! - Explicit validation of a whole document
//! - Content digests for templates and function descriptors

mod document;
mod hash;
mod parser;
mod spec;
mod validator;

pub use document::ConfigDocument;
pub use hash::ConfigHasher;
pub use parser::{ConfigParser, DEFAULT_CONFIG_FILES, ENV_OVERRIDES, find_config_file};
pub use spec::{CloudFormationSpec, FunctionSpec, StackParameter, code_archive_key};
pub use validator::{ConfigValidator, ValidationError, ValidationResult};
