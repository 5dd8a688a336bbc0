//! Configuration validation for pipeline documents.
//!
//! Loading never validates; this module is the explicit check run on the
//! whole document by the `validate` command, and on the function
//! descriptors by strict template generation.

use crate::error::{ConfigError, PipelineError, Result};
use std::collections::HashSet;
use tracing::debug;

use super::document::ConfigDocument;
use super::spec::{CloudFormationSpec, FunctionSpec};

/// Capability flags accepted by CloudFormation.
const KNOWN_CAPABILITIES: &[&str] = &[
    "CAPABILITY_IAM",
    "CAPABILITY_NAMED_IAM",
    "CAPABILITY_AUTO_EXPAND",
];

/// Lambda timeout bounds in seconds.
const TIMEOUT_RANGE: std::ops::RangeInclusive<u32> = 1..=900;

/// Lambda memory bounds in MB.
const MEMORY_RANGE: std::ops::RangeInclusive<u32> = 128..=10_240;

/// Maximum Lambda function name length.
const MAX_FUNCTION_NAME_LEN: usize = 64;

/// Validator for pipeline configurations.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a pipeline configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation error if any check fails.
    pub fn validate(&self, document: &ConfigDocument) -> Result<ValidationResult> {
        let result = self.check(document);
        result.first_error()?;

        debug!("Configuration validation passed");
        Ok(result)
    }

    /// Checks only the function descriptors.
    ///
    /// # Errors
    ///
    /// Returns the first validation error if any descriptor is invalid.
    pub fn validate_functions(&self, functions: &[FunctionSpec]) -> Result<()> {
        let mut result = ValidationResult::default();
        Self::check_functions(functions, &mut result);
        result.first_error()
    }

    /// Runs every check and collects all errors and warnings.
    #[must_use]
    pub fn check(&self, document: &ConfigDocument) -> ValidationResult {
        let mut result = ValidationResult::default();

        for field in ["region", "stack_name", "s3.base_bucket"] {
            match document.string(field) {
                Ok(value) if value.trim().is_empty() => result.push(field, "cannot be empty"),
                Ok(_) => {}
                Err(e) => result.push(field, &root_cause(&e)),
            }
        }

        match document.cloudformation() {
            Ok(cfn) => Self::validate_cloudformation(&cfn, &mut result),
            Err(e) => result.push("cloudformation", &root_cause(&e)),
        }

        match document.functions() {
            Ok(functions) => Self::check_functions(&functions, &mut result),
            Err(e) => result.push("lambda.functions", &root_cause(&e)),
        }

        result
    }

    /// Validates the `cloudformation` section.
    fn validate_cloudformation(cfn: &CloudFormationSpec, result: &mut ValidationResult) {
        if cfn.template_file.trim().is_empty() {
            result.push("cloudformation.template_file", "cannot be empty");
        }

        for (i, capability) in cfn.capabilities.iter().enumerate() {
            if !KNOWN_CAPABILITIES.contains(&capability.as_str()) {
                result.push(
                    &format!("cloudformation.capabilities[{i}]"),
                    &format!("unknown capability '{capability}'"),
                );
            }
        }

        let mut seen = HashSet::new();
        for (i, param) in cfn.parameters.iter().enumerate() {
            let field = format!("cloudformation.parameters[{i}].name");
            if param.name.is_empty() {
                result.push(&field, "parameter name cannot be empty");
            } else if !seen.insert(param.name.as_str()) {
                result.push(&field, &format!("duplicate parameter name: {}", param.name));
            }
            if param.value.is_empty() {
                result
                    .warnings
                    .push(format!("cloudformation.parameters[{i}]: '{}' has an empty value", param.name));
            }
        }
    }

    /// Validates the function descriptors.
    fn check_functions(functions: &[FunctionSpec], result: &mut ValidationResult) {
        if functions.is_empty() {
            result
                .warnings
                .push(String::from("No functions defined; the template will have no resources"));
            return;
        }

        let mut seen_names = HashSet::new();

        for (i, function) in functions.iter().enumerate() {
            let prefix = format!("lambda.functions[{i}]");

            if !seen_names.insert(function.name.as_str()) {
                result.push(
                    &format!("{prefix}.name"),
                    &format!("duplicate function name: {}", function.name),
                );
            }

            if !is_valid_function_name(&function.name) {
                result.push(
                    &format!("{prefix}.name"),
                    &format!(
                        "function name '{}' is invalid. Must be 1-{MAX_FUNCTION_NAME_LEN} letters, digits, hyphens or underscores.",
                        function.name
                    ),
                );
            }

            for (field, value) in [
                ("handler", &function.handler),
                ("role", &function.role),
                ("runtime", &function.runtime),
            ] {
                if value.trim().is_empty() {
                    result.push(&format!("{prefix}.{field}"), "cannot be empty");
                }
            }

            if !TIMEOUT_RANGE.contains(&function.timeout) {
                result.push(
                    &format!("{prefix}.timeout"),
                    &format!(
                        "timeout {} is outside {}..={} seconds",
                        function.timeout,
                        TIMEOUT_RANGE.start(),
                        TIMEOUT_RANGE.end()
                    ),
                );
            }

            if !MEMORY_RANGE.contains(&function.memory_size) {
                result.push(
                    &format!("{prefix}.memory_size"),
                    &format!(
                        "memory size {} is outside {}..={} MB",
                        function.memory_size,
                        MEMORY_RANGE.start(),
                        MEMORY_RANGE.end()
                    ),
                );
            }
        }
    }
}

/// Returns the innermost message of a configuration error.
fn root_cause(error: &PipelineError) -> String {
    match error {
        PipelineError::Config(ConfigError::MissingField { .. }) => String::from("is required"),
        PipelineError::Config(ConfigError::InvalidField { message, .. }) => message.clone(),
        other => other.to_string(),
    }
}

/// Lambda names are letters, digits, hyphens and underscores, up to 64 characters.
fn is_valid_function_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_FUNCTION_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of errors.
    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Returns the number of warnings.
    #[must_use]
    pub const fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Converts the first collected error, if any, into a `ValidationError`.
    fn first_error(&self) -> Result<()> {
        match self.errors.first() {
            Some(error) => Err(ConfigError::validation(&error.message, &error.field).into()),
            None => Ok(()),
        }
    }

    fn push(&mut self, field: &str, message: &str) {
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigParser;

    fn document(functions: &str) -> ConfigDocument {
        let yaml = format!(
            r"
region: us-east-1
stack_name: demo
cloudformation:
  template_file: t.yaml
  capabilities: [CAPABILITY_IAM]
  parameters:
    - name: Env
      value: prod
s3:
  base_bucket: bucket1
lambda:
  functions:
{functions}
"
        );
        ConfigParser::new().parse_yaml(&yaml, None).unwrap()
    }

    const FN_A: &str = "    - {name: fnA, description: d, handler: h, role: r, runtime: py1, timeout: 30, memory_size: 128}";

    #[test]
    fn test_valid_function_name() {
        assert!(is_valid_function_name("evaluate_model"));
        assert!(is_valid_function_name("deploy-Model-2"));
        assert!(!is_valid_function_name(""));
        assert!(!is_valid_function_name("has space"));
        assert!(!is_valid_function_name(&"x".repeat(65)));
    }

    #[test]
    fn test_valid_document() {
        let result = ConfigValidator::new().validate(&document(FN_A)).unwrap();
        assert!(result.is_valid());
        assert_eq!(result.warning_count(), 0);
    }

    #[test]
    fn test_duplicate_function_names() {
        let functions = format!("{FN_A}\n{FN_A}");
        let result = ConfigValidator::new().check(&document(&functions));
        assert_eq!(result.error_count(), 1);
        assert!(result.errors[0].message.contains("duplicate function name"));
    }

    #[test]
    fn test_out_of_range_limits() {
        let functions = "    - {name: fnA, description: d, handler: h, role: r, runtime: py1, timeout: 0, memory_size: 64}";
        let result = ConfigValidator::new().check(&document(functions));
        let fields: Vec<_> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["lambda.functions[0].timeout", "lambda.functions[0].memory_size"]
        );
    }

    #[test]
    fn test_validate_functions_only() {
        let invalid = ConfigParser::new()
            .parse_yaml(
                "lambda:\n  functions:\n    - {name: 'bad name!', description: d, handler: '', role: r, runtime: py1, timeout: 0, memory_size: 1}\n",
                None,
            )
            .unwrap()
            .functions()
            .unwrap();

        match ConfigValidator::new().validate_functions(&invalid) {
            Err(PipelineError::Config(ConfigError::ValidationError { field, .. })) => {
                assert_eq!(field.as_deref(), Some("lambda.functions[0].name"));
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let valid = document(FN_A).functions().unwrap();
        assert!(ConfigValidator::new().validate_functions(&valid).is_ok());
    }

    #[test]
    fn test_missing_sections_reported() {
        let document = ConfigParser::new().parse_yaml("region: us-east-1\n", None).unwrap();
        let result = ConfigValidator::new().check(&document);
        let fields: Vec<_> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["stack_name", "s3.base_bucket", "cloudformation", "lambda.functions"]
        );
        assert!(ConfigValidator::new().validate(&document).is_err());
    }

    #[test]
    fn test_empty_function_list_warns() {
        let document = document("    []");
        let result = ConfigValidator::new().validate(&document).unwrap();
        assert_eq!(result.warning_count(), 1);
    }
}
