//! Error types for the pipeline stack tooling.
//!
//! This module provides the error hierarchy for every step of a run:
//! configuration loading, template generation, and the remote calls made
//! against CloudFormation, Lambda and S3.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the pipeline stack tooling.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Template generation and template file errors.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// AWS API errors.
    #[error("Remote API error: {0}")]
    Remote(#[from] RemoteError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// A required key is absent.
    #[error("Missing configuration field: {field}")]
    MissingField {
        /// Dotted path of the missing key.
        field: String,
    },

    /// A key is present but has the wrong shape.
    #[error("Invalid configuration field {field}: {message}")]
    InvalidField {
        /// Dotted path of the offending key.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// Validation failed.
    #[error("Configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// Duplicate resource definition.
    #[error("Duplicate {resource_type} name: {name}")]
    DuplicateName {
        /// Type of resource (function, parameter).
        resource_type: String,
        /// The duplicated name.
        name: String,
    },
}

/// Template errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template file referenced by the configuration does not exist.
    #[error("Template file not found: {path}")]
    FileNotFound {
        /// Path to the missing template.
        path: PathBuf,
    },

    /// The template could not be serialized.
    #[error("Template serialization error: {message}")]
    Serialization {
        /// Description of the serialization error.
        message: String,
    },

    /// The generated template could not be written.
    #[error("Failed to write template to {path}: {message}")]
    WriteFailed {
        /// Target path.
        path: PathBuf,
        /// Description of the IO failure.
        message: String,
    },
}

/// Errors returned by the CloudFormation, Lambda and S3 APIs.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The named stack does not exist.
    #[error("Stack not found: {stack_name}")]
    StackNotFound {
        /// Name of the missing stack.
        stack_name: String,
    },

    /// An API request failed.
    #[error("{service} {operation} failed: {message}")]
    ApiRequestFailed {
        /// AWS service (cloudformation, lambda, s3).
        service: &'static str,
        /// Operation name.
        operation: &'static str,
        /// Structured error code, when the service returned one.
        code: Option<String>,
        /// Error message.
        message: String,
    },

    /// A local code archive to upload is missing.
    #[error("Code archive not found: {path}")]
    ArtifactMissing {
        /// Expected archive path.
        path: PathBuf,
    },
}

/// Result type alias for pipeline stack operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl ConfigError {
    /// Creates a missing-field error.
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates an invalid-field error.
    #[must_use]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl RemoteError {
    /// Creates an API request error.
    #[must_use]
    pub fn api(
        service: &'static str,
        operation: &'static str,
        code: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self::ApiRequestFailed {
            service,
            operation,
            code: code.map(str::to_string),
            message: message.into(),
        }
    }

    /// Returns the structured error code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::ApiRequestFailed { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = RemoteError::api("lambda", "UpdateFunctionCode", None, "throttled");
        assert_eq!(err.to_string(), "lambda UpdateFunctionCode failed: throttled");
        assert_eq!(err.code(), None);

        let err = RemoteError::api(
            "cloudformation",
            "UpdateStack",
            Some("ValidationError"),
            "Template format error",
        );
        assert_eq!(err.code(), Some("ValidationError"));
        assert_eq!(RemoteError::StackNotFound { stack_name: String::from("demo") }.code(), None);
    }
}
