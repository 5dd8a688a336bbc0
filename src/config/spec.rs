//! Typed views of the pipeline configuration sections.
//!
//! The YAML document is loaded untyped (see [`super::ConfigDocument`]); these
//! structs are extracted from it on demand by the components that need them.

use serde::{Deserialize, Deserializer, Serialize};

/// One compute function declared under `lambda.functions`.
///
/// Every field is required. A descriptor missing a field is rejected when
/// the function list is extracted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionSpec {
    /// Function name, also the template resource key.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Handler entrypoint (e.g. `app.lambda_handler`).
    pub handler: String,
    /// Execution role ARN.
    pub role: String,
    /// Runtime identifier (e.g. `python3.12`).
    pub runtime: String,
    /// Timeout in seconds.
    pub timeout: u32,
    /// Memory size in MB.
    pub memory_size: u32,
}

/// The `cloudformation` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CloudFormationSpec {
    /// Template file, relative to the template directory.
    pub template_file: String,
    /// Capability flags acknowledged on create/update.
    pub capabilities: Vec<String>,
    /// Stack parameters, in declaration order.
    pub parameters: Vec<StackParameter>,
}

/// A single `{name, value}` stack parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StackParameter {
    /// Parameter key.
    pub name: String,
    /// Parameter value. YAML numbers and booleans are accepted as text.
    #[serde(deserialize_with = "scalar_as_string")]
    pub value: String,
}

/// Object storage key of a function's code archive.
#[must_use]
pub fn code_archive_key(function_name: &str) -> String {
    format!("lambda/{function_name}.zip")
}

impl FunctionSpec {
    /// Returns the storage key of this function's code archive.
    #[must_use]
    pub fn code_key(&self) -> String {
        code_archive_key(&self.name)
    }
}

impl StackParameter {
    /// Creates a new stack parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a scalar parameter value, found {other:?}"
        ))),
    }
}
