//! The loaded configuration document.
//!
//! The document keeps the parsed YAML mapping as-is. Components pull the
//! sections they need through typed accessors, so a missing key is reported
//! by the consumer that needs it, with its dotted path.

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::path::Path;

use crate::error::{ConfigError, PipelineError, Result};

use super::spec::{CloudFormationSpec, FunctionSpec};

/// A parsed pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    root: Value,
}

impl ConfigDocument {
    /// Wraps a parsed YAML value. The root must be a mapping.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the root is not a mapping.
    pub fn from_value(root: Value, source: Option<&Path>) -> Result<Self> {
        if !root.is_mapping() {
            return Err(ConfigError::ParseError {
                message: String::from("configuration root must be a mapping"),
                location: source.map(|p| p.display().to_string()),
            }
            .into());
        }

        Ok(Self { root })
    }

    /// Looks up a dotted path such as `s3.base_bucket`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.root, |current, segment| current.get(segment))
            .filter(|value| !value.is_null())
    }

    /// Sets a dotted path, creating intermediate mappings as needed.
    pub fn set(&mut self, path: &str, value: Value) {
        let mut current = &mut self.root;
        for segment in path.split('.') {
            if !current.is_mapping() {
                *current = Value::Mapping(Mapping::new());
            }
            current = match current {
                Value::Mapping(map) => map.entry(Value::from(segment)).or_insert(Value::Null),
                _ => return,
            };
        }
        *current = value;
    }

    /// Deserializes the value at `path` into `T`.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if the key is absent and `InvalidField` if it
    /// does not have the expected shape.
    pub fn typed<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self.get(path).ok_or_else(|| ConfigError::missing(path))?;
        serde_yaml::from_value(value.clone())
            .map_err(|e| ConfigError::invalid(path, e.to_string()).into())
    }

    /// Returns a required string field.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is absent or not a string.
    pub fn string(&self, path: &str) -> Result<String> {
        match self.get(path) {
            None => Err(ConfigError::missing(path).into()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(ConfigError::invalid(path, "expected a string").into()),
        }
    }

    /// AWS region.
    ///
    /// # Errors
    ///
    /// Returns an error if `region` is absent or not a string.
    pub fn region(&self) -> Result<String> {
        self.string("region")
    }

    /// Name of the CloudFormation stack.
    ///
    /// # Errors
    ///
    /// Returns an error if `stack_name` is absent or not a string.
    pub fn stack_name(&self) -> Result<String> {
        self.string("stack_name")
    }

    /// Bucket holding the code archives.
    ///
    /// # Errors
    ///
    /// Returns an error if `s3.base_bucket` is absent or not a string.
    pub fn base_bucket(&self) -> Result<String> {
        self.string("s3.base_bucket")
    }

    /// The `cloudformation` section.
    ///
    /// # Errors
    ///
    /// Returns an error if the section is absent or malformed.
    pub fn cloudformation(&self) -> Result<CloudFormationSpec> {
        self.typed("cloudformation")
    }

    /// The declared compute functions, in order.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if `lambda.functions` is absent, and
    /// `InvalidField` if it is not a sequence or a descriptor is malformed.
    pub fn functions(&self) -> Result<Vec<FunctionSpec>> {
        const FIELD: &str = "lambda.functions";

        let Some(value) = self.get(FIELD) else {
            return Err(ConfigError::missing(FIELD).into());
        };
        let Value::Sequence(items) = value else {
            return Err(ConfigError::invalid(FIELD, "expected a sequence").into());
        };

        items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                serde_yaml::from_value::<FunctionSpec>(item.clone()).map_err(|e| {
                    PipelineError::from(ConfigError::invalid(format!("{FIELD}[{idx}]"), e.to_string()))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(yaml: &str) -> ConfigDocument {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        ConfigDocument::from_value(value, None).unwrap()
    }

    #[test]
    fn test_root_must_be_mapping() {
        let value: Value = serde_yaml::from_str("- a\n- b\n").unwrap();
        let result = ConfigDocument::from_value(value, None);
        assert!(matches!(
            result,
            Err(PipelineError::Config(ConfigError::ParseError { .. }))
        ));
    }

    #[test]
    fn test_dotted_lookup() {
        let document = doc("s3:\n  base_bucket: bucket1\n");
        assert_eq!(document.base_bucket().unwrap(), "bucket1");
        assert!(document.get("s3.missing").is_none());
    }

    #[test]
    fn test_missing_functions() {
        let document = doc("lambda: {}\n");
        match document.functions() {
            Err(PipelineError::Config(ConfigError::MissingField { field })) => {
                assert_eq!(field, "lambda.functions");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_functions_not_a_sequence() {
        let document = doc("lambda:\n  functions: fnA\n");
        assert!(matches!(
            document.functions(),
            Err(PipelineError::Config(ConfigError::InvalidField { .. }))
        ));
    }

    #[test]
    fn test_malformed_descriptor_names_index() {
        let document = doc("lambda:\n  functions:\n    - name: fnA\n");
        match document.functions() {
            Err(PipelineError::Config(ConfigError::InvalidField { field, .. })) => {
                assert_eq!(field, "lambda.functions[0]");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_set_creates_intermediate_mappings() {
        let mut document = doc("region: us-east-1\n");
        document.set("s3.base_bucket", Value::from("override"));
        assert_eq!(document.base_bucket().unwrap(), "override");
        assert_eq!(document.region().unwrap(), "us-east-1");
    }

    #[test]
    fn test_wrong_type_string_field() {
        let document = doc("stack_name: 42\n");
        assert!(matches!(
            document.stack_name(),
            Err(PipelineError::Config(ConfigError::InvalidField { .. }))
        ));
    }
}
