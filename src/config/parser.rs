//! Configuration parser for loading pipeline configuration files.
//!
//! This module handles loading configuration from YAML files and environment
//! variables, with proper precedence and error handling.

use crate::error::{ConfigError, PipelineError, Result};
use serde_yaml::Value;
use std::path::Path;
use tracing::{debug, info};

use super::document::ConfigDocument;

/// Environment variables that override top-level configuration keys.
///
/// Each entry maps a variable name to the dotted configuration path it replaces.
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("PIPELINE_STACK_REGION", "region"),
    ("PIPELINE_STACK_NAME", "stack_name"),
    ("PIPELINE_STACK_BUCKET", "s3.base_bucket"),
];

/// Configuration parser for loading pipeline configuration.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving the `.env` file.
    base_path: Option<std::path::PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path used to locate the `.env` file.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the path does not exist and `ParseError`
    /// if the file cannot be read or is not well-formed YAML.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ConfigDocument> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(PipelineError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or its root is not a mapping.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<ConfigDocument> {
        debug!("Parsing YAML configuration");

        let value: Value = serde_yaml::from_str(content).map_err(|e| {
            let location = source.map(|p| p.display().to_string());
            PipelineError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location,
            })
        })?;

        ConfigDocument::from_value(value, source)
    }

    /// Loads configuration with environment variable overrides.
    ///
    /// See [`ENV_OVERRIDES`] for the recognized variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_with_env(&self, path: impl AsRef<Path>) -> Result<ConfigDocument> {
        let mut document = self.load_file(path)?;
        Self::apply_overrides(&mut document, |name| std::env::var(name).ok());
        Ok(document)
    }

    /// Applies overrides from `lookup` to the document.
    pub fn apply_overrides<F>(document: &mut ConfigDocument, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for &(var, field) in ENV_OVERRIDES {
            if let Some(value) = lookup(var) {
                debug!("Overriding {field} from environment");
                document.set(field, Value::String(value));
            }
        }
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| std::path::PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                PipelineError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

/// Default configuration file locations to search for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["configs/config.yaml", "config.yaml", "pipeline.yaml"];

/// Finds the configuration file in the given directory or its parents.
///
/// # Errors
///
/// Returns an error if no configuration file is found.
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Result<std::path::PathBuf> {
    let start = start_dir.as_ref();
    let mut current = start.to_path_buf();

    loop {
        for filename in DEFAULT_CONFIG_FILES {
            let config_path = current.join(filename);
            if config_path.exists() {
                info!("Found configuration file: {}", config_path.display());
                return Ok(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    Err(PipelineError::Config(ConfigError::FileNotFound {
        path: start.join(DEFAULT_CONFIG_FILES[0]),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DEMO: &str = r#"
region: us-east-1
stack_name: demo
cloudformation:
  template_file: t.yaml
  capabilities:
    - CAPABILITY_IAM
  parameters:
    - name: Env
      value: prod
lambda:
  functions:
    - name: fnA
      description: d
      handler: h
      role: r
      runtime: py1
      timeout: 30
      memory_size: 128
s3:
  base_bucket: bucket1
"#;

    #[test]
    fn test_parse_full_config() {
        let parser = ConfigParser::new();
        let document = parser.parse_yaml(DEMO, None).unwrap();

        assert_eq!(document.stack_name().unwrap(), "demo");
        assert_eq!(document.region().unwrap(), "us-east-1");

        let cfn = document.cloudformation().unwrap();
        assert_eq!(cfn.template_file, "t.yaml");
        assert_eq!(cfn.capabilities, vec!["CAPABILITY_IAM"]);
        assert_eq!(cfn.parameters[0].name, "Env");

        let functions = document.functions().unwrap();
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].memory_size, 128);
    }

    #[test]
    fn test_parse_without_schema_checks() {
        // Missing keys are only reported by the consumer that needs them.
        let parser = ConfigParser::new();
        let document = parser.parse_yaml("region: eu-west-1\n", None).unwrap();
        assert!(document.stack_name().is_err());
    }

    #[test]
    fn test_malformed_yaml() {
        let parser = ConfigParser::new();
        let result = parser.parse_yaml("region: [unclosed\n", None);
        assert!(matches!(
            result,
            Err(PipelineError::Config(ConfigError::ParseError { .. }))
        ));
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = ConfigParser::new().load_file(temp.path().join("absent.yaml"));
        assert!(matches!(
            result,
            Err(PipelineError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_load_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, DEMO).unwrap();

        let document = ConfigParser::new().load_file(&path).unwrap();
        assert_eq!(document.base_bucket().unwrap(), "bucket1");
    }

    #[test]
    fn test_apply_overrides() {
        let mut document = ConfigParser::new().parse_yaml(DEMO, None).unwrap();
        ConfigParser::apply_overrides(&mut document, |name| match name {
            "PIPELINE_STACK_NAME" => Some(String::from("demo-staging")),
            "PIPELINE_STACK_BUCKET" => Some(String::from("bucket2")),
            _ => None,
        });

        assert_eq!(document.stack_name().unwrap(), "demo-staging");
        assert_eq!(document.base_bucket().unwrap(), "bucket2");
        assert_eq!(document.region().unwrap(), "us-east-1");
    }

    #[test]
    fn test_dotenv_feeds_env_overrides() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, DEMO).unwrap();
        std::fs::write(
            temp.path().join(".env"),
            "PIPELINE_STACK_REGION=ap-southeast-2\n",
        )
        .unwrap();

        let parser = ConfigParser::new().with_base_path(temp.path());
        parser.load_dotenv().unwrap();
        let document = parser.load_with_env(&path).unwrap();

        assert_eq!(document.region().unwrap(), "ap-southeast-2");
        assert_eq!(document.stack_name().unwrap(), "demo");
    }

    #[test]
    fn test_missing_dotenv_is_ignored() {
        let temp = TempDir::new().unwrap();
        let parser = ConfigParser::new().with_base_path(temp.path());
        assert!(parser.load_dotenv().is_ok());
    }

    #[test]
    fn test_malformed_dotenv() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".env"), "NOT A VALID LINE\n").unwrap();

        let result = ConfigParser::new().with_base_path(temp.path()).load_dotenv();
        assert!(matches!(
            result,
            Err(PipelineError::Config(ConfigError::ParseError { .. }))
        ));
    }

    #[test]
    fn test_find_config_file_in_parent() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("configs")).unwrap();
        std::fs::write(temp.path().join("configs/config.yaml"), DEMO).unwrap();
        let nested = temp.path().join("scripts");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_config_file(&nested).unwrap();
        assert_eq!(found, temp.path().join("configs/config.yaml"));
    }
}
