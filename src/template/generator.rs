//! Template generator.
//!
//! Maps the declared function list onto a CloudFormation template and
//! writes it to disk.

use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::{ConfigDocument, ConfigHasher, ConfigValidator};
use crate::error::{ConfigError, PipelineError, Result, TemplateError};

use super::types::{CloudFormationTemplate, LambdaResource};

/// Default output path of the generated template.
pub const DEFAULT_OUTPUT_PATH: &str = "infra/cloudformation/generated_pipeline.yaml";

/// Generator for CloudFormation templates.
#[derive(Debug, Default)]
pub struct TemplateGenerator {
    /// Reject duplicate names and invalid descriptors.
    strict_names: bool,
    /// Digest computation for logging.
    hasher: ConfigHasher,
}

impl TemplateGenerator {
    /// Creates a new generator. Duplicate names overwrite earlier entries.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            strict_names: false,
            hasher: ConfigHasher::new(),
        }
    }

    /// Sets strict mode: duplicate function names are an error and every
    /// descriptor must pass [`ConfigValidator::validate_functions`].
    #[must_use]
    pub const fn with_strict_names(mut self, strict_names: bool) -> Self {
        self.strict_names = strict_names;
        self
    }

    /// Generates a template with one resource per declared function.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `lambda.functions` is absent or
    /// malformed, if `s3.base_bucket` is missing while functions are
    /// declared, or in strict mode on a duplicate name or an invalid
    /// descriptor.
    pub fn generate(&self, document: &ConfigDocument) -> Result<CloudFormationTemplate> {
        let functions = document.functions()?;
        let mut template = CloudFormationTemplate::new();

        if functions.is_empty() {
            warn!("No functions declared; generating a template without resources");
            return Ok(template);
        }

        let bucket = document.base_bucket()?;

        for function in &functions {
            if self.strict_names && template.resources.contains_key(&function.name) {
                return Err(PipelineError::Config(ConfigError::DuplicateName {
                    resource_type: String::from("function"),
                    name: function.name.clone(),
                }));
            }

            debug!("Adding resource for function: {}", function.name);
            let resource = LambdaResource::from_function(function, &bucket);
            if template.resources.insert(function.name.clone(), resource).is_some() {
                warn!(
                    "Duplicate function name '{}'; the later definition replaces the earlier one",
                    function.name
                );
            }
        }

        if self.strict_names {
            ConfigValidator::new().validate_functions(&functions)?;
        }

        info!(
            "Generated template with {} resources from {} declared functions",
            template.resource_count(),
            functions.len()
        );

        Ok(template)
    }

    /// Serializes a template to YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render(&self, template: &CloudFormationTemplate) -> Result<String> {
        serde_yaml::to_string(template).map_err(|e| {
            PipelineError::Template(TemplateError::Serialization {
                message: e.to_string(),
            })
        })
    }

    /// Writes a template to `path`, creating parent directories and
    /// overwriting any existing file.
    ///
    /// # Errors
    ///
    /// Returns `WriteFailed` if the directory or file cannot be written.
    pub fn write(&self, template: &CloudFormationTemplate, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let body = self.render(template)?;

        let write_failed = |e: std::io::Error| {
            PipelineError::Template(TemplateError::WriteFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_failed)?;
        }
        std::fs::write(path, &body).map_err(write_failed)?;

        info!(
            "CloudFormation template generated at {} (sha256 {})",
            path.display(),
            ConfigHasher::short(&self.hasher.hash_template(&body))
        );
        Ok(())
    }

    /// Generates the template for `document` and writes it to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if generation or writing fails.
    pub fn generate_file(
        &self,
        document: &ConfigDocument,
        path: impl AsRef<Path>,
    ) -> Result<CloudFormationTemplate> {
        let template = self.generate(document)?;
        self.write(&template, path)?;
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigParser;
    use crate::template::{LAMBDA_FUNCTION_TYPE, TEMPLATE_FORMAT_VERSION};
    use tempfile::TempDir;

    fn document(yaml: &str) -> ConfigDocument {
        ConfigParser::new().parse_yaml(yaml, None).unwrap()
    }

    fn function_yaml(name: &str, timeout: u32) -> String {
        format!(
            "    - {{name: {name}, description: d, handler: h, role: r, runtime: py1, timeout: {timeout}, memory_size: 128}}\n"
        )
    }

    fn with_functions(functions: &str) -> ConfigDocument {
        document(&format!(
            "stack_name: demo\ns3:\n  base_bucket: bucket1\nlambda:\n  functions:\n{functions}"
        ))
    }

    #[test]
    fn test_demo_scenario() {
        let template = TemplateGenerator::new()
            .generate(&with_functions(&function_yaml("fnA", 30)))
            .unwrap();

        assert_eq!(template.format_version, TEMPLATE_FORMAT_VERSION);
        assert_eq!(template.resource_names(), vec!["fnA"]);

        let resource = &template.resources["fnA"];
        assert_eq!(resource.resource_type, LAMBDA_FUNCTION_TYPE);
        assert_eq!(resource.properties.function_name, "fnA");
        assert_eq!(resource.properties.timeout, 30);
        assert_eq!(resource.properties.memory_size, 128);
        assert_eq!(resource.properties.code.s3_bucket, "bucket1");
        assert_eq!(resource.properties.code.s3_key, "lambda/fnA.zip");
    }

    #[test]
    fn test_one_resource_per_function() {
        let functions: String = ["train", "evaluate", "deploy", "register"]
            .iter()
            .map(|name| function_yaml(name, 60))
            .collect();
        let template = TemplateGenerator::new()
            .generate(&with_functions(&functions))
            .unwrap();

        assert_eq!(template.resource_count(), 4);
        for (name, resource) in &template.resources {
            assert_eq!(resource.properties.code.s3_key, format!("lambda/{name}.zip"));
        }
    }

    #[test]
    fn test_empty_function_list() {
        let template = TemplateGenerator::new()
            .generate(&document("lambda:\n  functions: []\n"))
            .unwrap();
        assert_eq!(template.resource_count(), 0);
    }

    #[test]
    fn test_missing_functions_is_config_error() {
        let result = TemplateGenerator::new().generate(&document("s3:\n  base_bucket: b\n"));
        assert!(matches!(
            result,
            Err(PipelineError::Config(ConfigError::MissingField { .. }))
        ));

        let result = TemplateGenerator::new()
            .generate(&document("lambda:\n  functions: {name: fnA}\n"));
        assert!(matches!(
            result,
            Err(PipelineError::Config(ConfigError::InvalidField { .. }))
        ));
    }

    #[test]
    fn test_duplicate_names_overwrite() {
        let functions = format!("{}{}", function_yaml("fnA", 30), function_yaml("fnA", 90));
        let template = TemplateGenerator::new()
            .generate(&with_functions(&functions))
            .unwrap();

        assert_eq!(template.resource_count(), 1);
        assert_eq!(template.resources["fnA"].properties.timeout, 90);
    }

    #[test]
    fn test_duplicate_names_strict() {
        let functions = format!("{}{}", function_yaml("fnA", 30), function_yaml("fnA", 90));
        let result = TemplateGenerator::new()
            .with_strict_names(true)
            .generate(&with_functions(&functions));

        assert!(matches!(
            result,
            Err(PipelineError::Config(ConfigError::DuplicateName { .. }))
        ));
    }

    #[test]
    fn test_strict_rejects_invalid_descriptor() {
        let functions = "    - {name: 'bad name!', description: d, handler: '', role: r, runtime: py1, timeout: 0, memory_size: 1}\n";
        let document = with_functions(functions);

        let result = TemplateGenerator::new()
            .with_strict_names(true)
            .generate(&document);
        assert!(matches!(
            result,
            Err(PipelineError::Config(ConfigError::ValidationError { .. }))
        ));

        let template = TemplateGenerator::new().generate(&document).unwrap();
        assert_eq!(template.resource_count(), 1);
    }

    #[test]
    fn test_strict_accepts_valid_descriptors() {
        let functions = format!("{}{}", function_yaml("fnA", 30), function_yaml("fnB", 900));
        let template = TemplateGenerator::new()
            .with_strict_names(true)
            .generate(&with_functions(&functions))
            .unwrap();
        assert_eq!(template.resource_names(), vec!["fnA", "fnB"]);
    }

    #[test]
    fn test_render_round_trip() {
        let functions = format!("{}{}", function_yaml("fnB", 30), function_yaml("fnA", 45));
        let generator = TemplateGenerator::new();
        let template = generator.generate(&with_functions(&functions)).unwrap();

        let rendered = generator.render(&template).unwrap();
        let parsed: CloudFormationTemplate = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(parsed, template);

        let as_value: serde_yaml::Value = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(as_value, serde_yaml::to_value(&template).unwrap());
        assert!(rendered.contains("AWSTemplateFormatVersion"));
        assert!(rendered.contains("S3Key: lambda/fnA.zip"));
    }

    #[test]
    fn test_write_creates_directories_and_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("infra/cloudformation/generated_pipeline.yaml");
        let generator = TemplateGenerator::new();

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "stale: true\n").unwrap();

        let template = generator
            .generate_file(&with_functions(&function_yaml("fnA", 30)), &path)
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("stale"));
        let parsed: CloudFormationTemplate = serde_yaml::from_str(&written).unwrap();
        assert_eq!(parsed, template);
    }

    #[test]
    fn test_write_into_fresh_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a/b/c/template.yaml");

        TemplateGenerator::new()
            .write(&CloudFormationTemplate::new(), &path)
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_to_unwritable_path() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let result = TemplateGenerator::new()
            .write(&CloudFormationTemplate::new(), blocker.join("template.yaml"));
        assert!(matches!(
            result,
            Err(PipelineError::Template(TemplateError::WriteFailed { .. }))
        ));
    }
}
