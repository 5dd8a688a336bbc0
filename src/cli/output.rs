//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use std::fmt::Write;
use std::path::Path;
use tabled::{Table, Tabled};

use crate::config::{ConfigHasher, ValidationResult};
use crate::deployer::{DeploymentReport, PublishReport, StackOutcome};
use crate::template::CloudFormationTemplate;

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Function update row for table display.
#[derive(Tabled)]
struct FunctionRow {
    #[tabled(rename = "Function")]
    name: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Error")]
    error: String,
}

/// Archive upload row for table display.
#[derive(Tabled)]
struct UploadRow {
    #[tabled(rename = "Function")]
    name: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Archive")]
    archive: String,
    #[tabled(rename = "Key")]
    key: String,
}

/// Template resource row for table display.
#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Resource")]
    name: String,
    #[tabled(rename = "Runtime")]
    runtime: String,
    #[tabled(rename = "Handler")]
    handler: String,
    #[tabled(rename = "Code")]
    code: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the result of template generation.
    #[must_use]
    pub fn format_generated(&self, template: &CloudFormationTemplate, path: &Path) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
                "path": path,
                "resource_count": template.resource_count(),
                "resources": template.resource_names(),
            }))
            .unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = format!(
                    "{} CloudFormation template generated at {}\n",
                    "✓".green(),
                    path.display()
                );

                if template.resources.is_empty() {
                    output.push_str("   No functions declared; template has no resources.\n");
                    return output;
                }

                let rows: Vec<ResourceRow> = template
                    .resources
                    .iter()
                    .map(|(name, resource)| ResourceRow {
                        name: name.clone(),
                        runtime: resource.properties.runtime.clone(),
                        handler: Self::truncate(&resource.properties.handler, 30),
                        code: format!(
                            "s3://{}/{}",
                            resource.properties.code.s3_bucket, resource.properties.code.s3_key
                        ),
                    })
                    .collect();

                output.push('\n');
                output.push_str(&Table::new(rows).to_string());
                output.push('\n');
                output
            }
        }
    }

    /// Formats a deployment report.
    #[must_use]
    pub fn format_deployment(&self, report: &DeploymentReport) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Text => Self::format_deployment_text(report),
        }
    }

    /// Formats a deployment report as text.
    fn format_deployment_text(report: &DeploymentReport) -> String {
        let mut output = String::new();

        let _ = write!(
            output,
            "\nStack {} ({})\n",
            report.stack_name.bold(),
            report.template_path.display()
        );
        let _ = writeln!(
            output,
            "   Template digest: {}",
            ConfigHasher::short(&report.template_digest)
        );
        let _ = writeln!(output, "   Stack: {}", Self::format_stack_outcome(&report.stack));

        if !report.functions.is_empty() {
            let rows: Vec<FunctionRow> = report
                .functions
                .iter()
                .map(|f| FunctionRow {
                    name: f.function_name.clone(),
                    result: if f.success {
                        "updated".green().to_string()
                    } else {
                        "failed".red().to_string()
                    },
                    code: f.code_sha256.as_deref().map_or_else(String::new, |sha| {
                        Self::truncate(sha, 16)
                    }),
                    error: f
                        .error
                        .as_deref()
                        .map_or_else(String::new, |e| Self::truncate(e, 50)),
                })
                .collect();

            output.push('\n');
            output.push_str(&Table::new(rows).to_string());
            output.push('\n');
        }

        let elapsed = report.finished_at - report.started_at;
        let status = if report.is_success() {
            format!("{} Deployment successful", "✓".green())
        } else {
            format!("{} Deployment finished with errors", "✗".red())
        };
        let _ = write!(
            output,
            "\n{status} ({}/{} functions updated, {} ms, run {})\n",
            report.updated_count(),
            report.functions.len(),
            elapsed.num_milliseconds(),
            report.run_id
        );

        output
    }

    /// Formats an upload report.
    #[must_use]
    pub fn format_publish(&self, report: &PublishReport) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Text => {
                if report.uploads.is_empty() {
                    return format!("{} No functions declared; nothing to upload.\n", "✓".green());
                }

                let rows: Vec<UploadRow> = report
                    .uploads
                    .iter()
                    .map(|u| UploadRow {
                        name: u.function_name.clone(),
                        result: if u.success {
                            "uploaded".green().to_string()
                        } else {
                            "failed".red().to_string()
                        },
                        archive: u.local_path.display().to_string(),
                        key: u.s3_key.clone(),
                    })
                    .collect();

                let mut output = String::from("\n");
                output.push_str(&Table::new(rows).to_string());
                output.push('\n');

                let _ = write!(
                    output,
                    "\nUploaded {}/{} archives to s3://{}\n",
                    report.uploaded_count(),
                    report.uploads.len(),
                    report.bucket
                );

                for upload in report.uploads.iter().filter(|u| !u.success) {
                    let _ = writeln!(
                        output,
                        "   {} {}: {}",
                        "✗".red(),
                        upload.function_name,
                        upload.error.as_deref().unwrap_or("unknown error")
                    );
                }

                output
            }
        }
    }

    /// Formats a validation result.
    #[must_use]
    pub fn format_validation(&self, result: &ValidationResult, show_warnings: bool) -> String {
        match self.format {
            OutputFormat::Json => {
                let errors: Vec<_> = result
                    .errors
                    .iter()
                    .map(|e| serde_json::json!({ "field": e.field, "message": e.message }))
                    .collect();
                let warnings: &[String] = if show_warnings { &result.warnings } else { &[] };
                serde_json::to_string_pretty(&serde_json::json!({
                    "valid": result.is_valid(),
                    "errors": errors,
                    "warnings": warnings,
                }))
                .unwrap_or_default()
            }
            OutputFormat::Text => {
                let mut output = if result.is_valid() {
                    format!("{} Configuration is valid!\n", "✓".green())
                } else {
                    let mut text = format!(
                        "{} Configuration has {} error(s):\n",
                        "✗".red(),
                        result.error_count()
                    );
                    for error in &result.errors {
                        let _ = writeln!(text, "   - {error}");
                    }
                    text
                };

                if show_warnings && !result.warnings.is_empty() {
                    let _ = write!(output, "\n{} Warnings:\n", "⚠".yellow());
                    for warning in &result.warnings {
                        let _ = writeln!(output, "   - {warning}");
                    }
                }

                output
            }
        }
    }

    /// Formats a stack outcome with color.
    fn format_stack_outcome(outcome: &StackOutcome) -> String {
        match outcome {
            StackOutcome::Created { .. } => outcome.to_string().green().to_string(),
            StackOutcome::Updated { .. } => outcome.to_string().yellow().to_string(),
            StackOutcome::Unchanged => outcome.to_string().dimmed().to_string(),
            StackOutcome::Failed { .. } => outcome.to_string().red().to_string(),
        }
    }

    /// Truncates a string to a maximum number of characters.
    fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else {
            let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
            format!("{head}...")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationError;
    use crate::deployer::FunctionUpdateResult;
    use chrono::Utc;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn report() -> DeploymentReport {
        let now = Utc::now();
        DeploymentReport {
            run_id: Uuid::new_v4(),
            stack_name: String::from("demo"),
            template_path: PathBuf::from("infra/cloudformation/t.yaml"),
            template_digest: String::from("0123456789abcdef0123"),
            functions_digest: String::new(),
            started_at: now,
            finished_at: now,
            stack: StackOutcome::Unchanged,
            functions: vec![FunctionUpdateResult {
                function_name: String::from("fnA"),
                s3_bucket: String::from("bucket1"),
                s3_key: String::from("lambda/fnA.zip"),
                success: false,
                code_sha256: None,
                error: Some(String::from("Function not found")),
                error_code: Some(String::from("ResourceNotFoundException")),
            }],
        }
    }

    #[test]
    fn test_deployment_json() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter.format_deployment(&report());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["stack_name"], "demo");
        assert_eq!(value["stack"]["action"], "unchanged");
        assert_eq!(value["functions"][0]["success"], false);
        assert_eq!(value["functions"][0]["error_code"], "ResourceNotFoundException");
    }

    #[test]
    fn test_deployment_text_lists_failures() {
        colored::control::set_override(false);
        let formatter = OutputFormatter::new(OutputFormat::Text);
        let output = formatter.format_deployment(&report());

        assert!(output.contains("fnA"));
        assert!(output.contains("Function not found"));
        assert!(output.contains("finished with errors"));
        assert!(output.contains("0123456789ab"));
    }

    #[test]
    fn test_validation_json() {
        let result = ValidationResult {
            errors: vec![ValidationError {
                field: String::from("stack_name"),
                message: String::from("is required"),
            }],
            warnings: vec![String::from("unused")],
        };

        let formatter = OutputFormatter::new(OutputFormat::Json);
        let value: serde_json::Value =
            serde_json::from_str(&formatter.format_validation(&result, false)).unwrap();
        assert_eq!(value["valid"], false);
        assert_eq!(value["errors"][0]["field"], "stack_name");
        assert!(value["warnings"].as_array().is_some_and(Vec::is_empty));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(OutputFormatter::truncate("short", 10), "short");
        assert_eq!(OutputFormatter::truncate("abcdefghijkl", 8), "abcde...");
    }
}
