//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::deployer::{DEFAULT_ARTIFACTS_DIR, DEFAULT_TEMPLATE_DIR};
use crate::template::DEFAULT_OUTPUT_PATH;

/// Pipeline stack - CloudFormation template generation and Lambda deployment.
#[derive(Parser, Debug)]
#[command(name = "pipeline-stack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true, env = "PIPELINE_STACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a CloudFormation template from the function list.
    Generate {
        /// Where to write the template.
        #[arg(short = 'f', long, default_value = DEFAULT_OUTPUT_PATH)]
        output_file: PathBuf,

        /// Fail on duplicate function names instead of overwriting.
        #[arg(long)]
        strict: bool,
    },

    /// Create or update the stack, then update function code.
    Deploy {
        /// Directory containing the configured template file.
        #[arg(short, long, default_value = DEFAULT_TEMPLATE_DIR)]
        template_dir: PathBuf,

        /// Only deploy the stack; leave function code untouched.
        #[arg(long)]
        skip_code: bool,
    },

    /// Validate the configuration.
    Validate {
        /// Show all warnings, not just errors.
        #[arg(short, long)]
        warnings: bool,
    },

    /// Upload local code archives to the artifact bucket.
    Upload {
        /// Directory containing `<function>.zip` archives.
        #[arg(short, long, default_value = DEFAULT_ARTIFACTS_DIR)]
        artifacts_dir: PathBuf,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_defaults() {
        let cli = Cli::try_parse_from(["pipeline-stack", "generate"]).unwrap();
        match cli.command {
            Commands::Generate {
                output_file,
                strict,
            } => {
                assert_eq!(output_file, PathBuf::from(DEFAULT_OUTPUT_PATH));
                assert!(!strict);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.output, OutputFormat::Text);
    }

    #[test]
    fn test_parse_deploy_with_global_flags() {
        let cli = Cli::try_parse_from([
            "pipeline-stack",
            "deploy",
            "--skip-code",
            "--config",
            "demo.yaml",
            "--output",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("demo.yaml")));
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(matches!(
            cli.command,
            Commands::Deploy {
                skip_code: true,
                ..
            }
        ));
    }
}
