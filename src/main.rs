//! Pipeline stack CLI entrypoint.
//!
//! This is the main entrypoint for the pipeline-stack command-line tool.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use pipeline_stack::aws::AwsClients;
use pipeline_stack::cli::{Cli, Commands, OutputFormatter};
use pipeline_stack::config::{ConfigDocument, ConfigParser, ConfigValidator, find_config_file};
use pipeline_stack::deployer::{ArtifactPublisher, StackDeployer};
use pipeline_stack::error::Result;
use pipeline_stack::template::TemplateGenerator;

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point. Returns whether the command fully succeeded.
async fn run(cli: Cli) -> Result<bool> {
    let formatter = OutputFormatter::new(cli.output);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate {
            output_file,
            strict,
        } => cmd_generate(&config, &output_file, strict, &formatter),
        Commands::Deploy {
            template_dir,
            skip_code,
        } => cmd_deploy(&config, &template_dir, skip_code, &formatter).await,
        Commands::Validate { warnings } => cmd_validate(&config, warnings, &formatter),
        Commands::Upload { artifacts_dir } => {
            cmd_upload(&config, &artifacts_dir, &formatter).await
        }
    }
}

/// Generate the CloudFormation template.
fn cmd_generate(
    config: &ConfigDocument,
    output_file: &Path,
    strict: bool,
    formatter: &OutputFormatter,
) -> Result<bool> {
    let generator = TemplateGenerator::new().with_strict_names(strict);
    let template = generator.generate_file(config, output_file)?;

    emit(&formatter.format_generated(&template, output_file))?;
    Ok(true)
}

/// Deploy the stack and update function code.
async fn cmd_deploy(
    config: &ConfigDocument,
    template_dir: &Path,
    skip_code: bool,
    formatter: &OutputFormatter,
) -> Result<bool> {
    let region = config.region()?;
    let clients = AwsClients::from_region(Some(&region)).await;

    let deployer = StackDeployer::new(clients.stacks(), clients.functions())
        .with_template_dir(template_dir)
        .with_code_updates(!skip_code);
    let report = deployer.deploy(config).await?;

    if !report.is_success() {
        warn!(
            "Deployment finished with errors: {} function update(s) failed",
            report.failed_functions().len()
        );
    }

    emit(&formatter.format_deployment(&report))?;
    Ok(report.is_success())
}

/// Validate the configuration.
fn cmd_validate(
    config: &ConfigDocument,
    show_warnings: bool,
    formatter: &OutputFormatter,
) -> Result<bool> {
    let result = ConfigValidator::new().check(config);

    emit(&formatter.format_validation(&result, show_warnings))?;
    Ok(result.is_valid())
}

/// Upload local code archives.
async fn cmd_upload(
    config: &ConfigDocument,
    artifacts_dir: &Path,
    formatter: &OutputFormatter,
) -> Result<bool> {
    let region = config.region()?;
    let clients = AwsClients::from_region(Some(&region)).await;

    let report = ArtifactPublisher::new(clients.artifacts())
        .publish(config, artifacts_dir)
        .await?;

    emit(&formatter.format_publish(&report))?;
    Ok(report.is_success())
}

/// Resolves the configuration path, loads `.env` beside it, and loads the
/// document with environment overrides applied.
fn load_config(config_path: Option<&Path>) -> Result<ConfigDocument> {
    let config_file = resolve_config_path(config_path)?;

    let parser = ConfigParser::new().with_base_path(
        config_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new(".")),
    );
    parser.load_dotenv()?;

    let config = parser.load_with_env(&config_file)?;
    info!("Using configuration: {}", config_file.display());
    Ok(config)
}

/// Resolves the configuration file path.
fn resolve_config_path(config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        debug!("Using configuration from --config: {}", path.display());
        return Ok(path.to_path_buf());
    }

    let cwd = std::env::current_dir()?;
    find_config_file(&cwd)
}

/// Writes command output to stdout.
fn emit(output: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    if !output.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}
