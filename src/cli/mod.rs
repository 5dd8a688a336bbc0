//! CLI module for the pipeline stack tool.
//!
//! This module provides the command-line interface for generating the
//! template, deploying the stack and publishing code archives.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::OutputFormatter;
