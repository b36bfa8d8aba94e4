//! Output formatting for maintenance reports
//!
//! This module provides:
//! - Text output for human-readable display
//! - JSON output for machine processing

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::compat::CompatReport;
use crate::domain::AuditReport;
use crate::patch::PatchSet;
use crate::verify::VerifyReport;
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Minimal output
    Quiet,
    /// Normal output
    #[default]
    Normal,
    /// Detailed output with additional information
    Verbose,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Output format (text, json)
    pub format: OutputFormat,
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Whether to use colors (when supported)
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            verbosity: Verbosity::default(),
            color: true,
        }
    }
}

impl OutputConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(json: bool, verbose: bool, quiet: bool) -> Self {
        let format = if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };

        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Self {
            format,
            verbosity,
            color: true,
        }
    }
}

/// Trait for report formatters
pub trait Formatter {
    /// Format and write an audit report
    fn audit(&self, report: &AuditReport, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Format and write a verification report
    fn verify(&self, report: &VerifyReport, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Format and write a compatibility report
    fn compat(&self, report: &CompatReport, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Format and write the registered patches
    fn patches(&self, patches: &PatchSet, writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Create a formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn Formatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::new(config.verbosity)),
        OutputFormat::Json => Box::new(JsonFormatter::new(config.verbosity)),
    }
}
