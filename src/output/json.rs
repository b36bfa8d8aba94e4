//! JSON output formatter for machine processing
//!
//! Reports already derive Serialize; the audit output additionally carries a
//! summary block so consumers do not have to count decisions themselves.

use crate::compat::CompatReport;
use crate::domain::{Advisory, AuditReport, Decision};
use crate::output::{Formatter, Verbosity};
use crate::patch::PatchSet;
use crate::verify::{VerifyEntry, VerifyReport};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    fn write_pretty<T: Serialize>(value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

/// JSON representation of the audit result
#[derive(Serialize)]
struct JsonAudit<'a> {
    /// Whether this was a dry-run
    dry_run: bool,
    /// Summary statistics
    summary: JsonAuditSummary,
    /// Per-package decisions, in processing order
    decisions: &'a [Decision],
    /// Matched advisories (only in verbose mode)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    advisories: Vec<&'a Advisory>,
    /// Errors encountered while applying selections
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<&'a str>,
}

/// JSON audit summary statistics
#[derive(Serialize)]
struct JsonAuditSummary {
    /// Number of packages with a selected upgrade
    selected: usize,
    /// Number of packages left without a selected upgrade
    unresolved: usize,
}

/// JSON representation of the verification result
#[derive(Serialize)]
struct JsonVerify<'a> {
    /// Summary statistics
    summary: JsonVerifySummary,
    /// Verified entries
    entries: Vec<&'a VerifyEntry>,
}

/// JSON verification summary statistics
#[derive(Serialize)]
struct JsonVerifySummary {
    satisfied: usize,
    mismatched: usize,
    missing: usize,
}

impl Formatter for JsonFormatter {
    fn audit(&self, report: &AuditReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let advisories = if self.verbosity == Verbosity::Verbose {
            report.advisories.iter().collect()
        } else {
            Vec::new()
        };

        let output = JsonAudit {
            dry_run: report.dry_run,
            summary: JsonAuditSummary {
                selected: report.selected_count(),
                unresolved: report.unresolved_count(),
            },
            decisions: &report.decisions,
            advisories,
            errors: report.errors.iter().map(|e| e.as_str()).collect(),
        };

        Self::write_pretty(&output, writer)
    }

    fn verify(&self, report: &VerifyReport, writer: &mut dyn Write) -> std::io::Result<()> {
        // Problems only unless verbose
        let entries: Vec<&VerifyEntry> = if self.verbosity == Verbosity::Verbose {
            report.entries.iter().collect()
        } else {
            report.problems().collect()
        };

        let output = JsonVerify {
            summary: JsonVerifySummary {
                satisfied: report.satisfied_count(),
                mismatched: report.mismatch_count(),
                missing: report.missing_count(),
            },
            entries,
        };

        Self::write_pretty(&output, writer)
    }

    fn compat(&self, report: &CompatReport, writer: &mut dyn Write) -> std::io::Result<()> {
        Self::write_pretty(report, writer)
    }

    fn patches(&self, patches: &PatchSet, writer: &mut dyn Write) -> std::io::Result<()> {
        Self::write_pretty(patches, writer)
    }
}
