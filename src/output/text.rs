//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Per-decision audit lines with colored outcome markers
//! - Verification problem listing with a satisfied/mismatch/missing summary
//! - Compatibility probe results with blocking packages
//! - Registered patch listing

use crate::compat::CompatReport;
use crate::domain::{AuditReport, Decision, Outcome};
use crate::output::{Formatter, Verbosity};
use crate::patch::PatchSet;
use crate::verify::{VerifyReport, VerifyStatus};
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    /// Outcome marker for one decision
    fn decision_marker(&self, decision: &Decision) -> String {
        let plain = match decision.outcome {
            Outcome::Selected { .. } => "✔",
            Outcome::NoSafeVersion => "✗",
            Outcome::NoValidRanges => "?",
            Outcome::LookupError { .. } => "!",
        };
        if !self.color {
            return plain.to_string();
        }
        match decision.outcome {
            Outcome::Selected { .. } => plain.green().to_string(),
            Outcome::NoSafeVersion => plain.red().to_string(),
            Outcome::NoValidRanges => plain.dimmed().to_string(),
            Outcome::LookupError { .. } => plain.yellow().to_string(),
        }
    }

    fn dry_run_prefix(&self, dry_run: bool) -> String {
        if !dry_run {
            return String::new();
        }
        if self.color {
            format!("{} ", "(dry-run)".cyan())
        } else {
            "(dry-run) ".to_string()
        }
    }
}

impl Formatter for TextFormatter {
    fn audit(&self, report: &AuditReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix(report.dry_run);

        if report.is_clean() {
            if self.color {
                writeln!(
                    writer,
                    "{}{}",
                    prefix,
                    "No advisories affect installed packages".green()
                )?;
            } else {
                writeln!(writer, "{}No advisories affect installed packages", prefix)?;
            }
            return Ok(());
        }

        if self.verbosity == Verbosity::Quiet {
            writeln!(
                writer,
                "{}{} selected, {} unresolved",
                prefix,
                report.selected_count(),
                report.unresolved_count()
            )?;
            return Ok(());
        }

        // Advisory details only in verbose mode
        if self.verbosity == Verbosity::Verbose && !report.advisories.is_empty() {
            if self.color {
                writeln!(writer, "{}:", "Advisories".bold())?;
            } else {
                writeln!(writer, "Advisories:")?;
            }
            for advisory in &report.advisories {
                writeln!(writer, "  {}", advisory)?;
            }
            writeln!(writer)?;
        }

        for decision in &report.decisions {
            writeln!(
                writer,
                "{}  {} {}",
                prefix,
                self.decision_marker(decision),
                decision
            )?;
        }

        if !report.errors.is_empty() {
            writeln!(writer)?;
            if self.color {
                writeln!(writer, "{}:", "Errors".red().bold())?;
            } else {
                writeln!(writer, "Errors:")?;
            }
            for error in &report.errors {
                writeln!(writer, "  - {}", error)?;
            }
        }

        writeln!(writer)?;
        let selected = report.selected_count();
        let unresolved = report.unresolved_count();
        if self.color {
            writeln!(
                writer,
                "{}{}: {} upgrade(s) selected, {} package(s) unresolved",
                prefix,
                "Summary".bold(),
                selected.to_string().green(),
                if unresolved > 0 {
                    unresolved.to_string().red().to_string()
                } else {
                    unresolved.to_string()
                }
            )?;
        } else {
            writeln!(
                writer,
                "{}Summary: {} upgrade(s) selected, {} package(s) unresolved",
                prefix, selected, unresolved
            )?;
        }

        Ok(())
    }

    fn verify(&self, report: &VerifyReport, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            if report.all_satisfied() {
                writeln!(writer, "ok")?;
            } else {
                writeln!(
                    writer,
                    "{} problem(s)",
                    report.mismatch_count() + report.missing_count()
                )?;
            }
            return Ok(());
        }

        // Every entry in verbose mode, problems only otherwise
        for entry in &report.entries {
            let show = self.verbosity == Verbosity::Verbose
                || entry.status != VerifyStatus::Satisfied;
            if !show {
                continue;
            }

            let status = match entry.status {
                VerifyStatus::Satisfied => {
                    if self.color {
                        "ok".green().to_string()
                    } else {
                        "ok".to_string()
                    }
                }
                VerifyStatus::Mismatch => {
                    if self.color {
                        "mismatch".red().to_string()
                    } else {
                        "mismatch".to_string()
                    }
                }
                VerifyStatus::MissingFromLock => {
                    if self.color {
                        "missing from lock".red().to_string()
                    } else {
                        "missing from lock".to_string()
                    }
                }
            };

            let locked = entry.locked.as_deref().unwrap_or("-");
            let dev_marker = if entry.is_dev { " (dev)" } else { "" };
            writeln!(
                writer,
                "  {} {} locked {} [{}]{}",
                entry.package, entry.constraint, locked, status, dev_marker
            )?;
        }

        writeln!(
            writer,
            "Summary: {} satisfied, {} mismatched, {} missing",
            report.satisfied_count(),
            report.mismatch_count(),
            report.missing_count()
        )?;

        Ok(())
    }

    fn compat(&self, report: &CompatReport, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(writer, "drupal/core {} installed", report.current_core)?;

        for probe in &report.probes {
            if probe.compatible {
                let status = if self.color {
                    "compatible".green().to_string()
                } else {
                    "compatible".to_string()
                };
                writeln!(writer, "  core ^{}: {}", probe.target_major, status)?;
            } else {
                let status = if self.color {
                    "blocked".red().to_string()
                } else {
                    "blocked".to_string()
                };
                writeln!(writer, "  core ^{}: {}", probe.target_major, status)?;
                for blocker in &probe.blockers {
                    writeln!(writer, "    - {}", blocker)?;
                }
            }
        }

        Ok(())
    }

    fn patches(&self, patches: &PatchSet, writer: &mut dyn Write) -> std::io::Result<()> {
        if patches.is_empty() {
            writeln!(writer, "No patches registered")?;
            return Ok(());
        }

        for (package, entries) in &patches.0 {
            if self.color {
                writeln!(writer, "{}:", package.bold())?;
            } else {
                writeln!(writer, "{}:", package)?;
            }
            for (description, file) in entries {
                writeln!(writer, "  {} ({})", description, file)?;
            }
        }

        Ok(())
    }
}
