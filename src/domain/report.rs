//! Audit report accumulation
//!
//! Decisions accumulate in memory, in input order, and are rendered once at
//! the end of the run. Nothing is written incrementally.

use super::{Advisory, Decision};
use serde::{Deserialize, Serialize};

/// Result of a full audit run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    /// One decision per audited package, in processing order
    pub decisions: Vec<Decision>,
    /// Advisories that matched locked packages, for display
    pub advisories: Vec<Advisory>,
    /// Whether the run was a dry run (nothing applied)
    pub dry_run: bool,
    /// Non-fatal errors from applying selections (the run continued)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl AuditReport {
    /// Creates an empty report
    pub fn new(dry_run: bool) -> Self {
        Self {
            decisions: Vec::new(),
            advisories: Vec::new(),
            dry_run,
            errors: Vec::new(),
        }
    }

    /// Records an advisory that matched a locked package
    pub fn add_advisory(&mut self, advisory: Advisory) {
        self.advisories.push(advisory);
    }

    /// Records the decision for one package
    pub fn add_decision(&mut self, decision: Decision) {
        self.decisions.push(decision);
    }

    /// Records a non-fatal error (e.g. a failed apply)
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    /// Number of packages with a selected upgrade
    pub fn selected_count(&self) -> usize {
        self.decisions.iter().filter(|d| d.is_selected()).count()
    }

    /// Number of packages left without a selected upgrade
    pub fn unresolved_count(&self) -> usize {
        self.decisions.len() - self.selected_count()
    }

    /// All decisions with a selected upgrade, in processing order
    pub fn selections(&self) -> impl Iterator<Item = &Decision> {
        self.decisions.iter().filter(|d| d.is_selected())
    }

    /// True when every audited package got a selected upgrade
    pub fn fully_resolved(&self) -> bool {
        self.unresolved_count() == 0
    }

    /// True when the audit found nothing to do
    pub fn is_clean(&self) -> bool {
        self.decisions.is_empty()
    }

    /// True when every decision selected an upgrade and nothing failed to apply
    pub fn is_success(&self) -> bool {
        self.fully_resolved() && self.errors.is_empty()
    }
}

impl Default for AuditReport {
    fn default() -> Self {
        Self::new(false)
    }
}
