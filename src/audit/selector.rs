//! Safe-upgrade version selection
//!
//! Given the affected ranges from an advisory and the published versions of a
//! package, the selector decides which version (if any) to move to. It is a
//! pure decision function: no side effects until the caller applies the
//! selection.
//!
//! Rules:
//! - Only strict `MAJOR.MINOR.PATCH` versions are candidates; pre-release and
//!   dev tags are never considered. A single leading `v` is tolerated.
//! - Candidates are scanned in ascending version order.
//! - A candidate satisfying any affected range is vulnerable.
//! - A safe candidate is selected when major upgrades are allowed, or when it
//!   shares the installed version's major. A safe candidate blocked by policy
//!   does not stop the scan.

use crate::constraint::RangeEvaluator;
use crate::registry::VersionInfo;
use regex::Regex;
use semver::Version;
use std::sync::OnceLock;

/// Strict three-component numeric version pattern
fn candidate_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("static regex"))
}

/// Result of scanning one package's candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// First safe candidate that also satisfies the major-upgrade policy
    Selected(Version),
    /// Every candidate was vulnerable or blocked by policy
    NoSafeVersion,
}

/// The safe-upgrade selector
pub struct SafeUpgradeSelector<'a> {
    evaluator: &'a dyn RangeEvaluator,
    allow_major: bool,
}

impl<'a> SafeUpgradeSelector<'a> {
    /// Create a selector over the given range evaluator
    pub fn new(evaluator: &'a dyn RangeEvaluator, allow_major: bool) -> Self {
        Self {
            evaluator,
            allow_major,
        }
    }

    /// Whether cross-major selections are permitted
    pub fn allows_major(&self) -> bool {
        self.allow_major
    }

    /// Split a compound affected-versions expression into usable ranges.
    ///
    /// Fragments are separated by `||` or `|` and trimmed; empty or
    /// unparseable fragments are dropped. An empty result means the advisory
    /// payload is unusable, which the caller reports as no-valid-ranges.
    pub fn split_ranges(&self, affected: &str) -> Vec<String> {
        affected
            .replace("||", "|")
            .split('|')
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty() && self.evaluator.is_valid(fragment))
            .map(str::to_string)
            .collect()
    }

    /// Filter published versions down to strict numeric candidates, ascending
    pub fn candidates(published: &[VersionInfo]) -> Vec<Version> {
        let mut candidates: Vec<Version> = published
            .iter()
            .filter_map(|info| {
                let bare = info.version.strip_prefix('v').unwrap_or(&info.version);
                if !candidate_re().is_match(bare) {
                    return None;
                }
                Version::parse(bare).ok()
            })
            .collect();
        candidates.sort();
        candidates
    }

    /// Scan candidates for the first safe, policy-satisfying version
    pub fn select(
        &self,
        installed: &Version,
        candidates: &[Version],
        ranges: &[String],
    ) -> Selection {
        for candidate in candidates {
            // Ranges are pre-validated by split_ranges; an evaluation failure
            // is treated as a match so it can never promote a candidate.
            let vulnerable = ranges.iter().any(|range| {
                self.evaluator
                    .satisfies(candidate, range)
                    .unwrap_or(true)
            });
            if vulnerable {
                continue;
            }

            if self.allow_major || candidate.major == installed.major {
                return Selection::Selected(candidate.clone());
            }
            // Safe but cross-major under a same-major policy: keep scanning.
        }

        Selection::NoSafeVersion
    }
}
