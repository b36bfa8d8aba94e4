//! Dependency verification
//!
//! Checks that every constraint in composer.json is satisfied by the version
//! recorded in composer.lock, and reports packages present in the manifest
//! but missing from the lock. Platform requirements (php, ext-*, lib-*) have
//! no lock entry and are skipped, as are entries whose constraint or locked
//! version cannot be evaluated (dev branches and the like).

use crate::constraint::RangeEvaluator;
use crate::domain::InstalledPackage;
use crate::error::AppError;
use crate::lockfile::{ComposerLock, ComposerManifest};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Verification status of one manifest entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyStatus {
    /// The locked version satisfies the manifest constraint
    Satisfied,
    /// The locked version does not satisfy the manifest constraint
    Mismatch,
    /// The package is required but absent from the lock file
    MissingFromLock,
}

/// One verified manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyEntry {
    /// Package name (vendor/name)
    pub package: String,
    /// Constraint from composer.json
    pub constraint: String,
    /// Version from composer.lock, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<String>,
    /// Whether this entry comes from require-dev
    pub is_dev: bool,
    /// Verification status
    pub status: VerifyStatus,
}

/// Result of verifying a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyReport {
    /// One entry per verified constraint, require then require-dev
    pub entries: Vec<VerifyEntry>,
}

impl VerifyReport {
    /// Number of satisfied entries
    pub fn satisfied_count(&self) -> usize {
        self.count(VerifyStatus::Satisfied)
    }

    /// Number of mismatched entries
    pub fn mismatch_count(&self) -> usize {
        self.count(VerifyStatus::Mismatch)
    }

    /// Number of entries missing from the lock
    pub fn missing_count(&self) -> usize {
        self.count(VerifyStatus::MissingFromLock)
    }

    /// True when every entry is satisfied
    pub fn all_satisfied(&self) -> bool {
        self.entries
            .iter()
            .all(|e| e.status == VerifyStatus::Satisfied)
    }

    /// Entries that are not satisfied, in order
    pub fn problems(&self) -> impl Iterator<Item = &VerifyEntry> {
        self.entries
            .iter()
            .filter(|e| e.status != VerifyStatus::Satisfied)
    }

    fn count(&self, status: VerifyStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }
}

/// Verify a project's lock file against its manifest
pub fn verify_project(
    project: &Path,
    evaluator: &dyn RangeEvaluator,
) -> Result<VerifyReport, AppError> {
    let manifest = ComposerManifest::load(project)?;
    let lock = ComposerLock::load(project)?;

    let mut entries = Vec::new();
    for (name, constraint, is_dev) in manifest.constraints() {
        if InstalledPackage::is_platform(name) {
            continue;
        }
        if !evaluator.is_valid(constraint) {
            // dev-main and friends cannot be evaluated; leave them alone
            continue;
        }

        let Some(locked) = lock.find(name) else {
            entries.push(VerifyEntry {
                package: name.to_string(),
                constraint: constraint.to_string(),
                locked: None,
                is_dev,
                status: VerifyStatus::MissingFromLock,
            });
            continue;
        };

        let Ok(version) = Version::parse(locked.bare_version()) else {
            continue;
        };

        let satisfied = evaluator.satisfies(&version, constraint).unwrap_or(false);
        entries.push(VerifyEntry {
            package: name.to_string(),
            constraint: constraint.to_string(),
            locked: Some(locked.version.clone()),
            is_dev,
            status: if satisfied {
                VerifyStatus::Satisfied
            } else {
                VerifyStatus::Mismatch
            },
        });
    }

    Ok(VerifyReport { entries })
}
