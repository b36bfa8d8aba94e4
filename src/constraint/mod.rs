//! Composer version-constraint evaluation
//!
//! This module provides:
//! - `ComposerConstraint`: a Composer constraint expression normalized onto
//!   `semver::VersionReq` (hyphen ranges, tilde/caret, comparison operators,
//!   wildcards, `|`/`||` unions)
//! - `RangeEvaluator`: the single-method capability interface the selector
//!   depends on, so the evaluation backend can be swapped without touching
//!   selection logic

mod composer;

pub use composer::ComposerConstraint;

use crate::error::ConstraintError;
use semver::Version;

/// Range-satisfaction oracle: does `version` lie inside `range`?
pub trait RangeEvaluator {
    /// Test membership of a version in a single range expression
    fn satisfies(&self, version: &Version, range: &str) -> Result<bool, ConstraintError>;

    /// Check that a range expression parses at all
    fn is_valid(&self, range: &str) -> bool;
}

/// In-process evaluator backed by the Composer constraint normalizer
#[derive(Debug, Default, Clone, Copy)]
pub struct ComposerRangeEvaluator;

impl ComposerRangeEvaluator {
    /// Create a new evaluator
    pub fn new() -> Self {
        Self
    }
}

impl RangeEvaluator for ComposerRangeEvaluator {
    fn satisfies(&self, version: &Version, range: &str) -> Result<bool, ConstraintError> {
        let constraint = ComposerConstraint::parse(range)?;
        Ok(constraint.matches(version))
    }

    fn is_valid(&self, range: &str) -> bool {
        ComposerConstraint::parse(range).is_ok()
    }
}
