//! Per-package upgrade decision types
//!
//! The selector classifies every audited package into exactly one outcome.
//! A `Decision` pairs that outcome with the package identity so the report
//! and the generated upgrade script can render it without further lookups.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of the safe-upgrade selection for one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// A safe, policy-satisfying version was found
    Selected {
        /// The version to upgrade to
        version: String,
    },
    /// The advisory carried no usable ranges after splitting and trimming
    NoValidRanges,
    /// Every candidate was vulnerable or blocked by the major-upgrade policy
    NoSafeVersion,
    /// Version lookup against the registry failed
    LookupError {
        /// Human-readable failure description
        message: String,
    },
}

impl Outcome {
    /// Returns true if a version was selected
    pub fn is_selected(&self) -> bool {
        matches!(self, Outcome::Selected { .. })
    }

    /// Returns the selected version, if any
    pub fn selected_version(&self) -> Option<&str> {
        match self {
            Outcome::Selected { version } => Some(version),
            _ => None,
        }
    }
}

/// The decision recorded for one audited package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Package the decision applies to (vendor/name)
    pub package: String,
    /// Installed version at audit time
    pub installed: String,
    /// Selection outcome
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl Decision {
    /// Creates a Selected decision
    pub fn selected(
        package: impl Into<String>,
        installed: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            installed: installed.into(),
            outcome: Outcome::Selected {
                version: version.into(),
            },
        }
    }

    /// Creates a NoValidRanges decision
    pub fn no_valid_ranges(package: impl Into<String>, installed: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            installed: installed.into(),
            outcome: Outcome::NoValidRanges,
        }
    }

    /// Creates a NoSafeVersion decision
    pub fn no_safe_version(package: impl Into<String>, installed: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            installed: installed.into(),
            outcome: Outcome::NoSafeVersion,
        }
    }

    /// Creates a LookupError decision
    pub fn lookup_error(
        package: impl Into<String>,
        installed: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            installed: installed.into(),
            outcome: Outcome::LookupError {
                message: message.into(),
            },
        }
    }

    /// Returns true if a version was selected for this package
    pub fn is_selected(&self) -> bool {
        self.outcome.is_selected()
    }

    /// The `package:version` line consumed by the generated upgrade script.
    /// Column order must stay `package` then `version`.
    pub fn script_line(&self) -> Option<String> {
        self.outcome
            .selected_version()
            .map(|v| format!("{}:{}", self.package, v))
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Selected { version } => {
                write!(f, "{}: {} → {}", self.package, self.installed, version)
            }
            Outcome::NoValidRanges => {
                write!(f, "{}: no valid ranges in advisory", self.package)
            }
            Outcome::NoSafeVersion => {
                write!(f, "{}: no safe upgrade available", self.package)
            }
            Outcome::LookupError { message } => {
                write!(f, "{}: lookup failed: {}", self.package, message)
            }
        }
    }
}
