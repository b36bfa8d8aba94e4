//! Drupal-core major-version compatibility scanning
//!
//! For each target core major the scan asks composer whether
//! `drupal/core:^{major}` would resolve, via the dry-run mode of `require`.
//! A failed resolution is parsed for the packages whose core requirement
//! blocks the move.

use crate::composer::{composer_require_dry_run, CommandRunner};
use crate::error::{AppError, LockError};
use crate::lockfile::ComposerLock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Matches composer conflict lines such as
/// `    - drupal/token 1.9.0 requires drupal/core ^8.7.7 || ^9 -> ...`
fn conflict_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*-\s+([a-z0-9_.-]+/[a-z0-9_.-]+)\s+\S+\s+requires\s+drupal/core\s")
            .expect("static regex")
    })
}

/// Result of probing one target core major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatProbe {
    /// The probed core major version
    pub target_major: u64,
    /// Whether the project resolved against that core line
    pub compatible: bool,
    /// Packages blocking the move, when incompatible
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blockers: Vec<String>,
}

/// Result of a full compatibility scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatReport {
    /// The locked drupal/core version
    pub current_core: String,
    /// One probe per target, in the order given
    pub probes: Vec<CompatProbe>,
}

impl CompatReport {
    /// True when every probed target resolves
    pub fn all_compatible(&self) -> bool {
        self.probes.iter().all(|p| p.compatible)
    }
}

/// Probe the project against one or more target core majors.
/// With no explicit targets the major after the locked core is probed.
pub fn scan(
    project: &Path,
    targets: &[u64],
    runner: &dyn CommandRunner,
) -> Result<CompatReport, AppError> {
    let lock = ComposerLock::load(project)?;
    let core = lock.find("drupal/core").ok_or_else(|| {
        AppError::Lock(LockError::package_not_locked("drupal/core", lock.path.clone()))
    })?;

    let current_core = core.bare_version().to_string();
    let current_major = current_core
        .split('.')
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(|| {
            AppError::Lock(LockError::json_parse_error(
                lock.path.clone(),
                format!("unrecognized drupal/core version '{}'", core.version),
            ))
        })?;

    let targets: Vec<u64> = if targets.is_empty() {
        vec![current_major + 1]
    } else {
        targets.to_vec()
    };

    let mut probes = Vec::with_capacity(targets.len());
    for target_major in targets {
        let requirement = format!("drupal/core:^{}", target_major);
        let output = composer_require_dry_run(runner, project, &requirement)
            .map_err(AppError::Command)?;

        if output.success() {
            probes.push(CompatProbe {
                target_major,
                compatible: true,
                blockers: Vec::new(),
            });
        } else {
            let combined = format!("{}\n{}", output.stdout, output.stderr);
            probes.push(CompatProbe {
                target_major,
                compatible: false,
                blockers: extract_blockers(&combined),
            });
        }
    }

    Ok(CompatReport {
        current_core,
        probes,
    })
}

/// Pull the blocking package names out of composer's conflict output
fn extract_blockers(output: &str) -> Vec<String> {
    let mut blockers = Vec::new();
    for capture in conflict_re().captures_iter(output) {
        let package = capture[1].to_string();
        if package != "drupal/core" && !blockers.contains(&package) {
            blockers.push(package);
        }
    }
    blockers
}
