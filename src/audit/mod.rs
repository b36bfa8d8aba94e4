//! Security audit workflow
//!
//! This module coordinates the audit: read the lock file, fetch advisories,
//! run the safe-upgrade selector per vulnerable package, then apply the
//! selections or emit the batch upgrade script. Packages are evaluated one at
//! a time; a failure for one package never aborts the run. Only an unreadable
//! project or an unreachable advisory feed is fatal.

mod selector;

pub use selector::{SafeUpgradeSelector, Selection};

use crate::composer::{composer_require, CommandRunner};
use crate::constraint::RangeEvaluator;
use crate::domain::{Advisory, AuditReport, Decision, InstalledPackage};
use crate::error::AppError;
use crate::lockfile::ComposerLock;
use crate::progress::Progress;
use crate::registry::PackageRegistry;
use crate::script::write_upgrade_script;
use semver::Version;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Audit configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct AuditOptions {
    /// Permit upgrades across a major-version boundary
    pub allow_major: bool,
    /// Skip packages from the require-dev section
    pub no_dev: bool,
    /// Audit only these packages (empty = all)
    pub only: Vec<String>,
    /// Never audit these packages
    pub exclude: Vec<String>,
    /// Report only; do not apply or write a script
    pub dry_run: bool,
    /// Apply each selection immediately via composer require
    pub apply: bool,
    /// Accumulate selections into a batch script at this path
    pub script: Option<PathBuf>,
    /// Show progress indicators
    pub show_progress: bool,
}

impl AuditOptions {
    /// Check whether a locked package is in scope for this audit
    fn in_scope(&self, package: &InstalledPackage) -> bool {
        if InstalledPackage::is_platform(&package.name) {
            return false;
        }
        if self.no_dev && package.is_dev {
            return false;
        }
        if !self.only.is_empty() {
            return self.only.iter().any(|p| p == &package.name);
        }
        !self.exclude.iter().any(|p| p == &package.name)
    }
}

/// Coordinates one audit run
pub struct Auditor<'a> {
    registry: &'a dyn PackageRegistry,
    evaluator: &'a dyn RangeEvaluator,
    runner: &'a dyn CommandRunner,
    options: AuditOptions,
}

impl<'a> Auditor<'a> {
    /// Create a new auditor
    pub fn new(
        registry: &'a dyn PackageRegistry,
        evaluator: &'a dyn RangeEvaluator,
        runner: &'a dyn CommandRunner,
        options: AuditOptions,
    ) -> Self {
        Self {
            registry,
            evaluator,
            runner,
            options,
        }
    }

    /// Run the audit for a project directory
    pub async fn run(&self, project: &Path) -> Result<AuditReport, AppError> {
        let mut progress = Progress::new(self.options.show_progress);
        let mut report = AuditReport::new(self.options.dry_run);

        // Step 1: read the lock file
        progress.spinner("Reading composer.lock...");
        let lock = ComposerLock::load(project)?;
        let in_scope: Vec<&InstalledPackage> = lock
            .packages()
            .iter()
            .filter(|p| self.options.in_scope(p))
            .collect();
        progress.finish_and_clear();

        if in_scope.is_empty() {
            return Ok(report);
        }

        // Step 2: fetch advisories for every in-scope package.
        // Feed unavailability is the one fatal error of the audit.
        progress.spinner("Fetching security advisories...");
        let names: Vec<String> = in_scope.iter().map(|p| p.name.clone()).collect();
        let advisories = self.registry.fetch_advisories(&names).await?;
        progress.finish_and_clear();

        let mut by_package: BTreeMap<&str, Vec<&Advisory>> = BTreeMap::new();
        for advisory in &advisories {
            by_package
                .entry(advisory.package.as_str())
                .or_default()
                .push(advisory);
        }

        // Step 3: evaluate each affected package, one at a time, lock order
        let affected: Vec<&InstalledPackage> = in_scope
            .iter()
            .copied()
            .filter(|p| by_package.contains_key(p.name.as_str()))
            .collect();

        progress.start(affected.len() as u64, "Auditing packages");
        let selector = SafeUpgradeSelector::new(self.evaluator, self.options.allow_major);

        for package in affected {
            progress.set_message(&format!("Auditing {}", package.name));
            let package_advisories = &by_package[package.name.as_str()];
            for advisory in package_advisories {
                report.add_advisory((*advisory).clone());
            }

            let decision = self
                .audit_package(&selector, package, package_advisories)
                .await;
            report.add_decision(decision);
            progress.inc();
        }
        progress.finish_and_clear();

        // Step 4: finalize - apply immediately or emit the batch script
        if !self.options.dry_run {
            if let Some(script_path) = &self.options.script {
                write_upgrade_script(script_path, &report)?;
            } else if self.options.apply {
                self.apply_selections(project, &mut report, &mut progress);
            }
        }

        Ok(report)
    }

    /// Decide the outcome for one package. Errors here are per-package.
    async fn audit_package(
        &self,
        selector: &SafeUpgradeSelector<'_>,
        package: &InstalledPackage,
        advisories: &[&Advisory],
    ) -> Decision {
        let ranges: Vec<String> = advisories
            .iter()
            .flat_map(|a| selector.split_ranges(&a.affected_versions))
            .collect();

        if ranges.is_empty() {
            return Decision::no_valid_ranges(&package.name, &package.version);
        }

        let installed = match Version::parse(package.bare_version()) {
            Ok(version) => version,
            Err(e) => {
                return Decision::lookup_error(
                    &package.name,
                    &package.version,
                    format!("installed version is not semver: {}", e),
                );
            }
        };

        let published = match self.registry.fetch_versions(&package.name).await {
            Ok(published) => published,
            Err(e) => {
                return Decision::lookup_error(&package.name, &package.version, e.to_string());
            }
        };

        let candidates = SafeUpgradeSelector::candidates(&published);
        match selector.select(&installed, &candidates, &ranges) {
            Selection::Selected(version) => {
                Decision::selected(&package.name, &package.version, version.to_string())
            }
            Selection::NoSafeVersion => {
                Decision::no_safe_version(&package.name, &package.version)
            }
        }
    }

    /// Apply every selection via composer require; failures are recorded and
    /// the remaining selections still run.
    fn apply_selections(&self, project: &Path, report: &mut AuditReport, progress: &mut Progress) {
        let selections: Vec<(String, String)> = report
            .selections()
            .filter_map(|d| {
                d.outcome
                    .selected_version()
                    .map(|v| (d.package.clone(), v.to_string()))
            })
            .collect();

        for (package, version) in selections {
            progress.spinner(&format!("Installing {} {}", package, version));
            let applied = composer_require(self.runner, project, &package, &version);
            progress.finish_and_clear();

            match applied {
                Ok(output) if output.success() => {}
                Ok(output) => {
                    report.add_error(format!(
                        "failed to install {}:{}: {}",
                        package,
                        version,
                        output.failure_detail().trim()
                    ));
                }
                Err(e) => {
                    report.add_error(format!("failed to install {}:{}: {}", package, version, e));
                }
            }
        }
    }
}
