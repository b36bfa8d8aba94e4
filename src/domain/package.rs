//! Installed package information read from composer.lock

use serde::{Deserialize, Serialize};
use std::fmt;

/// A package as recorded in composer.lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPackage {
    /// Fully qualified package name (vendor/name)
    pub name: String,
    /// Installed version string as written in the lock file (may carry a `v` prefix)
    pub version: String,
    /// Whether this package comes from the require-dev section
    pub is_dev: bool,
    /// Composer package type (e.g. drupal-module, drupal-theme, library)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_type: Option<String>,
}

impl InstalledPackage {
    /// Creates a new installed package record
    pub fn new(name: impl Into<String>, version: impl Into<String>, is_dev: bool) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            is_dev,
            package_type: None,
        }
    }

    /// Sets the composer package type (builder pattern)
    pub fn with_type(mut self, package_type: impl Into<String>) -> Self {
        self.package_type = Some(package_type.into());
        self
    }

    /// Returns the version with any leading `v` stripped
    pub fn bare_version(&self) -> &str {
        self.version.strip_prefix('v').unwrap_or(&self.version)
    }

    /// Returns true for Drupal extension packages (module/theme/profile)
    pub fn is_drupal_extension(&self) -> bool {
        matches!(
            self.package_type.as_deref(),
            Some("drupal-module") | Some("drupal-theme") | Some("drupal-profile")
        )
    }

    /// Returns true for Composer platform requirements (php, ext-*, lib-*)
    /// which have no registry entry and are never audited
    pub fn is_platform(name: &str) -> bool {
        name == "php"
            || name == "composer-plugin-api"
            || name.starts_with("ext-")
            || name.starts_with("lib-")
    }
}

impl fmt::Display for InstalledPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dev_marker = if self.is_dev { " (dev)" } else { "" };
        write!(f, "{} {}{}", self.name, self.version, dev_marker)
    }
}
