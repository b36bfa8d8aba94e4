//! composer.lock parsing
//!
//! The lock file records the exact installed version of every package in the
//! `packages` and `packages-dev` sections. Only the fields the audit needs are
//! read; everything else is ignored.

use crate::domain::InstalledPackage;
use crate::error::LockError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Raw composer.lock shape
#[derive(Debug, Deserialize)]
struct RawLock {
    #[serde(default)]
    packages: Vec<RawPackage>,
    #[serde(rename = "packages-dev", default)]
    packages_dev: Vec<RawPackage>,
}

/// One package entry in the lock file
#[derive(Debug, Deserialize)]
struct RawPackage {
    name: String,
    version: String,
    #[serde(rename = "type", default)]
    package_type: Option<String>,
}

/// Parsed composer.lock
#[derive(Debug, Clone)]
pub struct ComposerLock {
    /// Path the lock file was read from
    pub path: PathBuf,
    packages: Vec<InstalledPackage>,
}

impl ComposerLock {
    /// Load composer.lock from a project directory
    pub fn load(project: &Path) -> Result<Self, LockError> {
        let path = project.join("composer.lock");
        Self::load_file(&path)
    }

    /// Load a lock file from an explicit path
    pub fn load_file(path: &Path) -> Result<Self, LockError> {
        if !path.exists() {
            return Err(LockError::not_found(path));
        }

        let content =
            fs::read_to_string(path).map_err(|e| LockError::read_error(path, e))?;
        let raw: RawLock = serde_json::from_str(&content)
            .map_err(|e| LockError::json_parse_error(path, e.to_string()))?;

        let mut packages = Vec::with_capacity(raw.packages.len() + raw.packages_dev.len());
        for (entries, is_dev) in [(raw.packages, false), (raw.packages_dev, true)] {
            for entry in entries {
                let mut pkg = InstalledPackage::new(entry.name, entry.version, is_dev);
                if let Some(package_type) = entry.package_type {
                    pkg = pkg.with_type(package_type);
                }
                packages.push(pkg);
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            packages,
        })
    }

    /// All locked packages, in lock-file order (packages, then packages-dev)
    pub fn packages(&self) -> &[InstalledPackage] {
        &self.packages
    }

    /// Find a locked package by name
    pub fn find(&self, name: &str) -> Option<&InstalledPackage> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// The installed version of a package; error when it is not locked
    pub fn installed_version(&self, name: &str) -> Result<&str, LockError> {
        self.find(name)
            .map(|p| p.version.as_str())
            .ok_or_else(|| LockError::package_not_locked(name, self.path.clone()))
    }
}
