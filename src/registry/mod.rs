//! Packagist access for versions and security advisories
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - Packagist metadata adapter (published versions)
//! - Packagist security-advisories adapter

mod client;
mod packagist;

pub use client::HttpClient;
pub use packagist::PackagistClient;

use crate::domain::Advisory;
use crate::error::RegistryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A published version as reported by the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// Version string as published (may carry a `v` prefix)
    pub version: String,
    /// Release timestamp when the registry reports one
    pub released_at: Option<DateTime<Utc>>,
}

impl VersionInfo {
    /// Create a new version info entry
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            released_at: None,
        }
    }

    /// Sets the release timestamp (builder pattern)
    pub fn with_released_at(mut self, released_at: DateTime<Utc>) -> Self {
        self.released_at = Some(released_at);
        self
    }
}

/// Trait for the package registry the audit consults
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Get the registry name (for error context)
    fn registry_name(&self) -> &'static str;

    /// Fetch the published versions for a package, in registry order
    async fn fetch_versions(&self, package: &str) -> Result<Vec<VersionInfo>, RegistryError>;

    /// Fetch the security advisories for a set of packages
    async fn fetch_advisories(&self, packages: &[String])
        -> Result<Vec<Advisory>, RegistryError>;
}
