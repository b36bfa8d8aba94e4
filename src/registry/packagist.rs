//! Packagist adapter for versions and security advisories
//!
//! Version metadata: https://repo.packagist.org/p2/{vendor}/{package}.json
//! Security advisories: https://packagist.org/api/security-advisories/?packages[]=...
//!
//! The advisory feed joins affected version ranges with `|`; ranges are kept
//! verbatim here and split later by the selector.

use crate::domain::Advisory;
use crate::error::RegistryError;
use crate::registry::{HttpClient, PackageRegistry, VersionInfo};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// Packagist metadata base URL
const PACKAGIST_METADATA_URL: &str = "https://repo.packagist.org/p2";

/// Packagist security-advisories API URL
const PACKAGIST_ADVISORIES_URL: &str = "https://packagist.org/api/security-advisories/";

/// Packagist client
pub struct PackagistClient {
    client: HttpClient,
    metadata_base: String,
    advisories_base: String,
}

/// Packagist p2 metadata response
#[derive(Debug, Deserialize)]
struct MetadataResponse {
    packages: HashMap<String, Vec<MetadataVersion>>,
}

/// One version entry in the p2 metadata
#[derive(Debug, Deserialize)]
struct MetadataVersion {
    version: String,
    #[serde(default)]
    time: Option<DateTime<Utc>>,
}

/// Security-advisories API response
#[derive(Debug, Deserialize)]
struct AdvisoriesResponse {
    advisories: HashMap<String, Vec<RawAdvisory>>,
}

/// One advisory as delivered by the feed
#[derive(Debug, Deserialize)]
struct RawAdvisory {
    title: String,
    #[serde(rename = "affectedVersions")]
    affected_versions: String,
    #[serde(default)]
    cve: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(rename = "reportedAt", default)]
    reported_at: Option<String>,
}

impl PackagistClient {
    /// Create a new Packagist client
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            metadata_base: PACKAGIST_METADATA_URL.to_string(),
            advisories_base: PACKAGIST_ADVISORIES_URL.to_string(),
        }
    }

    /// Create a client against custom endpoints (for testing)
    pub fn with_urls(
        client: HttpClient,
        metadata_base: impl Into<String>,
        advisories_base: impl Into<String>,
    ) -> Self {
        Self {
            client,
            metadata_base: metadata_base.into(),
            advisories_base: advisories_base.into(),
        }
    }

    /// Build the metadata URL for a package (names are vendor/package)
    fn metadata_url(&self, package: &str) -> String {
        format!("{}/{}.json", self.metadata_base, package)
    }

    /// Build the advisories URL for a set of packages
    fn advisories_url(&self, packages: &[String]) -> String {
        let query: Vec<String> = packages
            .iter()
            .map(|p| format!("packages[]={}", p))
            .collect();
        format!("{}?{}", self.advisories_base, query.join("&"))
    }

    /// Parse the feed's "Y-m-d H:i:s" timestamps; unparseable values are dropped
    fn parse_reported_at(raw: &str) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .map(|naive| naive.and_utc())
            .ok()
            .or_else(|| raw.parse::<DateTime<Utc>>().ok())
    }
}

#[async_trait]
impl PackageRegistry for PackagistClient {
    fn registry_name(&self) -> &'static str {
        "packagist"
    }

    async fn fetch_versions(&self, package: &str) -> Result<Vec<VersionInfo>, RegistryError> {
        let url = self.metadata_url(package);
        let response: MetadataResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        let entries = response.packages.get(package).ok_or_else(|| {
            RegistryError::InvalidResponse {
                package: package.to_string(),
                registry: self.registry_name().to_string(),
                message: "package missing from metadata payload".to_string(),
            }
        })?;

        let versions = entries
            .iter()
            .map(|entry| {
                let mut info = VersionInfo::new(&entry.version);
                if let Some(time) = entry.time {
                    info = info.with_released_at(time);
                }
                info
            })
            .collect();

        Ok(versions)
    }

    async fn fetch_advisories(
        &self,
        packages: &[String],
    ) -> Result<Vec<Advisory>, RegistryError> {
        if packages.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.advisories_url(packages);
        let response: AdvisoriesResponse = self
            .client
            .get_json(&url, "security-advisories", self.registry_name())
            .await?;

        let mut advisories = Vec::new();
        for (package, raw_advisories) in response.advisories {
            for raw in raw_advisories {
                let mut advisory = Advisory::new(&package, raw.title, raw.affected_versions);
                if let Some(cve) = raw.cve {
                    advisory = advisory.with_cve(cve);
                }
                if let Some(link) = raw.link {
                    advisory = advisory.with_link(link);
                }
                if let Some(reported_at) =
                    raw.reported_at.as_deref().and_then(Self::parse_reported_at)
                {
                    advisory = advisory.with_reported_at(reported_at);
                }
                advisories.push(advisory);
            }
        }

        // Stable display order regardless of map iteration order
        advisories.sort_by(|a, b| a.package.cmp(&b.package).then(a.title.cmp(&b.title)));

        Ok(advisories)
    }
}
