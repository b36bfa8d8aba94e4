//! Security advisory records
//!
//! An advisory associates a package with the version ranges known to be
//! affected. The `affected_versions` string is kept verbatim as delivered by
//! the feed; splitting on the "or" delimiter happens in the selector.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A security disclosure for a single package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    /// Package the advisory applies to (vendor/name)
    pub package: String,
    /// Advisory title as published
    pub title: String,
    /// Affected version ranges, `|`-joined as delivered by the feed
    pub affected_versions: String,
    /// CVE identifier when assigned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cve: Option<String>,
    /// Link to the published advisory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// When the advisory was reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_at: Option<DateTime<Utc>>,
}

impl Advisory {
    /// Creates a new advisory
    pub fn new(
        package: impl Into<String>,
        title: impl Into<String>,
        affected_versions: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            title: title.into(),
            affected_versions: affected_versions.into(),
            cve: None,
            link: None,
            reported_at: None,
        }
    }

    /// Sets the CVE identifier (builder pattern)
    pub fn with_cve(mut self, cve: impl Into<String>) -> Self {
        self.cve = Some(cve.into());
        self
    }

    /// Sets the advisory link (builder pattern)
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Sets the reported-at timestamp (builder pattern)
    pub fn with_reported_at(mut self, reported_at: DateTime<Utc>) -> Self {
        self.reported_at = Some(reported_at);
        self
    }

    /// Short identifier for display: the CVE when present, else the title
    pub fn identifier(&self) -> &str {
        self.cve.as_deref().unwrap_or(&self.title)
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (affects {})",
            self.package,
            self.identifier(),
            self.affected_versions
        )
    }
}
