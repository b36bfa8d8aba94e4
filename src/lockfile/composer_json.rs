//! composer.json parsing
//!
//! Only the dependency constraint tables are modeled here. Mutation of the
//! manifest (patch registration) goes through the raw-JSON writer instead so
//! unrelated fields survive untouched.

use crate::error::LockError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Raw composer.json shape (constraint tables only)
#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    require: BTreeMap<String, String>,
    #[serde(rename = "require-dev", default)]
    require_dev: BTreeMap<String, String>,
}

/// Parsed composer.json constraint tables
#[derive(Debug, Clone)]
pub struct ComposerManifest {
    /// Path the manifest was read from
    pub path: PathBuf,
    /// Production constraints (require)
    pub require: BTreeMap<String, String>,
    /// Development constraints (require-dev)
    pub require_dev: BTreeMap<String, String>,
}

impl ComposerManifest {
    /// Load composer.json from a project directory
    pub fn load(project: &Path) -> Result<Self, LockError> {
        let path = project.join("composer.json");
        Self::load_file(&path)
    }

    /// Load a manifest from an explicit path
    pub fn load_file(path: &Path) -> Result<Self, LockError> {
        if !path.exists() {
            return Err(LockError::not_found(path));
        }

        let content =
            fs::read_to_string(path).map_err(|e| LockError::read_error(path, e))?;
        let raw: RawManifest = serde_json::from_str(&content)
            .map_err(|e| LockError::json_parse_error(path, e.to_string()))?;

        Ok(Self {
            path: path.to_path_buf(),
            require: raw.require,
            require_dev: raw.require_dev,
        })
    }

    /// All constraints: require first, then require-dev, each alphabetical
    pub fn constraints(&self) -> impl Iterator<Item = (&str, &str, bool)> {
        self.require
            .iter()
            .map(|(name, constraint)| (name.as_str(), constraint.as_str(), false))
            .chain(
                self.require_dev
                    .iter()
                    .map(|(name, constraint)| (name.as_str(), constraint.as_str(), true)),
            )
    }
}
