//! Backup-then-modify JSON writing
//!
//! Manifest mutation keeps the previous content in a `.bak` sibling and
//! replaces the original atomically (write to a temp file, then rename), so a
//! failed write never leaves a half-written composer.json behind.

use crate::error::LockError;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON file into a raw value, preserving unknown fields
pub fn read_json(path: &Path) -> Result<Value, LockError> {
    if !path.exists() {
        return Err(LockError::not_found(path));
    }
    let content = fs::read_to_string(path).map_err(|e| LockError::read_error(path, e))?;
    serde_json::from_str(&content).map_err(|e| LockError::json_parse_error(path, e.to_string()))
}

/// Write a JSON value back, backing up the previous content first
pub fn write_json_with_backup(path: &Path, value: &Value) -> Result<(), LockError> {
    if path.exists() {
        fs::copy(path, backup_path(path)).map_err(|e| LockError::write_error(path, e))?;
    }

    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| LockError::json_parse_error(path, e.to_string()))?;

    let tmp = temp_path(path);
    fs::write(&tmp, format!("{}\n", rendered)).map_err(|e| LockError::write_error(path, e))?;
    fs::rename(&tmp, path).map_err(|e| LockError::write_error(path, e))?;

    Ok(())
}

/// Sibling backup path: composer.json -> composer.json.bak
fn backup_path(path: &Path) -> PathBuf {
    append_suffix(path, ".bak")
}

/// Sibling temp path used for the atomic replace
fn temp_path(path: &Path) -> PathBuf {
    append_suffix(path, ".tmp")
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}
