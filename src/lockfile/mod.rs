//! composer.json and composer.lock handling
//!
//! This module provides:
//! - composer.lock parsing into installed-package records
//! - composer.json parsing (require / require-dev constraint tables)
//! - Backup-then-modify JSON writing for manifest mutation

mod composer_json;
mod composer_lock;
mod writer;

pub use composer_json::ComposerManifest;
pub use composer_lock::ComposerLock;
pub use writer::{read_json, write_json_with_backup};
