//! Core domain models for drupkeep
//!
//! This module contains the fundamental types used throughout the application:
//! - Installed package information read from composer.lock
//! - Security advisory records from the advisory feed
//! - Per-package upgrade decisions and their outcomes
//! - The audit report accumulating decisions for a run

mod advisory;
mod decision;
mod package;
mod report;

pub use advisory::Advisory;
pub use decision::{Decision, Outcome};
pub use package::InstalledPackage;
pub use report::AuditReport;
