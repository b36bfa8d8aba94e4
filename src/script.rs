//! Generated batch upgrade script
//!
//! Instead of applying selections one by one, the audit can write a shell
//! script that replays every selected upgrade in a single composer command.
//! Each decision is recorded as a comment so the script documents the run
//! that produced it. The `package:version` pair format is what composer
//! consumes; the column order must not change.

use crate::domain::AuditReport;
use crate::error::LockError;
use std::fs;
use std::path::Path;

/// Write the batch upgrade script for a finished audit
pub fn write_upgrade_script(path: &Path, report: &AuditReport) -> Result<(), LockError> {
    let content = render_script(report);
    fs::write(path, content).map_err(|e| LockError::write_error(path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o755);
        fs::set_permissions(path, perms).map_err(|e| LockError::write_error(path, e))?;
    }

    Ok(())
}

/// Render the script body
fn render_script(report: &AuditReport) -> String {
    let mut lines = vec![
        "#!/bin/sh".to_string(),
        "# Generated by drupkeep audit".to_string(),
        "set -e".to_string(),
        String::new(),
    ];

    for decision in &report.decisions {
        lines.push(format!("# {}", decision));
    }

    let requirements: Vec<String> = report
        .decisions
        .iter()
        .filter_map(|d| d.script_line())
        .collect();

    lines.push(String::new());
    if requirements.is_empty() {
        lines.push("# No safe upgrades were selected.".to_string());
    } else {
        lines.push(format!(
            "composer require {} --with-all-dependencies --no-interaction",
            requirements.join(" ")
        ));
    }
    lines.push(String::new());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Decision;
    use tempfile::TempDir;

    fn sample_report() -> AuditReport {
        let mut report = AuditReport::new(false);
        report.add_decision(Decision::selected("drupal/core", "10.2.0", "10.2.2"));
        report.add_decision(Decision::selected("drupal/token", "1.10.0", "1.12.0"));
        report.add_decision(Decision::no_safe_version("vendor/stuck", "2.0.0"));
        report
    }

    #[test]
    fn test_render_batch_command() {
        let script = render_script(&sample_report());
        assert!(script.starts_with("#!/bin/sh"));
        assert!(script.contains(
            "composer require drupal/core:10.2.2 drupal/token:1.12.0 --with-all-dependencies --no-interaction"
        ));
    }

    #[test]
    fn test_render_decision_comments() {
        let script = render_script(&sample_report());
        assert!(script.contains("# drupal/core: 10.2.0 → 10.2.2"));
        assert!(script.contains("# vendor/stuck: no safe upgrade available"));
    }

    #[test]
    fn test_render_no_selections() {
        let mut report = AuditReport::new(false);
        report.add_decision(Decision::no_safe_version("vendor/stuck", "2.0.0"));
        let script = render_script(&report);
        assert!(script.contains("# No safe upgrades were selected."));
        assert!(!script.contains("composer require"));
    }

    #[test]
    fn test_write_script_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("upgrade.sh");
        write_upgrade_script(&path, &sample_report()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("drupal/core:10.2.2"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }
}
