//! Vendor patch management (composer-patches convention)
//!
//! Patches live under `extra.patches` in composer.json as a
//! package -> {description: file} table. Mutation goes through the
//! backup-then-modify writer so unrelated manifest fields survive, and the
//! previous content is always recoverable from composer.json.bak.

use crate::composer::CommandRunner;
use crate::error::{AppError, CommandError, LockError, PatchError};
use crate::lockfile::{read_json, write_json_with_backup};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// The registered patches of a project: package -> description -> file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchSet(pub BTreeMap<String, BTreeMap<String, String>>);

impl PatchSet {
    /// True when no patches are registered
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of registered patch files
    pub fn patch_count(&self) -> usize {
        self.0.values().map(|patches| patches.len()).sum()
    }
}

/// Read the registered patches from composer.json
pub fn list_patches(project: &Path) -> Result<PatchSet, AppError> {
    let manifest_path = project.join("composer.json");
    let root = read_json(&manifest_path)?;

    let Some(patches) = root.pointer("/extra/patches") else {
        return Ok(PatchSet::default());
    };

    serde_json::from_value(patches.clone()).map_err(|_| {
        AppError::Patch(PatchError::MalformedSection {
            path: manifest_path,
        })
    })
}

/// Register a patch file for a package
pub fn add_patch(
    project: &Path,
    package: &str,
    description: &str,
    patch_file: &str,
) -> Result<(), AppError> {
    if !resolve_patch_file(project, patch_file).exists() {
        return Err(AppError::Patch(PatchError::FileNotFound {
            path: PathBuf::from(patch_file),
        }));
    }

    let manifest_path = project.join("composer.json");
    let mut root = read_json(&manifest_path)?;

    let patches = patches_table(&mut root, &manifest_path)?;
    let entry = patches
        .entry(package.to_string())
        .or_insert_with(|| json!({}));
    let entry = entry.as_object_mut().ok_or_else(|| {
        AppError::Patch(PatchError::MalformedSection {
            path: manifest_path.clone(),
        })
    })?;
    entry.insert(description.to_string(), json!(patch_file));

    write_json_with_backup(&manifest_path, &root)?;
    Ok(())
}

/// Remove one registered patch, or all patches for a package
pub fn remove_patch(
    project: &Path,
    package: &str,
    patch_file: Option<&str>,
) -> Result<(), AppError> {
    let manifest_path = project.join("composer.json");
    let mut root = read_json(&manifest_path)?;

    let patches = patches_table(&mut root, &manifest_path)?;
    let Some(entry) = patches.get_mut(package) else {
        return Err(AppError::Patch(PatchError::NotRegistered {
            package: package.to_string(),
        }));
    };

    match patch_file {
        None => {
            patches.remove(package);
        }
        Some(file) => {
            let entry = entry.as_object_mut().ok_or_else(|| {
                AppError::Patch(PatchError::MalformedSection {
                    path: manifest_path.clone(),
                })
            })?;
            let before = entry.len();
            entry.retain(|_, value| value.as_str() != Some(file));
            if entry.len() == before {
                return Err(AppError::Patch(PatchError::NotRegistered {
                    package: package.to_string(),
                }));
            }
            if entry.is_empty() {
                patches.remove(package);
            }
        }
    }

    write_json_with_backup(&manifest_path, &root)?;
    Ok(())
}

/// Create a unified diff between two trees. Returns true when the trees
/// differ (diff exits 1; both 0 and 1 are success for diff).
pub fn create_patch(
    runner: &dyn CommandRunner,
    project: &Path,
    from: &Path,
    to: &Path,
    output: &Path,
) -> Result<bool, AppError> {
    let from_str = from.to_string_lossy();
    let to_str = to.to_string_lossy();
    let result = runner.run("diff", &["-urN", &from_str, &to_str], project)?;

    match result.status {
        0 | 1 => {
            fs::write(output, &result.stdout)
                .map_err(|e| AppError::Lock(LockError::write_error(output, e)))?;
            Ok(result.status == 1)
        }
        code => Err(AppError::Command(CommandError::failed(
            "diff",
            code,
            result.stderr,
        ))),
    }
}

/// Apply a patch file with patch -p1 --forward
pub fn apply_patch(
    runner: &dyn CommandRunner,
    project: &Path,
    patch_file: &Path,
    dir: Option<&Path>,
) -> Result<(), AppError> {
    let file = patch_file.canonicalize().map_err(|_| {
        AppError::Patch(PatchError::FileNotFound {
            path: patch_file.to_path_buf(),
        })
    })?;

    let working_dir = dir.unwrap_or(project);
    let file_str = file.to_string_lossy();
    let result = runner.run(
        "patch",
        &["-p1", "--forward", "-i", &file_str],
        working_dir,
    )?;

    if !result.success() {
        return Err(AppError::Command(CommandError::failed(
            "patch",
            result.status,
            result.failure_detail().to_string(),
        )));
    }

    Ok(())
}

/// A patch path is resolved relative to the project unless absolute
fn resolve_patch_file(project: &Path, patch_file: &str) -> PathBuf {
    let path = Path::new(patch_file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project.join(path)
    }
}

/// Navigate (creating as needed) to the extra.patches object
fn patches_table<'a>(
    root: &'a mut Value,
    manifest_path: &Path,
) -> Result<&'a mut Map<String, Value>, AppError> {
    let malformed = || {
        AppError::Patch(PatchError::MalformedSection {
            path: manifest_path.to_path_buf(),
        })
    };

    let root_obj = root.as_object_mut().ok_or_else(malformed)?;
    let extra = root_obj
        .entry("extra".to_string())
        .or_insert_with(|| json!({}));
    let extra_obj = extra.as_object_mut().ok_or_else(malformed)?;
    let patches = extra_obj
        .entry("patches".to_string())
        .or_insert_with(|| json!({}));
    patches.as_object_mut().ok_or_else(malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::CommandOutput;
    use tempfile::TempDir;

    const MANIFEST_WITH_PATCHES: &str = r#"{
        "name": "example/site",
        "require": {"drupal/core": "^10.2"},
        "extra": {
            "patches": {
                "drupal/token": {
                    "Fix token replacement": "patches/token.patch"
                }
            }
        }
    }"#;

    fn project(manifest: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("composer.json"), manifest).unwrap();
        dir
    }

    struct FakeRunner {
        status: i32,
        stdout: String,
    }

    impl CommandRunner for FakeRunner {
        fn run(
            &self,
            program: &str,
            args: &[&str],
            _working_dir: &Path,
        ) -> Result<CommandOutput, CommandError> {
            Ok(CommandOutput {
                program: program.to_string(),
                args: args.iter().map(|a| a.to_string()).collect(),
                status: self.status,
                stdout: self.stdout.clone(),
                stderr: String::new(),
            })
        }
    }

    #[test]
    fn test_list_patches() {
        let dir = project(MANIFEST_WITH_PATCHES);
        let patches = list_patches(dir.path()).unwrap();
        assert_eq!(patches.patch_count(), 1);
        assert_eq!(
            patches.0["drupal/token"]["Fix token replacement"],
            "patches/token.patch"
        );
    }

    #[test]
    fn test_list_patches_empty() {
        let dir = project(r#"{"name": "example/site"}"#);
        let patches = list_patches(dir.path()).unwrap();
        assert!(patches.is_empty());
    }

    #[test]
    fn test_list_patches_malformed_section() {
        let dir = project(r#"{"extra": {"patches": "not an object"}}"#);
        assert!(matches!(
            list_patches(dir.path()),
            Err(AppError::Patch(PatchError::MalformedSection { .. }))
        ));
    }

    #[test]
    fn test_add_patch_creates_section_and_backup() {
        let dir = project(r#"{"name": "example/site", "require": {"drupal/core": "^10.2"}}"#);
        fs::create_dir(dir.path().join("patches")).unwrap();
        fs::write(dir.path().join("patches/core.patch"), "--- a\n+++ b\n").unwrap();

        add_patch(
            dir.path(),
            "drupal/core",
            "Backport fix",
            "patches/core.patch",
        )
        .unwrap();

        let patches = list_patches(dir.path()).unwrap();
        assert_eq!(patches.0["drupal/core"]["Backport fix"], "patches/core.patch");

        // Unrelated fields survive, backup exists
        let content = fs::read_to_string(dir.path().join("composer.json")).unwrap();
        assert!(content.contains("\"require\""));
        assert!(dir.path().join("composer.json.bak").exists());
    }

    #[test]
    fn test_add_patch_missing_file() {
        let dir = project(r#"{"name": "example/site"}"#);
        let result = add_patch(dir.path(), "drupal/core", "Fix", "patches/none.patch");
        assert!(matches!(
            result,
            Err(AppError::Patch(PatchError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_remove_patch_by_file() {
        let dir = project(MANIFEST_WITH_PATCHES);
        remove_patch(dir.path(), "drupal/token", Some("patches/token.patch")).unwrap();
        assert!(list_patches(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_remove_all_patches_for_package() {
        let dir = project(MANIFEST_WITH_PATCHES);
        remove_patch(dir.path(), "drupal/token", None).unwrap();
        assert!(list_patches(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_remove_patch_not_registered() {
        let dir = project(MANIFEST_WITH_PATCHES);
        assert!(matches!(
            remove_patch(dir.path(), "drupal/core", None),
            Err(AppError::Patch(PatchError::NotRegistered { .. }))
        ));
        assert!(matches!(
            remove_patch(dir.path(), "drupal/token", Some("patches/other.patch")),
            Err(AppError::Patch(PatchError::NotRegistered { .. }))
        ));
    }

    #[test]
    fn test_create_patch_writes_diff() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.patch");
        let runner = FakeRunner {
            status: 1,
            stdout: "--- a/f\n+++ b/f\n@@ -1 +1 @@\n-old\n+new\n".to_string(),
        };

        let differs = create_patch(
            &runner,
            dir.path(),
            Path::new("a"),
            Path::new("b"),
            &output,
        )
        .unwrap();

        assert!(differs);
        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("+new"));
    }

    #[test]
    fn test_create_patch_identical_trees() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.patch");
        let runner = FakeRunner {
            status: 0,
            stdout: String::new(),
        };

        let differs = create_patch(
            &runner,
            dir.path(),
            Path::new("a"),
            Path::new("b"),
            &output,
        )
        .unwrap();

        assert!(!differs);
        assert!(output.exists());
    }

    #[test]
    fn test_create_patch_diff_error() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner {
            status: 2,
            stdout: String::new(),
        };

        let result = create_patch(
            &runner,
            dir.path(),
            Path::new("a"),
            Path::new("b"),
            &dir.path().join("out.patch"),
        );
        assert!(matches!(
            result,
            Err(AppError::Command(CommandError::Failed { .. }))
        ));
    }

    #[test]
    fn test_apply_patch_missing_file() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner {
            status: 0,
            stdout: String::new(),
        };

        let result = apply_patch(
            &runner,
            dir.path(),
            &dir.path().join("missing.patch"),
            None,
        );
        assert!(matches!(
            result,
            Err(AppError::Patch(PatchError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_apply_patch_failure_reported() {
        let dir = TempDir::new().unwrap();
        let patch_file = dir.path().join("fix.patch");
        fs::write(&patch_file, "--- a\n+++ b\n").unwrap();
        let runner = FakeRunner {
            status: 1,
            stdout: "1 out of 1 hunk FAILED".to_string(),
        };

        let result = apply_patch(&runner, dir.path(), &patch_file, None);
        assert!(matches!(
            result,
            Err(AppError::Command(CommandError::Failed { .. }))
        ));
    }

    #[test]
    fn test_apply_patch_success() {
        let dir = TempDir::new().unwrap();
        let patch_file = dir.path().join("fix.patch");
        fs::write(&patch_file, "--- a\n+++ b\n").unwrap();
        let runner = FakeRunner {
            status: 0,
            stdout: String::new(),
        };

        apply_patch(&runner, dir.path(), &patch_file, None).unwrap();
    }
}
