//! CLI argument parsing module for drupkeep

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Composer/Drupal project maintenance tool
#[derive(Parser, Debug, Clone)]
#[command(
    name = "drupkeep",
    version,
    about = "Composer/Drupal project maintenance: security audit, dependency verification, core compatibility, patches"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Project directory containing composer.json (default: current directory)
    #[arg(long, global = true, default_value = ".")]
    pub project: PathBuf,

    /// Dry run mode - report decisions without applying anything
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Audit locked packages against security advisories and select safe upgrades
    Audit(AuditArgs),

    /// Verify that composer.lock satisfies the constraints in composer.json
    Verify,

    /// Probe compatibility with a target Drupal core major version
    Compat(CompatArgs),

    /// Manage vendor patches (extra.patches in composer.json)
    Patch {
        #[command(subcommand)]
        action: PatchAction,
    },
}

/// Options for the audit subcommand
#[derive(Args, Debug, Clone)]
pub struct AuditArgs {
    /// Permit upgrades across a major-version boundary
    #[arg(long)]
    pub allow_major: bool,

    /// Apply selected upgrades immediately via composer require
    #[arg(long)]
    pub apply: bool,

    /// Write selected upgrades to a batch shell script instead of applying
    #[arg(long, value_name = "PATH", conflicts_with = "apply")]
    pub script: Option<PathBuf>,

    /// Audit only specific packages (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub only: Vec<String>,

    /// Exclude specific packages from the audit (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Skip packages from the require-dev section
    #[arg(long)]
    pub no_dev: bool,
}

impl AuditArgs {
    /// Check if a package should be audited based on --only/--exclude
    pub fn should_audit_package(&self, name: &str) -> bool {
        if !self.only.is_empty() {
            return self.only.iter().any(|p| p == name);
        }
        !self.exclude.iter().any(|p| p == name)
    }
}

/// Options for the compat subcommand
#[derive(Args, Debug, Clone)]
pub struct CompatArgs {
    /// Target Drupal core major version (can be specified multiple times;
    /// default: the major after the locked drupal/core major)
    #[arg(long, action = ArgAction::Append)]
    pub target: Vec<u64>,
}

/// Patch management actions
#[derive(Subcommand, Debug, Clone)]
pub enum PatchAction {
    /// List the patches registered in extra.patches
    List,

    /// Register a patch file for a package
    Add {
        /// Package the patch applies to (vendor/name)
        package: String,
        /// Short description of the patch
        description: String,
        /// Path to the patch file
        file: String,
    },

    /// Remove a registered patch (or all patches for the package)
    Remove {
        /// Package the patch applies to (vendor/name)
        package: String,
        /// Patch file to remove; omit to remove every patch for the package
        file: Option<String>,
    },

    /// Create a patch file from two directory trees
    Create {
        /// Package the patch is for (used in reporting only)
        package: String,
        /// Pristine tree
        #[arg(long)]
        from: PathBuf,
        /// Modified tree
        #[arg(long)]
        to: PathBuf,
        /// Where to write the unified diff
        #[arg(long)]
        output: PathBuf,
    },

    /// Apply a patch file with patch -p1
    Apply {
        /// Path to the patch file
        file: PathBuf,
        /// Directory to apply in (default: the project directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_audit_defaults() {
        let args = CliArgs::parse_from(["drupkeep", "audit"]);
        assert_eq!(args.project, PathBuf::from("."));
        assert!(!args.dry_run);
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(!args.json);
        match args.command {
            Command::Audit(audit) => {
                assert!(!audit.allow_major);
                assert!(!audit.apply);
                assert!(audit.script.is_none());
                assert!(audit.only.is_empty());
                assert!(audit.exclude.is_empty());
                assert!(!audit.no_dev);
            }
            _ => panic!("expected audit subcommand"),
        }
    }

    #[test]
    fn test_project_flag() {
        let args = CliArgs::parse_from(["drupkeep", "verify", "--project", "/srv/site"]);
        assert_eq!(args.project, PathBuf::from("/srv/site"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::parse_from(["drupkeep", "audit", "-n", "--verbose"]);
        assert!(args.dry_run);
        assert!(args.verbose);
    }

    #[test]
    fn test_quiet_flags() {
        let args = CliArgs::parse_from(["drupkeep", "verify", "-q"]);
        assert!(args.quiet);

        let args = CliArgs::parse_from(["drupkeep", "verify", "--quiet"]);
        assert!(args.quiet);
    }

    #[test]
    fn test_audit_allow_major() {
        let args = CliArgs::parse_from(["drupkeep", "audit", "--allow-major"]);
        match args.command {
            Command::Audit(audit) => assert!(audit.allow_major),
            _ => panic!("expected audit subcommand"),
        }
    }

    #[test]
    fn test_audit_script_conflicts_with_apply() {
        let result =
            CliArgs::try_parse_from(["drupkeep", "audit", "--apply", "--script", "up.sh"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_audit_only_and_exclude_multiple() {
        let args = CliArgs::parse_from([
            "drupkeep",
            "audit",
            "--only",
            "drupal/core",
            "--only",
            "drupal/token",
        ]);
        match args.command {
            Command::Audit(audit) => {
                assert_eq!(audit.only, vec!["drupal/core", "drupal/token"]);
            }
            _ => panic!("expected audit subcommand"),
        }

        let args = CliArgs::parse_from(["drupkeep", "audit", "--exclude", "drupal/core"]);
        match args.command {
            Command::Audit(audit) => assert_eq!(audit.exclude, vec!["drupal/core"]),
            _ => panic!("expected audit subcommand"),
        }
    }

    #[test]
    fn test_should_audit_package() {
        let args = CliArgs::parse_from(["drupkeep", "audit"]);
        let Command::Audit(audit) = args.command else {
            panic!("expected audit subcommand");
        };
        assert!(audit.should_audit_package("any/package"));

        let args = CliArgs::parse_from(["drupkeep", "audit", "--exclude", "drupal/core"]);
        let Command::Audit(audit) = args.command else {
            panic!("expected audit subcommand");
        };
        assert!(!audit.should_audit_package("drupal/core"));
        assert!(audit.should_audit_package("drupal/token"));

        let args = CliArgs::parse_from(["drupkeep", "audit", "--only", "drupal/core"]);
        let Command::Audit(audit) = args.command else {
            panic!("expected audit subcommand");
        };
        assert!(audit.should_audit_package("drupal/core"));
        assert!(!audit.should_audit_package("drupal/token"));
    }

    #[test]
    fn test_compat_targets() {
        let args = CliArgs::parse_from(["drupkeep", "compat", "--target", "11", "--target", "12"]);
        match args.command {
            Command::Compat(compat) => assert_eq!(compat.target, vec![11, 12]),
            _ => panic!("expected compat subcommand"),
        }
    }

    #[test]
    fn test_patch_add() {
        let args = CliArgs::parse_from([
            "drupkeep",
            "patch",
            "add",
            "drupal/token",
            "Fix token replacement",
            "patches/token.patch",
        ]);
        match args.command {
            Command::Patch {
                action: PatchAction::Add {
                    package,
                    description,
                    file,
                },
            } => {
                assert_eq!(package, "drupal/token");
                assert_eq!(description, "Fix token replacement");
                assert_eq!(file, "patches/token.patch");
            }
            _ => panic!("expected patch add subcommand"),
        }
    }

    #[test]
    fn test_patch_create() {
        let args = CliArgs::parse_from([
            "drupkeep",
            "patch",
            "create",
            "drupal/token",
            "--from",
            "a",
            "--to",
            "b",
            "--output",
            "out.patch",
        ]);
        match args.command {
            Command::Patch {
                action: PatchAction::Create {
                    package,
                    from,
                    to,
                    output,
                },
            } => {
                assert_eq!(package, "drupal/token");
                assert_eq!(from, PathBuf::from("a"));
                assert_eq!(to, PathBuf::from("b"));
                assert_eq!(output, PathBuf::from("out.patch"));
            }
            _ => panic!("expected patch create subcommand"),
        }
    }

    #[test]
    fn test_patch_remove_optional_file() {
        let args = CliArgs::parse_from(["drupkeep", "patch", "remove", "drupal/token"]);
        match args.command {
            Command::Patch {
                action: PatchAction::Remove { package, file },
            } => {
                assert_eq!(package, "drupal/token");
                assert!(file.is_none());
            }
            _ => panic!("expected patch remove subcommand"),
        }
    }

    #[test]
    fn test_combined_flags() {
        let args = CliArgs::parse_from([
            "drupkeep",
            "audit",
            "--project",
            "/srv/site",
            "-n",
            "--allow-major",
            "--no-dev",
            "--json",
        ]);
        assert_eq!(args.project, PathBuf::from("/srv/site"));
        assert!(args.dry_run);
        assert!(args.json);
        match args.command {
            Command::Audit(audit) => {
                assert!(audit.allow_major);
                assert!(audit.no_dev);
            }
            _ => panic!("expected audit subcommand"),
        }
    }
}
