//! drupkeep - Composer/Drupal project maintenance CLI
//!
//! Subcommands:
//! - audit: security advisories with safe-upgrade selection
//! - verify: composer.lock vs composer.json constraint check
//! - compat: Drupal core major-version compatibility probe
//! - patch: vendor patch management (extra.patches)

use clap::Parser;
use drupkeep::audit::{AuditOptions, Auditor};
use drupkeep::cli::{CliArgs, Command, PatchAction};
use drupkeep::compat;
use drupkeep::composer::SystemCommandRunner;
use drupkeep::constraint::ComposerRangeEvaluator;
use drupkeep::output::{create_formatter, OutputConfig};
use drupkeep::patch;
use drupkeep::registry::{HttpClient, PackagistClient};
use drupkeep::verify::verify_project;
use std::io::{self, Write};
use std::process::ExitCode;

/// Exit code for partial results (unresolved packages, mismatches, blockers)
const EXIT_PARTIAL: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if args.verbose {
        eprintln!("drupkeep v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Project: {}", args.project.display());
        if args.dry_run {
            eprintln!("Mode: dry-run");
        }
    }

    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet);
    let formatter = create_formatter(output_config);
    let mut stdout = io::stdout().lock();

    let evaluator = ComposerRangeEvaluator::new();
    let runner = SystemCommandRunner::new();

    let exit_code = match &args.command {
        Command::Audit(audit_args) => {
            let client = HttpClient::new()?;
            let registry = PackagistClient::new(client);
            let options = AuditOptions {
                allow_major: audit_args.allow_major,
                no_dev: audit_args.no_dev,
                only: audit_args.only.clone(),
                exclude: audit_args.exclude.clone(),
                dry_run: args.dry_run,
                apply: audit_args.apply,
                script: audit_args.script.clone(),
                show_progress: !args.quiet && !args.json,
            };

            let auditor = Auditor::new(&registry, &evaluator, &runner, options);
            let report = auditor.run(&args.project).await?;
            formatter.audit(&report, &mut stdout)?;

            if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_PARTIAL)
            }
        }

        Command::Verify => {
            let report = verify_project(&args.project, &evaluator)?;
            formatter.verify(&report, &mut stdout)?;

            if report.all_satisfied() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_PARTIAL)
            }
        }

        Command::Compat(compat_args) => {
            let report = compat::scan(&args.project, &compat_args.target, &runner)?;
            formatter.compat(&report, &mut stdout)?;

            if report.all_compatible() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_PARTIAL)
            }
        }

        Command::Patch { action } => {
            run_patch_action(&args, action, formatter.as_ref(), &runner, &mut stdout)?;
            ExitCode::SUCCESS
        }
    };

    stdout.flush()?;
    Ok(exit_code)
}

/// Dispatch one patch subcommand
fn run_patch_action(
    args: &CliArgs,
    action: &PatchAction,
    formatter: &dyn drupkeep::output::Formatter,
    runner: &SystemCommandRunner,
    stdout: &mut dyn Write,
) -> anyhow::Result<()> {
    match action {
        PatchAction::List => {
            let patches = patch::list_patches(&args.project)?;
            formatter.patches(&patches, stdout)?;
        }

        PatchAction::Add {
            package,
            description,
            file,
        } => {
            patch::add_patch(&args.project, package, description, file)?;
            if !args.quiet {
                writeln!(stdout, "Registered {} for {}", file, package)?;
            }
        }

        PatchAction::Remove { package, file } => {
            patch::remove_patch(&args.project, package, file.as_deref())?;
            if !args.quiet {
                writeln!(stdout, "Removed patch entry for {}", package)?;
            }
        }

        PatchAction::Create {
            package,
            from,
            to,
            output,
        } => {
            let differs = patch::create_patch(runner, &args.project, from, to, output)?;
            if !args.quiet {
                if differs {
                    writeln!(stdout, "Wrote patch for {} to {}", package, output.display())?;
                } else {
                    writeln!(
                        stdout,
                        "No differences between trees; {} is empty",
                        output.display()
                    )?;
                }
            }
        }

        PatchAction::Apply { file, dir } => {
            patch::apply_patch(runner, &args.project, file, dir.as_deref())?;
            if !args.quiet {
                writeln!(stdout, "Applied {}", file.display())?;
            }
        }
    }

    Ok(())
}
