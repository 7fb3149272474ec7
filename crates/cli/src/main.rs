//! gitsvnpush command-line tool.
//!
//! Pushes the tree of a Git branch into the matching Subversion branch and
//! leaves a merge log for the operator to review and commit with. Also
//! generates and validates the configuration file.

mod prompt;
mod report;
mod style;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gitsvnpush_core::branch::check_argument;
use gitsvnpush_core::config::PushConfig;
use gitsvnpush_core::{PushPipeline, ShellRunner};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Push a Git branch into its Subversion mirror.
#[derive(Parser, Debug)]
#[command(
    name = "gitsvnpush",
    version,
    about = "Reconcile an SVN working copy with a Git branch"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, global = true, default_value = "gitsvnpush.toml")]
    config: PathBuf,

    /// Log debug output (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Mirror a Git branch into the SVN working copy and write the merge log.
    Push {
        /// `trunk`, `branches/<name>` or a bare `<name>`.
        svn_branch_path: String,

        /// Reuse existing work directories without asking.
        #[arg(short, long)]
        yes: bool,

        /// Show the planned svn operations without applying them.
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = "gitsvnpush.toml")]
        output: PathBuf,
    },

    /// Validate the configuration file.
    Validate,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Push {
            svn_branch_path,
            yes,
            dry_run,
        } => cmd_push(&cli.config, &svn_branch_path, yes, dry_run).await,
        Commands::Init { output } => cmd_init(&output),
        Commands::Validate => cmd_validate(&cli.config),
    }
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

async fn cmd_push(config_path: &Path, svn_branch_path: &str, yes: bool, dry_run: bool) -> Result<()> {
    check_argument(svn_branch_path)?;
    let config = PushConfig::load_and_validate(config_path)
        .with_context(|| format!("failed to load configuration from {}", config_path.display()))?;
    let root = std::env::current_dir().context("failed to determine the current directory")?;
    tracing::debug!(root = %root.display(), "project root");

    let runner = ShellRunner::new(&root);
    let mut confirm = prompt::confirmer(yes);
    let report = PushPipeline::new(&root, &config, &runner)
        .dry_run(dry_run)
        .run(svn_branch_path, confirm.as_mut())
        .await?;

    report::print(&report, &config.workspace.log_file);
    Ok(())
}

fn cmd_init(output: &Path) -> Result<()> {
    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    std::fs::write(output, PushConfig::default_template())
        .context("failed to write config file")?;

    println!("{}", style::success(&format!("Default configuration written to {}", output.display())));
    println!();
    println!("Next steps:");
    println!("  1. Set the SVN and Git repository URLs");
    println!(
        "  2. Validate with: gitsvnpush validate --config {}",
        output.display()
    );
    println!("  3. From the project root run: gitsvnpush push trunk");

    Ok(())
}

fn cmd_validate(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {}", config_path.display());
    println!();

    let config =
        PushConfig::load_from_file(config_path).context("failed to parse configuration")?;
    println!("  [OK] TOML structure is valid");

    match config.validate() {
        Ok(()) => println!("  [OK] All required fields are valid"),
        Err(e) => {
            println!("  [FAIL] Validation error: {}", e);
            anyhow::bail!("configuration validation failed");
        }
    }

    println!();
    println!("Configuration summary:");
    println!("  SVN repository : {}", config.svn.repository);
    println!("  Git repository : {}", config.git.repository);
    println!(
        "  Git remote     : {} (trunk <- {})",
        config.git.remote, config.git.mainline
    );
    println!("  Git export     : {:?}", config.git.export);
    println!("  Work directory : {}", config.workspace.directory.display());
    println!("  Log file       : {}", config.workspace.log_file);
    println!("  Stamp marker   : {}", config.options.stamp_marker);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitsvnpush_core::PushError;

    #[tokio::test]
    async fn test_push_master_is_rejected_before_config_load() {
        let err = cmd_push(Path::new("/nonexistent/gitsvnpush.toml"), "master", true, false)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PushError>(),
            Some(PushError::Usage(m)) if m.contains("trunk")
        ));
    }

    #[test]
    fn test_parse_push() {
        let cli = Cli::try_parse_from(["gitsvnpush", "push", "branches/1.0", "--yes", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("gitsvnpush.toml"));
        match cli.command {
            Commands::Push {
                svn_branch_path,
                yes,
                dry_run,
            } => {
                assert_eq!(svn_branch_path, "branches/1.0");
                assert!(yes);
                assert!(!dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_push_requires_branch() {
        assert!(Cli::try_parse_from(["gitsvnpush", "push"]).is_err());
    }

    #[test]
    fn test_init_writes_valid_template_and_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("gitsvnpush.toml");

        cmd_init(&output).unwrap();
        PushConfig::load_and_validate(&output).unwrap();
        assert!(cmd_init(&output).is_err());
    }

    #[test]
    fn test_validate_reports_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gitsvnpush.toml");
        std::fs::write(&path, "[svn]\nrepository = \"\"\n[git]\nrepository = \"x\"\n").unwrap();
        assert!(cmd_validate(&path).is_err());
        assert!(cmd_validate(&dir.path().join("missing.toml")).is_err());
    }
}
