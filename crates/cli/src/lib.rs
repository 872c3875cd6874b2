//! Folio CLI library
//!
//! This library contains all the CLI logic for folio, making it reusable
//! for testing and integration with other tools.

pub mod error;
pub mod stats;

use anyhow::Result;
use clap::Parser;
use folio_config::Config;
use folio_engine::{DryRunSystem, RealSystem, SyncOrchestrator, SyncReport, System};
use std::path::{Path, PathBuf};

use error::CommandError;

/// Folio - incremental backups of a static-site blog
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Back up a static-site blog into a plain Markdown archive")]
#[command(version)]
#[command(long_about = "Back up a static-site blog into a plain Markdown archive

Every run mirrors the configured content directories into the backup tree,
rewrites documents into plain Markdown, copies only the images they
reference, and regenerates a README index grouped by category and year.

Only files whose content changed are written, so running folio twice in a
row leaves the backup untouched the second time.

Examples:
  • folio
      → Sync using ./folio.toml

  • folio -c ~/blog/folio.toml --dry-run
      → Show what would be written without touching the backup")]
pub struct Cli {
    /// Path to the config file (TOML, or JSON for `.json` files)
    #[arg(
        short,
        long,
        env = "FOLIO_CONFIG",
        value_name = "FILE",
        default_value = "folio.toml"
    )]
    pub config: PathBuf,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging)
    #[arg(long, env = "FOLIO_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Report what would change without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Do not print the run summary
    #[arg(short, long)]
    pub quiet: bool,
}

/// Main entry point for the CLI
///
/// Configuration is loaded before logging starts so `logging.verbose` can
/// turn on debug output as well as `--verbose`.
pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli.config)?;

    folio_config::logging::init(
        cli.verbose || config.logging.verbose,
        cli.log_file.as_deref(),
    )
    .map_err(CommandError::logging)?;

    let report = sync(&config, cli.dry_run)?;

    if !cli.quiet && config.logging.show_stats {
        stats::print_summary(&report, cli.dry_run);
    }

    Ok(())
}

/// Load and validate the configuration file
pub fn load_config(path: &Path) -> error::Result<Config> {
    Config::load(path).map_err(CommandError::config)
}

/// Run one sync pass, against the real filesystem or as a dry run
pub fn sync(config: &Config, dry_run: bool) -> error::Result<SyncReport> {
    if dry_run {
        let system = DryRunSystem::new();
        let report = run_pass(&system, config)?;
        tracing::debug!(
            operations = system.operations().len(),
            "Dry run recorded operations"
        );
        Ok(report)
    } else {
        run_pass(&RealSystem, config)
    }
}

fn run_pass<S: System>(system: &S, config: &Config) -> error::Result<SyncReport> {
    let orchestrator = SyncOrchestrator::new(system, config).map_err(CommandError::config)?;
    let report = orchestrator.run().map_err(CommandError::SyncAborted)?;

    tracing::info!(
        written = report.changes.len(),
        failed = report.failures(),
        "Sync complete"
    );
    Ok(report)
}
