//! civicwatch CLI
//!
//! Local execution entry point. One `run` invocation is a single
//! fetch-compare-persist cycle; the periodic cadence is the external
//! scheduler's job.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use civicwatch::{
    error::Result,
    models::{Config, RunOutcome},
    pipeline,
    services::PageFetcher,
    storage::{LocalStore, ReportWriter, SnapshotStore},
};

/// civicwatch - Commission Page Change Monitor
#[derive(Parser, Debug)]
#[command(
    name = "civicwatch",
    version,
    about = "Watches a public commission web page and archives content changes"
)]

struct Cli {
    /// Path to storage directory containing config and history
    #[arg(short, long, default_value = "data")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the page once, diff against history, persist any change
    Run,

    /// Validate configuration files
    Validate,

    /// Show current snapshot info
    Info,

    /// List archived snapshots
    History {
        /// Show only the most recent N entries
        #[arg(long)]
        limit: Option<usize>,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.storage_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);

    let store = LocalStore::new(&cli.storage_dir);

    match cli.command {
        Command::Run => {
            config.validate()?;

            let fetcher = PageFetcher::new(&config.monitor)?;
            let reporter = ReportWriter::new(&cli.storage_dir);

            let outcome = pipeline::run_once(&config, &fetcher, &store, &reporter).await?;
            match &outcome {
                RunOutcome::NoChange { sequence_id } => {
                    log::info!(
                        "Outcome: {} (still at snapshot {:06})",
                        outcome.status(),
                        sequence_id
                    );
                }
                RunOutcome::Changed {
                    sequence_id,
                    decision,
                    report_path,
                } => {
                    log::info!(
                        "Outcome: {} (snapshot {:06}, {}{})",
                        outcome.status(),
                        sequence_id,
                        decision.reason,
                        if decision.is_material {
                            ", notify"
                        } else {
                            ", not material"
                        }
                    );
                    if let Some(path) = report_path {
                        log::info!("Report: {}", path.display());
                    }
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (url, patterns, and timeouts)");
            log::info!("Watching: {}", config.monitor.url);
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());

            match store.latest().await? {
                Some(snapshot) => {
                    log::info!("Current snapshot: {:06}", snapshot.sequence_id);
                    log::info!("Captured at: {}", snapshot.timestamp);
                    log::info!("Content hash: {}", snapshot.content_hash);
                    log::info!("Lines: {}", snapshot.lines().len());
                }
                None => {
                    log::info!("No snapshot found yet. Run 'civicwatch run' first.");
                }
            }
        }

        Command::History { limit } => {
            let entries = store.list().await?;
            if entries.is_empty() {
                log::info!("No snapshots archived yet.");
                return Ok(());
            }

            let skip = limit.map_or(0, |n| entries.len().saturating_sub(n));
            for entry in entries.iter().skip(skip) {
                log::info!(
                    "{:06}  {}  {}",
                    entry.sequence_id,
                    entry.timestamp,
                    entry.content_hash
                );
            }
        }
    }

    Ok(())
}
