//! Stake reconciliation daemon
//!
//! Runs the fleet reconciler on a fixed interval so cache staleness is
//! bounded by the schedule, until Ctrl-C.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use solana_sdk::pubkey::Pubkey;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stake_sync::config::SyncConfig;
use stake_sync::database::PostgresStore;
use stake_sync::chain::RpcReader;
use stake_sync::sync::FleetReconciler;

#[derive(Parser)]
#[command(name = "stake-syncd")]
#[command(about = "Periodic on-chain/off-chain stake reconciliation")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "stake-sync.toml")]
    config: String,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    /// Run a single reconciliation pass and exit
    #[arg(long)]
    once: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if std::path::Path::new(&cli.config).exists() {
        SyncConfig::from_file(&cli.config)?
    } else {
        // The tracing subscriber is not installed yet at this point
        eprintln!("Config file not found, using defaults: {}", cli.config);
        SyncConfig::default()
    };

    if let Some(log_level) = cli.log_level {
        config.monitoring.log_level = log_level;
    }

    init_logging(&config)?;

    info!("Starting stake reconciliation daemon");
    info!("Program ID: {}", config.rpc.program_id);
    info!("RPC endpoint: {}", config.rpc.endpoint);
    info!("Sync interval: {}s", config.sync.interval_secs);

    config.validate_config()?;
    let program_id = Pubkey::from_str(&config.rpc.program_id)?;

    if cli.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        return Ok(());
    }

    info!("Initializing database connection...");
    let store = Arc::new(PostgresStore::new(&config.database).await?);
    store.migrate().await?;
    info!("Database ready");

    let chain = Arc::new(RpcReader::new(
        config.rpc.endpoint.clone(),
        program_id,
        config.rpc.commitment.clone(),
        Duration::from_secs(config.rpc.connect_timeout_secs),
        Duration::from_secs(config.rpc.request_timeout_secs),
    ));

    let reconciler = FleetReconciler::new(chain, store, program_id);

    if cli.once {
        let report = reconciler.sync_all().await?;
        info!(
            synced = report.synced,
            deleted = report.deleted,
            skipped = report.skipped,
            "single reconciliation pass complete"
        );
        return Ok(());
    }

    let mut interval = tokio::time::interval(Duration::from_secs(config.sync.interval_secs));
    info!("Reconciler started. Press Ctrl+C to shutdown.");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match reconciler.sync_all().await {
                    Ok(report) => info!(
                        synced = report.synced,
                        deleted = report.deleted,
                        skipped = report.skipped,
                        "reconciliation run complete"
                    ),
                    // Transient failures leave the cache untouched; the
                    // next tick retries the whole run
                    Err(e) => error!("reconciliation run failed: {e}"),
                }
            }
            _ = signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
        }
    }

    info!("Shutting down stake reconciliation daemon");
    Ok(())
}

fn init_logging(config: &SyncConfig) -> Result<()> {
    let log_level = config.monitoring.log_level.clone();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("stake_sync={log_level}").into());

    if config.monitoring.structured_logging {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    Ok(())
}
