//! # mt-runner
//!
//! Entry point for a single order run.
//!
//! Loads a JSON run config, builds the configured terminal, and runs the
//! order plan: wait for the price trigger if one is set, then submit one
//! market order. Ctrl+C while connecting or waiting cancels cleanly with exit status 0;
//! any fatal error exits non-zero. The terminal connection is released on
//! every path.
//!
//! # Usage
//!
//! ```bash
//! mt-runner configs/buy_hk50.json --log-level info
//! mt-runner configs/sell_btc.json --paper
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use mt_flow::{RunOptions, RunOutcome};
use tracing::{error, info};

/// Trigger-and-trade runner for a trading terminal.
#[derive(Parser)]
#[command(name = "mt-runner", about = "Wait for a price condition and place one market order")]
struct Cli {
    /// Run configuration file path (JSON).
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Optional log directory for file output (overrides `module.log_path`).
    #[arg(long)]
    log_dir: Option<String>,

    /// Use the config's paper terminal instead of the configured one.
    #[arg(long)]
    paper: bool,

    /// Show the live bid on one overwritten line while waiting.
    #[arg(long)]
    live_status: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration
    let config = mt_core::config::load_config(&cli.config)?;

    // 2. Initialize logging
    let log_dir = cli.log_dir.clone().or_else(|| config.log_path());
    mt_core::logging::init_logging(&cli.log_level, log_dir.as_deref(), &config.module_name());

    info!(
        "mt-runner starting — config={}, symbol={}, direction={}, volume={}",
        cli.config.display(),
        config.order.symbol,
        config.order.direction,
        config.order.volume,
    );

    // 3. Build the terminal
    let mut terminal = mt_td::registry::create_terminal(&config.terminal, cli.paper)?;
    let mut options = RunOptions::from_config(&config);
    options.live_status |= cli.live_status;

    if config.order.trigger.is_some() {
        info!("press Ctrl+C to cancel");
    }

    // 4. Run until done or interrupted
    let cancel = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    match mt_flow::run(terminal.as_mut(), &config.order, options, cancel).await {
        Ok(RunOutcome::Completed(report)) => {
            info!(
                "program completed successfully — {} {} {} lots, ticket {} at {}",
                report.direction, report.symbol, report.executed_volume, report.ticket, report.executed_price,
            );
            Ok(())
        }
        Ok(RunOutcome::Cancelled) => {
            info!("cancelled before any order was sent");
            Ok(())
        }
        Err(e) => {
            error!("run failed: {e}");
            Err(e.into())
        }
    }
}
