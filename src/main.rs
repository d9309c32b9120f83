use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use betslip_engine::engine::BetSlipEngine;
use betslip_engine::monitoring;
use betslip_engine::types::{AppConfig, ExecutionMode};
use betslip_engine::validation::SubmissionContext;

#[derive(Parser, Debug)]
#[command(name = "betslip-engine")]
#[command(about = "Bet slip engine operator console", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.toml")]
    config: String,

    /// Override execution mode (paper/live)
    #[arg(long)]
    mode: Option<ExecutionMode>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the persisted slip and its derived totals
    Show {},
    /// Validate and submit the persisted slip
    Place {},
    /// Drop the persisted slip
    Clear {},
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "betslip_engine=debug,engine=debug,info");
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();
    tracing::debug!(target: "engine", config = %cli.config, "loading config");

    let mut settings = AppConfig::from_file(&cli.config)?;
    if let Some(mode) = cli.mode {
        settings.execution.mode = mode;
    }

    monitoring::logger::log_startup(&settings);

    let mut engine = BetSlipEngine::from_config(&settings).await?;

    match cli.command.unwrap_or(Commands::Show {}) {
        Commands::Show {} => {
            let totals = engine.totals();
            for sel in &engine.state().selections {
                info!(
                    target: "engine",
                    id = %sel.id,
                    label = %sel.label(),
                    odds = sel.odds,
                    stake = ?sel.stake,
                    game_time = %sel.game_time,
                    "selection"
                );
            }
            info!(
                target: "engine",
                selections = engine.state().len(),
                mode = ?engine.state().mode,
                total_stake = totals.total_stake,
                potential_payout = totals.potential_payout,
                total_profit = totals.total_profit,
                "slip summary"
            );
        }
        Commands::Place {} => {
            let ctx = SubmissionContext {
                user_id: settings.session.user_id.clone(),
                pool_id: settings.session.pool_id.clone(),
                available_balance: settings.session.available_balance,
            };
            match engine.submit(&ctx).await {
                Ok(report) => {
                    for placed in &report.successful {
                        info!(target: "engine", id = %placed.id, label = %placed.label, "placed");
                    }
                    for failed in &report.failed {
                        warn!(
                            target: "engine",
                            id = %failed.id,
                            label = %failed.label,
                            error = %failed.error,
                            "not placed"
                        );
                    }
                    info!(
                        target: "engine",
                        placed = report.successful.len(),
                        failed = report.failed.len(),
                        total_stake = report.total_stake,
                        "placement finished"
                    );
                }
                Err(errors) => {
                    for err in &errors {
                        warn!(target: "engine", error = %err, "slip failed validation");
                    }
                }
            }
        }
        Commands::Clear {} => {
            engine.clear().await;
            info!(target: "engine", "slip cleared");
        }
    }

    Ok(())
}
