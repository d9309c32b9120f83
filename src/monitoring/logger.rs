use serde::Serialize;
use tracing::info;

use crate::types::AppConfig;

#[derive(Serialize)]
struct StartupLog<'a> {
    event: &'a str,
    execution_mode: &'a str,
    settlement_url: &'a str,
    default_stake: f64,
    max_parlay_legs: usize,
}

pub fn log_startup(cfg: &AppConfig) {
    let mode = match cfg.execution.mode {
        crate::types::ExecutionMode::Paper => "paper",
        crate::types::ExecutionMode::Live => "live",
    };
    let payload = StartupLog {
        event: "startup",
        execution_mode: mode,
        settlement_url: &cfg.api.base_url,
        default_stake: cfg.engine.default_stake,
        max_parlay_legs: cfg.engine.limits.max_parlay_legs,
    };
    info!(target: "engine", startup = serde_json::to_string(&payload).unwrap_or_default().as_str());
}
