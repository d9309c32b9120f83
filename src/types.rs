use std::fs;

use anyhow::Context;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Paper,
    Live,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,
}

/// Settlement venue endpoint and API credentials.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_passphrase: String,
}

/// Stake and leg bounds enforced before any wager reaches the venue.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BetLimits {
    /// Maximum stake for any single wager (per leg in straight mode, the
    /// combined stake in parlay mode).
    pub max_stake: f64,
    /// Minimum number of legs for a parlay.
    pub min_parlay_legs: usize,
    /// Maximum number of legs for a parlay.
    pub max_parlay_legs: usize,
}

impl Default for BetLimits {
    fn default() -> Self {
        Self {
            max_stake: 10_000.0,
            min_parlay_legs: 2,
            max_parlay_legs: 10,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Stake assigned to a selection on first insertion.
    pub default_stake: f64,
    #[serde(default)]
    pub limits: BetLimits,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_stake: 10.0,
            limits: BetLimits::default(),
        }
    }
}

/// Acting user context used by the operator binary. In-process callers build
/// their own `validation::SubmissionContext` from the identity provider.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub pool_id: Option<String>,
    #[serde(default)]
    pub available_balance: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExecutionConfig {
    pub mode: ExecutionMode,
    /// Per-wager stake cap enforced by the simulated venue in paper mode.
    #[serde(default = "default_paper_max_stake")]
    pub paper_max_stake: f64,
}

fn default_paper_max_stake() -> f64 {
    1_000.0
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub redis: RedisConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {path}"))?;
        let cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to deserialize TOML config at {path}"))?;
        Ok(cfg)
    }
}
