use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::odds::{self, MIN_PARLAY_LEGS};

pub mod store;

pub use store::{decide, SlipAction};

/// Kind of market a selection is placed on.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BetType {
    Spread,
    Total,
    Moneyline,
    PlayerProp,
}

/// Chosen side of a market. Which variants are meaningful depends on the bet
/// type: home/away for spreads and moneylines, over/under for totals, yes/no
/// for props.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeChoice {
    Home,
    Away,
    Over,
    Under,
    Yes,
    No,
}

/// Player prop metadata carried through to the settlement venue unchanged.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProp {
    pub player_id: String,
    pub player_name: String,
    pub stat_type: String,
    pub display_name: String,
    pub category: String,
}

/// One leg of a potential wager.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Selection {
    /// Stable composite market key supplied by the catalog layer; the same
    /// market always produces the same id, so a different outcome on the same
    /// id replaces rather than duplicates.
    pub id: String,
    #[serde(rename = "eventID")]
    pub event_id: String,
    #[serde(rename = "leagueID")]
    pub league_id: String,
    /// Scheduled start of the underlying event; once it has passed the quoted
    /// odds are stale and the selection must not be resurrected.
    #[serde(rename = "gameTime")]
    pub game_time: DateTime<Utc>,
    pub matchup: String,
    #[serde(rename = "teamName")]
    pub team_name: String,
    #[serde(rename = "betType")]
    pub bet_type: BetType,
    #[serde(rename = "selection")]
    pub outcome: OutcomeChoice,
    /// American odds quoted when the selection was added. Display only; the
    /// venue re-prices at acceptance time.
    pub odds: i32,
    /// Point or total line; absent for moneylines and yes/no props.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<f64>,
    /// Per-leg stake, meaningful only while the slip is in straight mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stake: Option<f64>,
    #[serde(
        default,
        rename = "playerPropData",
        skip_serializing_if = "Option::is_none"
    )]
    pub player_prop: Option<PlayerProp>,
}

impl Selection {
    /// Conventional composite key for a market: `event:bet_type`, extended
    /// with player and stat for props so each prop market keys separately.
    pub fn market_key(event_id: &str, bet_type: BetType, player_prop: Option<&PlayerProp>) -> String {
        let kind = match bet_type {
            BetType::Spread => "spread",
            BetType::Total => "total",
            BetType::Moneyline => "moneyline",
            BetType::PlayerProp => "player_prop",
        };
        match player_prop {
            Some(prop) => format!("{event_id}:{kind}:{}:{}", prop.player_id, prop.stat_type),
            None => format!("{event_id}:{kind}"),
        }
    }

    /// Short human label used in placement reports and logs.
    pub fn label(&self) -> String {
        match &self.player_prop {
            Some(prop) => format!("{} {}", prop.player_name, prop.display_name),
            None => format!("{} ({})", self.team_name, self.matchup),
        }
    }
}

/// Staking mode for the whole slip.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SlipMode {
    #[default]
    Straight,
    Parlay,
}

/// Full in-memory state of the active bet slip. Owned exclusively by the
/// engine; callers observe it through shared references.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SlipState {
    pub selections: Vec<Selection>,
    pub mode: SlipMode,
    /// Combined stake, meaningful only in parlay mode.
    #[serde(rename = "parlayStake", default, skip_serializing_if = "Option::is_none")]
    pub parlay_stake: Option<f64>,
}

/// Derived money quantities for the current slip. Always recomputed from
/// state, never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SlipTotals {
    pub total_stake: f64,
    pub potential_payout: f64,
    pub total_profit: f64,
}

impl SlipTotals {
    pub fn compute(state: &SlipState) -> Self {
        match state.mode {
            SlipMode::Straight => {
                let mut total_stake = 0.0;
                let mut potential_payout = 0.0;
                for sel in &state.selections {
                    let Some(stake) = sel.stake else { continue };
                    total_stake += stake;
                    if let Ok(ret) = odds::payout(stake, sel.odds) {
                        potential_payout += ret;
                    }
                }
                Self {
                    total_stake,
                    potential_payout,
                    total_profit: potential_payout - total_stake,
                }
            }
            SlipMode::Parlay => {
                let stake = state.parlay_stake.unwrap_or(0.0);
                let legs: Vec<i32> = state.selections.iter().map(|s| s.odds).collect();
                match odds::combine(&legs, MIN_PARLAY_LEGS) {
                    Ok(combined) if stake > 0.0 => {
                        let potential_payout = stake * combined.decimal;
                        Self {
                            total_stake: stake,
                            potential_payout,
                            total_profit: potential_payout - stake,
                        }
                    }
                    // Not enough legs or no stake yet; totals are a display
                    // quantity, so an ill-formed parlay just prices at zero.
                    _ => Self {
                        total_stake: stake,
                        ..Self::default()
                    },
                }
            }
        }
    }
}
