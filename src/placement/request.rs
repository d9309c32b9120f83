use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slip::{BetType, OutcomeChoice, PlayerProp, Selection};

/// Identification fields for one leg of a wager. Odds and line are never
/// sent; the venue is authoritative on pricing at acceptance time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LegSpec {
    #[serde(rename = "eventID")]
    pub event_id: String,
    #[serde(rename = "leagueID")]
    pub league_id: String,
    #[serde(rename = "betType")]
    pub bet_type: BetType,
    #[serde(rename = "selection")]
    pub outcome: OutcomeChoice,
    #[serde(rename = "playerId", skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(rename = "playerName", skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    #[serde(rename = "statType", skip_serializing_if = "Option::is_none")]
    pub stat_type: Option<String>,
    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl LegSpec {
    pub fn from_selection(sel: &Selection) -> Self {
        let prop = sel.player_prop.as_ref();
        Self {
            event_id: sel.event_id.clone(),
            league_id: sel.league_id.clone(),
            bet_type: sel.bet_type,
            outcome: sel.outcome,
            player_id: prop.map(|p: &PlayerProp| p.player_id.clone()),
            player_name: prop.map(|p| p.player_name.clone()),
            stat_type: prop.map(|p| p.stat_type.clone()),
            display_name: prop.map(|p| p.display_name.clone()),
            category: prop.map(|p| p.category.clone()),
        }
    }
}

/// Body for `POST /bets`: one independently staked and settled wager.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaceBetRequest {
    pub user: String,
    pub pool: String,
    #[serde(flatten)]
    pub leg: LegSpec,
    pub stake: f64,
    /// Client-generated idempotency and correlation id.
    #[serde(rename = "clientBetID")]
    pub client_bet_id: Uuid,
}

impl PlaceBetRequest {
    pub fn from_selection(user: &str, pool: &str, sel: &Selection, stake: f64) -> Self {
        Self {
            user: user.to_string(),
            pool: pool.to_string(),
            leg: LegSpec::from_selection(sel),
            stake,
            client_bet_id: Uuid::new_v4(),
        }
    }
}

/// Body for `POST /bets/parlay`: one wager over all legs. Each leg carries
/// identification fields only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaceParlayRequest {
    pub user: String,
    pub pool: String,
    pub stake: f64,
    pub legs: Vec<LegSpec>,
    #[serde(rename = "clientBetID")]
    pub client_bet_id: Uuid,
}

impl PlaceParlayRequest {
    pub fn from_slip(user: &str, pool: &str, stake: f64, selections: &[Selection]) -> Self {
        Self {
            user: user.to_string(),
            pool: pool.to_string(),
            stake,
            legs: selections.iter().map(LegSpec::from_selection).collect(),
            client_bet_id: Uuid::new_v4(),
        }
    }
}

/// Accept/reject envelope shared by both settlement endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaceResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}
