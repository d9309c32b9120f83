use std::time::Duration;

use tracing::{info, warn};

use crate::client::{ClientResult, SettlementClient};
use crate::monitoring::metrics::METRICS;
use crate::slip::{SlipMode, SlipState};
use crate::types::{AppConfig, ExecutionMode};

use super::request::{PlaceBetRequest, PlaceParlayRequest, PlaceResponse};
use super::PlacementResult;

/// Shown when the venue gives no structured error (transport failure,
/// undecodable body). The raw failure is logged, not surfaced.
const FALLBACK_ERROR: &str = "bet could not be placed";

/// One accepted wager.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedBet {
    pub id: String,
    pub label: String,
}

/// One rejected wager, with the venue's message where it provided one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedBet {
    pub id: String,
    pub label: String,
    pub error: String,
}

/// Aggregated outcome of one submission round.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlacementReport {
    pub successful: Vec<PlacedBet>,
    pub failed: Vec<FailedBet>,
    /// Combined stake of the accepted wagers.
    pub total_stake: f64,
}

impl PlacementReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty() && !self.successful.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.successful.is_empty() && self.failed.is_empty()
    }
}

/// Backend for settlement – either a simulated venue (paper) or live HTTP.
pub enum SettlementBackend {
    Paper(PaperSettlement),
    Live(SettlementClient),
}

/// Submits a validated slip to the settlement venue and reconciles the
/// selection store with what the venue actually accepted.
pub struct PlacementOrchestrator {
    backend: SettlementBackend,
}

impl PlacementOrchestrator {
    pub fn new(backend: SettlementBackend) -> Self {
        Self { backend }
    }

    pub fn from_config(cfg: &AppConfig) -> PlacementResult<Self> {
        let backend = match cfg.execution.mode {
            ExecutionMode::Paper => {
                SettlementBackend::Paper(PaperSettlement::new(cfg.execution.paper_max_stake))
            }
            ExecutionMode::Live => SettlementBackend::Live(SettlementClient::new(&cfg.api)?),
        };
        Ok(Self::new(backend))
    }

    /// Submit the slip. Callers must have run validation first; an empty slip
    /// yields an empty report without touching the network.
    ///
    /// Straight mode issues one request per leg, each awaited before the next
    /// is sent. That bounds in-flight exposure and keeps the result order
    /// deterministic, at the cost of latency versus concurrent submission.
    pub async fn place(&self, state: &mut SlipState, user: &str, pool: &str) -> PlacementReport {
        if state.selections.is_empty() {
            return PlacementReport::default();
        }
        match state.mode {
            SlipMode::Parlay => self.place_parlay(state, user, pool).await,
            SlipMode::Straight => self.place_straight(state, user, pool).await,
        }
    }

    async fn place_parlay(&self, state: &mut SlipState, user: &str, pool: &str) -> PlacementReport {
        let stake = state.parlay_stake.unwrap_or(0.0);
        let legs = state.selections.len();
        let req = PlaceParlayRequest::from_slip(user, pool, stake, &state.selections);

        info!(
            target: "placement",
            client_bet_id = %req.client_bet_id,
            legs,
            stake,
            "submitting parlay"
        );
        METRICS.record_bet_submitted("parlay");

        let mut report = PlacementReport::default();
        match self.submit_parlay(&req).await {
            Ok(resp) if resp.success => {
                report.total_stake = stake;
                for sel in &state.selections {
                    report.successful.push(PlacedBet {
                        id: sel.id.clone(),
                        label: sel.label(),
                    });
                }
                // A parlay settles as one wager; the whole slip is spent.
                state.clear();
                METRICS.record_bet_accepted("parlay");
            }
            Ok(resp) => {
                let error = resp.error.unwrap_or_else(|| FALLBACK_ERROR.to_string());
                METRICS.record_bet_rejected("parlay", &error);
                report.failed.push(FailedBet {
                    id: "parlay".to_string(),
                    label: format!("{legs}-leg parlay"),
                    error,
                });
            }
            Err(err) => {
                warn!(target: "placement", error = %err, "parlay submission failed in transport");
                METRICS.record_bet_rejected("parlay", &err.to_string());
                report.failed.push(FailedBet {
                    id: "parlay".to_string(),
                    label: format!("{legs}-leg parlay"),
                    error: FALLBACK_ERROR.to_string(),
                });
            }
        }
        report
    }

    async fn place_straight(
        &self,
        state: &mut SlipState,
        user: &str,
        pool: &str,
    ) -> PlacementReport {
        let mut report = PlacementReport::default();

        for sel in &state.selections {
            let label = sel.label();
            let Some(stake) = sel.stake.filter(|s| *s > 0.0) else {
                // Validation should have caught this; fold it in as a
                // rejection rather than panic.
                report.failed.push(FailedBet {
                    id: sel.id.clone(),
                    label,
                    error: "missing stake".to_string(),
                });
                continue;
            };

            let req = PlaceBetRequest::from_selection(user, pool, sel, stake);
            info!(
                target: "placement",
                client_bet_id = %req.client_bet_id,
                id = %sel.id,
                stake,
                "submitting straight bet"
            );
            METRICS.record_bet_submitted("straight");

            // Each leg is its own wager: a rejection never cancels the rest.
            match self.submit_bet(&req).await {
                Ok(resp) if resp.success => {
                    report.total_stake += stake;
                    report.successful.push(PlacedBet {
                        id: sel.id.clone(),
                        label,
                    });
                    METRICS.record_bet_accepted("straight");
                }
                Ok(resp) => {
                    let error = resp.error.unwrap_or_else(|| FALLBACK_ERROR.to_string());
                    METRICS.record_bet_rejected("straight", &error);
                    report.failed.push(FailedBet {
                        id: sel.id.clone(),
                        label,
                        error,
                    });
                }
                Err(err) => {
                    warn!(
                        target: "placement",
                        id = %sel.id,
                        error = %err,
                        "straight bet failed in transport"
                    );
                    METRICS.record_bet_rejected("straight", &err.to_string());
                    report.failed.push(FailedBet {
                        id: sel.id.clone(),
                        label,
                        error: FALLBACK_ERROR.to_string(),
                    });
                }
            }
        }

        // Reconcile: drop exactly what the venue accepted. Failed legs stay
        // on the slip for retry.
        if report.all_succeeded() {
            state.clear();
        } else {
            for placed in &report.successful {
                state.remove(&placed.id);
            }
        }

        report
    }

    async fn submit_bet(&self, req: &PlaceBetRequest) -> ClientResult<PlaceResponse> {
        match &self.backend {
            SettlementBackend::Paper(paper) => Ok(paper.place_bet(req).await),
            SettlementBackend::Live(client) => client.post("/bets", req).await,
        }
    }

    async fn submit_parlay(&self, req: &PlaceParlayRequest) -> ClientResult<PlaceResponse> {
        match &self.backend {
            SettlementBackend::Paper(paper) => Ok(paper.place_parlay(req).await),
            SettlementBackend::Live(client) => client.post("/bets/parlay", req).await,
        }
    }
}

/// Simulated settlement venue for paper mode: accepts wagers after a small
/// latency, enforcing only the venue-style per-wager stake cap.
pub struct PaperSettlement {
    max_stake: f64,
}

impl PaperSettlement {
    pub fn new(max_stake: f64) -> Self {
        Self { max_stake }
    }

    async fn simulate_latency(&self) {
        let jitter = rand::random::<u64>() % 5;
        tokio::time::sleep(Duration::from_millis(3 + jitter)).await;
    }

    fn check_stake(&self, stake: f64) -> PlaceResponse {
        if stake > self.max_stake {
            PlaceResponse {
                success: false,
                error: Some(format!(
                    "stake {stake:.2} exceeds venue limit {:.2}",
                    self.max_stake
                )),
            }
        } else {
            PlaceResponse {
                success: true,
                error: None,
            }
        }
    }

    pub async fn place_bet(&self, req: &PlaceBetRequest) -> PlaceResponse {
        self.simulate_latency().await;
        self.check_stake(req.stake)
    }

    pub async fn place_parlay(&self, req: &PlaceParlayRequest) -> PlaceResponse {
        self.simulate_latency().await;
        self.check_stake(req.stake)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slip::{BetType, OutcomeChoice, Selection};
    use chrono::{TimeZone, Utc};

    fn sel(id: &str, event: &str, stake: f64) -> Selection {
        Selection {
            id: id.to_string(),
            event_id: event.to_string(),
            league_id: "nba".to_string(),
            game_time: Utc.with_ymd_and_hms(2026, 1, 15, 19, 0, 0).unwrap(),
            matchup: "Lakers @ Celtics".to_string(),
            team_name: "Celtics".to_string(),
            bet_type: BetType::Spread,
            outcome: OutcomeChoice::Home,
            odds: -110,
            line: Some(-3.5),
            stake: Some(stake),
            player_prop: None,
        }
    }

    fn paper(max_stake: f64) -> PlacementOrchestrator {
        PlacementOrchestrator::new(SettlementBackend::Paper(PaperSettlement::new(max_stake)))
    }

    #[tokio::test]
    async fn all_accepted_clears_the_slip() {
        let orchestrator = paper(1_000.0);
        let mut state = SlipState {
            selections: vec![sel("a", "evt-1", 10.0), sel("b", "evt-2", 20.0)],
            mode: SlipMode::Straight,
            parlay_stake: None,
        };

        let report = orchestrator.place(&mut state, "u-1", "pool-1").await;

        assert!(report.all_succeeded());
        assert_eq!(report.successful.len(), 2);
        assert_eq!(report.total_stake, 30.0);
        assert!(state.is_empty());
        assert_eq!(state.mode, SlipMode::Straight);
    }

    #[tokio::test]
    async fn partial_failure_keeps_only_the_failed_leg() {
        let orchestrator = paper(1_000.0);
        let mut state = SlipState {
            selections: vec![
                sel("a", "evt-1", 10.0),
                sel("b", "evt-2", 5_000.0),
                sel("c", "evt-3", 20.0),
            ],
            mode: SlipMode::Straight,
            parlay_stake: None,
        };

        let report = orchestrator.place(&mut state, "u-1", "pool-1").await;

        assert_eq!(report.successful.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].id, "b");
        assert!(report.failed[0].error.contains("venue limit"));
        assert_eq!(report.total_stake, 30.0);

        // Legs a and c were placed; only b remains for retry.
        assert_eq!(state.len(), 1);
        assert!(state.selection("b").is_some());
    }

    #[tokio::test]
    async fn all_failed_leaves_the_slip_untouched() {
        let orchestrator = paper(1.0);
        let mut state = SlipState {
            selections: vec![sel("a", "evt-1", 10.0), sel("b", "evt-2", 20.0)],
            mode: SlipMode::Straight,
            parlay_stake: None,
        };

        let report = orchestrator.place(&mut state, "u-1", "pool-1").await;

        assert!(report.successful.is_empty());
        assert_eq!(report.failed.len(), 2);
        assert_eq!(state.len(), 2);
    }

    #[tokio::test]
    async fn accepted_parlay_clears_the_slip() {
        let orchestrator = paper(1_000.0);
        let mut state = SlipState {
            selections: vec![sel("a", "evt-1", 10.0), sel("b", "evt-2", 10.0)],
            mode: SlipMode::Parlay,
            parlay_stake: Some(25.0),
        };

        let report = orchestrator.place(&mut state, "u-1", "pool-1").await;

        assert!(report.all_succeeded());
        assert_eq!(report.successful.len(), 2);
        assert_eq!(report.total_stake, 25.0);
        assert!(state.is_empty());
        assert_eq!(state.parlay_stake, None);
    }

    #[tokio::test]
    async fn rejected_parlay_leaves_the_slip_untouched() {
        let orchestrator = paper(1_000.0);
        let mut state = SlipState {
            selections: vec![sel("a", "evt-1", 10.0), sel("b", "evt-2", 10.0)],
            mode: SlipMode::Parlay,
            parlay_stake: Some(5_000.0),
        };

        let report = orchestrator.place(&mut state, "u-1", "pool-1").await;

        assert!(report.successful.is_empty());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].label, "2-leg parlay");
        assert_eq!(state.len(), 2);
        assert_eq!(state.parlay_stake, Some(5_000.0));
    }

    #[tokio::test]
    async fn empty_slip_yields_empty_report() {
        let orchestrator = paper(1_000.0);
        let mut state = SlipState::default();
        let report = orchestrator.place(&mut state, "u-1", "pool-1").await;
        assert!(report.is_empty());
    }
}
