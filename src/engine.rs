use chrono::Utc;
use tracing::{debug, info, warn};

use crate::placement::{PlacementOrchestrator, PlacementReport};
use crate::slip::{Selection, SlipAction, SlipMode, SlipState, SlipTotals};
use crate::storage::slip::SlipStore;
use crate::types::{AppConfig, BetLimits};
use crate::validation::{self, SubmissionContext, ValidationError};

/// In-process facade for a user's bet slip, wiring the selection store to
/// persistence, validation and placement.
///
/// The engine owns the slip state exclusively. Every mutation that changes
/// the selection list schedules a best-effort background save so the slip
/// survives restarts; mode and parlay stake are session-local.
///
/// Single-writer by design: the engine expects one logical caller (the active
/// UI interaction) and must be wrapped in external serialization before being
/// shared.
pub struct BetSlipEngine {
    state: SlipState,
    store: SlipStore,
    orchestrator: PlacementOrchestrator,
    default_stake: f64,
    limits: BetLimits,
}

impl BetSlipEngine {
    /// Build the engine from config and restore the persisted slip, dropping
    /// selections whose event has already started.
    pub async fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let mut store = SlipStore::new(&cfg.redis).await?;
        let selections = store.load(Utc::now()).await?;
        if !selections.is_empty() {
            info!(
                target: "engine",
                restored = selections.len(),
                "restored persisted slip"
            );
        }
        let orchestrator = PlacementOrchestrator::from_config(cfg)?;

        Ok(Self {
            state: SlipState {
                selections,
                ..Default::default()
            },
            store,
            orchestrator,
            default_stake: cfg.engine.default_stake,
            limits: cfg.engine.limits,
        })
    }

    pub fn state(&self) -> &SlipState {
        &self.state
    }

    /// Derived stake/payout/profit figures for the current slip.
    pub fn totals(&self) -> SlipTotals {
        SlipTotals::compute(&self.state)
    }

    /// Offer a candidate selection to the slip (insert, toggle off, or
    /// replace) and persist the result in the background.
    pub fn add_or_toggle(&mut self, candidate: Selection) -> SlipAction {
        let action = self.state.add_or_toggle(candidate, self.default_stake);
        debug!(
            target: "engine",
            ?action,
            selections = self.state.len(),
            "slip updated"
        );
        self.store.save_in_background(self.state.selections.clone());
        action
    }

    pub fn remove(&mut self, id: &str) -> Option<Selection> {
        let removed = self.state.remove(id);
        if removed.is_some() {
            self.store.save_in_background(self.state.selections.clone());
        }
        removed
    }

    pub fn set_stake(&mut self, id: &str, amount: f64) -> bool {
        let changed = self.state.set_stake(id, amount);
        if changed {
            self.store.save_in_background(self.state.selections.clone());
        }
        changed
    }

    pub fn set_parlay_stake(&mut self, amount: f64) {
        self.state.set_parlay_stake(amount);
    }

    pub fn set_mode(&mut self, mode: SlipMode) {
        self.state.set_mode(mode);
    }

    /// Empty the slip and drop the persisted record.
    pub async fn clear(&mut self) {
        self.state.clear();
        if let Err(err) = self.store.clear().await {
            warn!(target: "storage", error = %err, "failed to drop persisted slip");
        }
    }

    /// Validate and submit the slip.
    ///
    /// Validation failures block submission entirely; no network call is
    /// made. After placement the store holds exactly the legs the venue did
    /// not accept, and persistence is brought in step with it.
    pub async fn submit(
        &mut self,
        ctx: &SubmissionContext,
    ) -> Result<PlacementReport, Vec<ValidationError>> {
        validation::validate(&self.state, ctx, &self.limits)?;
        let (Some(user), Some(pool)) = (ctx.user_id.as_deref(), ctx.pool_id.as_deref()) else {
            // validate() already rejects a missing identity; this keeps the
            // types total without unwrapping.
            return Err(vec![ValidationError::MissingIdentity]);
        };

        let report = self.orchestrator.place(&mut self.state, user, pool).await;

        if report.successful.is_empty() {
            // Nothing was accepted; store and persisted record are unchanged.
        } else if report.failed.is_empty() {
            if let Err(err) = self.store.clear().await {
                warn!(target: "storage", error = %err, "failed to drop persisted slip");
            }
            info!(
                target: "engine",
                placed = report.successful.len(),
                total_stake = report.total_stake,
                "slip fully placed"
            );
        } else {
            self.store.save_in_background(self.state.selections.clone());
            warn!(
                target: "engine",
                placed = report.successful.len(),
                failed = report.failed.len(),
                "partial placement; failed legs kept for retry"
            );
        }

        Ok(report)
    }
}
