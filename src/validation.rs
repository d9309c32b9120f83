use thiserror::Error;

use crate::slip::{SlipMode, SlipState, SlipTotals};
use crate::types::BetLimits;

/// Machine-readable reasons a slip cannot be submitted.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("slip has no selections")]
    EmptySlip,

    #[error("parlay requires at least {min} legs, slip has {got}")]
    InsufficientLegs { min: usize, got: usize },

    #[error("selections {first} and {second} are both on event {event_id}")]
    SameEventConflict {
        event_id: String,
        first: String,
        second: String,
    },

    #[error("missing or non-positive stake on {id}")]
    InvalidStake { id: String },

    #[error("total stake {total_stake:.2} exceeds available balance {available:.2}")]
    InsufficientBalance { total_stake: f64, available: f64 },

    #[error("no user identity in submission context")]
    MissingIdentity,

    #[error("no pool in submission context")]
    MissingPool,

    #[error("stake {stake:.2} on {id} exceeds limit {limit:.2}")]
    StakeLimitExceeded { id: String, stake: f64, limit: f64 },

    #[error("parlay has {got} legs, limit is {max}")]
    TooManyLegs { max: usize, got: usize },
}

/// External context supplied by the caller at submission time: the acting
/// identity, the pool the wager settles against, and the spendable balance.
#[derive(Clone, Debug, Default)]
pub struct SubmissionContext {
    pub user_id: Option<String>,
    pub pool_id: Option<String>,
    pub available_balance: f64,
}

/// Run every applicable check against the slip snapshot and return all
/// failures together. Checks are evaluated eagerly (no short-circuiting) so
/// the caller can present the complete list at once.
pub fn validate(
    state: &SlipState,
    ctx: &SubmissionContext,
    limits: &BetLimits,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if state.selections.is_empty() {
        errors.push(ValidationError::EmptySlip);
    }

    if ctx.user_id.as_deref().map_or(true, str::is_empty) {
        errors.push(ValidationError::MissingIdentity);
    }
    if ctx.pool_id.as_deref().map_or(true, str::is_empty) {
        errors.push(ValidationError::MissingPool);
    }

    match state.mode {
        SlipMode::Straight => {
            for sel in &state.selections {
                match sel.stake {
                    Some(stake) if stake > 0.0 => {
                        if stake > limits.max_stake {
                            errors.push(ValidationError::StakeLimitExceeded {
                                id: sel.id.clone(),
                                stake,
                                limit: limits.max_stake,
                            });
                        }
                    }
                    _ => errors.push(ValidationError::InvalidStake {
                        id: sel.id.clone(),
                    }),
                }
            }
        }
        SlipMode::Parlay => {
            if state.selections.len() < limits.min_parlay_legs {
                errors.push(ValidationError::InsufficientLegs {
                    min: limits.min_parlay_legs,
                    got: state.selections.len(),
                });
            }
            if state.selections.len() > limits.max_parlay_legs {
                errors.push(ValidationError::TooManyLegs {
                    max: limits.max_parlay_legs,
                    got: state.selections.len(),
                });
            }

            // Parlaying correlated outcomes from one contest is disallowed.
            for (i, a) in state.selections.iter().enumerate() {
                for b in &state.selections[i + 1..] {
                    if a.event_id == b.event_id {
                        errors.push(ValidationError::SameEventConflict {
                            event_id: a.event_id.clone(),
                            first: a.id.clone(),
                            second: b.id.clone(),
                        });
                    }
                }
            }

            match state.parlay_stake {
                Some(stake) if stake > 0.0 => {
                    if stake > limits.max_stake {
                        errors.push(ValidationError::StakeLimitExceeded {
                            id: "parlay".to_string(),
                            stake,
                            limit: limits.max_stake,
                        });
                    }
                }
                _ => errors.push(ValidationError::InvalidStake {
                    id: "parlay".to_string(),
                }),
            }
        }
    }

    let totals = SlipTotals::compute(state);
    if totals.total_stake > ctx.available_balance {
        errors.push(ValidationError::InsufficientBalance {
            total_stake: totals.total_stake,
            available: ctx.available_balance,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slip::{BetType, OutcomeChoice, Selection};
    use chrono::{TimeZone, Utc};

    fn sel(id: &str, event: &str, stake: Option<f64>) -> Selection {
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
            stake,
            player_prop: None,
        }
    }

    fn ctx(balance: f64) -> SubmissionContext {
        SubmissionContext {
            user_id: Some("u-1".to_string()),
            pool_id: Some("pool-1".to_string()),
            available_balance: balance,
        }
    }

    #[test]
    fn valid_straight_slip_passes() {
        let state = SlipState {
            selections: vec![sel("a", "evt-1", Some(10.0)), sel("b", "evt-2", Some(10.0))],
            mode: SlipMode::Straight,
            parlay_stake: None,
        };
        assert!(validate(&state, &ctx(100.0), &BetLimits::default()).is_ok());
    }

    #[test]
    fn empty_slip_is_reported() {
        let errors = validate(&SlipState::default(), &ctx(100.0), &BetLimits::default())
            .unwrap_err();
        assert!(errors.contains(&ValidationError::EmptySlip));
    }

    #[test]
    fn same_event_parlay_is_rejected() {
        let state = SlipState {
            selections: vec![sel("a", "evt-1", None), sel("b", "evt-1", None)],
            mode: SlipMode::Parlay,
            parlay_stake: Some(10.0),
        };
        let errors = validate(&state, &ctx(100.0), &BetLimits::default()).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::SameEventConflict { event_id, .. } if event_id == "evt-1"
        )));
    }

    #[test]
    fn single_leg_parlay_is_rejected() {
        let state = SlipState {
            selections: vec![sel("a", "evt-1", None)],
            mode: SlipMode::Parlay,
            parlay_stake: Some(10.0),
        };
        let errors = validate(&state, &ctx(100.0), &BetLimits::default()).unwrap_err();
        assert!(errors.contains(&ValidationError::InsufficientLegs { min: 2, got: 1 }));
    }

    #[test]
    fn all_applicable_errors_are_returned_together() {
        // Missing identity and pool, same-event conflict, missing parlay
        // stake, all in one pass.
        let state = SlipState {
            selections: vec![sel("a", "evt-1", None), sel("b", "evt-1", None)],
            mode: SlipMode::Parlay,
            parlay_stake: None,
        };
        let no_session = SubmissionContext::default();
        let errors = validate(&state, &no_session, &BetLimits::default()).unwrap_err();
        assert!(errors.contains(&ValidationError::MissingIdentity));
        assert!(errors.contains(&ValidationError::MissingPool));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::SameEventConflict { .. })));
        assert!(errors.contains(&ValidationError::InvalidStake {
            id: "parlay".to_string()
        }));
    }

    #[test]
    fn zero_and_missing_stakes_are_invalid() {
        let state = SlipState {
            selections: vec![sel("a", "evt-1", Some(0.0)), sel("b", "evt-2", None)],
            mode: SlipMode::Straight,
            parlay_stake: None,
        };
        let errors = validate(&state, &ctx(100.0), &BetLimits::default()).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| matches!(e, ValidationError::InvalidStake { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn balance_and_stake_limits_are_enforced() {
        let state = SlipState {
            selections: vec![sel("a", "evt-1", Some(50_000.0))],
            mode: SlipMode::Straight,
            parlay_stake: None,
        };
        let errors = validate(&state, &ctx(100.0), &BetLimits::default()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::StakeLimitExceeded { .. })));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InsufficientBalance { .. })));
    }
}
