use super::{Selection, SlipMode, SlipState};

/// Outcome of offering a candidate selection to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlipAction {
    /// No selection exists for the market; the candidate was inserted.
    Insert,
    /// The identical outcome was already on the slip; it was removed.
    Remove,
    /// A different outcome on the same market was swapped for the candidate,
    /// keeping the stake already entered for that market.
    Replace,
}

/// Decide what `add_or_toggle` should do for a candidate, without touching the
/// selection list. Same market id and identical `(bet_type, outcome)` means a
/// toggle-off; same id with a different pick means the user changed their mind
/// on that market.
pub fn decide(existing: Option<&Selection>, candidate: &Selection) -> SlipAction {
    match existing {
        None => SlipAction::Insert,
        Some(current)
            if current.bet_type == candidate.bet_type && current.outcome == candidate.outcome =>
        {
            SlipAction::Remove
        }
        Some(_) => SlipAction::Replace,
    }
}

impl SlipState {
    /// Offer a candidate selection to the slip: insert it, toggle the
    /// identical outcome off, or replace a different outcome on the same
    /// market while carrying its stake over.
    pub fn add_or_toggle(&mut self, mut candidate: Selection, default_stake: f64) -> SlipAction {
        let position = self.selections.iter().position(|s| s.id == candidate.id);
        let action = decide(position.map(|i| &self.selections[i]), &candidate);

        match (action, position) {
            (SlipAction::Insert, _) => {
                if candidate.stake.is_none() {
                    candidate.stake = Some(default_stake);
                }
                self.selections.push(candidate);
            }
            (SlipAction::Remove, Some(i)) => {
                self.selections.remove(i);
            }
            (SlipAction::Replace, Some(i)) => {
                candidate.stake = self.selections[i].stake;
                self.selections[i] = candidate;
            }
            // decide() only returns Remove/Replace when a position exists.
            (SlipAction::Remove | SlipAction::Replace, None) => {}
        }

        action
    }

    /// Remove the selection with the given id, if present.
    pub fn remove(&mut self, id: &str) -> Option<Selection> {
        let i = self.selections.iter().position(|s| s.id == id)?;
        Some(self.selections.remove(i))
    }

    /// Empty the slip and reset it to single-bet defaults.
    pub fn clear(&mut self) {
        self.selections.clear();
        self.mode = SlipMode::Straight;
        self.parlay_stake = None;
    }

    /// Set the stake on a straight-mode leg. Has no effect in parlay mode,
    /// where the single combined stake is the only one that matters.
    pub fn set_stake(&mut self, id: &str, amount: f64) -> bool {
        if self.mode != SlipMode::Straight {
            return false;
        }
        match self.selections.iter_mut().find(|s| s.id == id) {
            Some(sel) => {
                sel.stake = Some(amount);
                true
            }
            None => false,
        }
    }

    pub fn set_parlay_stake(&mut self, amount: f64) {
        self.parlay_stake = Some(amount);
    }

    /// Switch staking mode. Deliberately unguarded: an ill-formed transition
    /// (single-leg parlay, conflicting events) is caught by validation before
    /// submission, not here.
    pub fn set_mode(&mut self, mode: SlipMode) {
        self.mode = mode;
    }

    pub fn selection(&self, id: &str) -> Option<&Selection> {
        self.selections.iter().find(|s| s.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }
}
