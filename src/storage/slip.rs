use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::slip::Selection;
use crate::types::RedisConfig;

/// Fixed key the active slip is persisted under.
pub const SLIP_KEY: &str = "betslip:active";

/// Current layout of the persisted record.
pub const SLIP_SCHEMA_VERSION: u32 = 1;

/// Durable shape of the slip. Only selections are persisted; mode, parlay
/// stake and UI visibility are session-local.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersistedSlip {
    pub version: u32,
    pub selections: Vec<Selection>,
}

/// Drop selections whose event has already started; their quoted odds are
/// stale and must not be resurrected into an active slip. Returns the kept
/// selections and how many were dropped.
pub fn filter_stale(selections: Vec<Selection>, now: DateTime<Utc>) -> (Vec<Selection>, usize) {
    let before = selections.len();
    let kept: Vec<Selection> = selections
        .into_iter()
        .filter(|s| s.game_time > now)
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

/// Durable slip storage under a single fixed Redis key.
pub struct SlipStore {
    conn: ConnectionManager,
}

impl SlipStore {
    pub async fn new(cfg: &RedisConfig) -> anyhow::Result<Self> {
        let client = super::create_redis_client(cfg)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }

    pub fn from_connection(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Overwrite the persisted slip with the given selections.
    pub async fn save(&mut self, selections: &[Selection]) -> anyhow::Result<()> {
        let record = PersistedSlip {
            version: SLIP_SCHEMA_VERSION,
            selections: selections.to_vec(),
        };
        let val = serde_json::to_string(&record)?;
        let _: () = self.conn.set(SLIP_KEY, val).await?;
        Ok(())
    }

    /// Fire-and-forget save used on every selection mutation. Persistence is
    /// not on the critical path, so failures are logged rather than surfaced.
    pub fn save_in_background(&self, selections: Vec<Selection>) {
        let mut store = SlipStore {
            conn: self.conn.clone(),
        };
        tokio::spawn(async move {
            match store.save(&selections).await {
                Ok(()) => {
                    crate::monitoring::metrics::METRICS.record_slip_saved(selections.len());
                }
                Err(err) => {
                    warn!(target: "storage", error = %err, "background slip save failed");
                }
            }
        });
    }

    /// Load the persisted slip, dropping selections whose event has started.
    ///
    /// If the staleness filter removed anything, the filtered list is
    /// re-saved immediately so storage stays consistent with what the caller
    /// will show. A missing or undecodable record loads as an empty slip.
    pub async fn load(&mut self, now: DateTime<Utc>) -> anyhow::Result<Vec<Selection>> {
        let raw: Option<String> = self.conn.get(SLIP_KEY).await?;
        let Some(json) = raw else {
            return Ok(Vec::new());
        };

        let record: PersistedSlip = match serde_json::from_str(&json) {
            Ok(record) => record,
            Err(err) => {
                warn!(
                    target: "storage",
                    error = %err,
                    "undecodable slip record; treating as empty"
                );
                return Ok(Vec::new());
            }
        };
        if record.version != SLIP_SCHEMA_VERSION {
            warn!(
                target: "storage",
                version = record.version,
                "unknown slip schema version; treating as empty"
            );
            return Ok(Vec::new());
        }

        let (kept, dropped) = filter_stale(record.selections, now);
        if dropped > 0 {
            debug!(
                target: "storage",
                dropped,
                kept = kept.len(),
                "dropped stale selections on load"
            );
            self.save(&kept).await?;
        }
        Ok(kept)
    }

    /// Delete the persisted record entirely. Used after a full clear or a
    /// fully successful placement, never after a partial one.
    pub async fn clear(&mut self) -> anyhow::Result<()> {
        let _: () = self.conn.del(SLIP_KEY).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slip::{BetType, OutcomeChoice};
    use chrono::TimeZone;

    fn sel(id: &str, game_time: DateTime<Utc>) -> Selection {
        Selection {
            id: id.to_string(),
            event_id: "evt-1".to_string(),
            league_id: "nba".to_string(),
            game_time,
            matchup: "Lakers @ Celtics".to_string(),
            team_name: "Celtics".to_string(),
            bet_type: BetType::Spread,
            outcome: OutcomeChoice::Home,
            odds: -110,
            line: Some(-3.5),
            stake: Some(10.0),
            player_prop: None,
        }
    }

    #[test]
    fn filter_drops_started_events_only() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 19, 0, 0).unwrap();
        let past = now - chrono::Duration::hours(2);
        let future = now + chrono::Duration::hours(2);

        let (kept, dropped) = filter_stale(
            vec![sel("old", past), sel("upcoming", future), sel("tip-off", now)],
            now,
        );
        // An event starting exactly now is already live.
        assert_eq!(dropped, 2);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "upcoming");
    }

    #[test]
    fn filter_keeps_everything_when_nothing_started() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 19, 0, 0).unwrap();
        let future = now + chrono::Duration::minutes(30);
        let (kept, dropped) = filter_stale(vec![sel("a", future), sel("b", future)], now);
        assert_eq!(dropped, 0);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn persisted_record_carries_schema_version() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 19, 0, 0).unwrap();
        let record = PersistedSlip {
            version: SLIP_SCHEMA_VERSION,
            selections: vec![sel("a", now)],
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["version"], 1);
        assert!(json["selections"][0].get("eventID").is_some());

        let back: PersistedSlip = serde_json::from_value(json).unwrap();
        assert_eq!(back.selections, record.selections);
    }
}
