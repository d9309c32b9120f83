use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::info;

/// Global metrics registry used across the engine.
pub static METRICS: Lazy<Metrics> = Lazy::new(Metrics::default);

fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs()
}

#[derive(Default)]
struct MetricsInner {
    slips_saved: AtomicU64,
    bets_submitted: AtomicU64,
    bets_accepted: AtomicU64,
    bets_rejected: AtomicU64,
    last_event_ts: AtomicU64,
}

/// Lightweight metrics handle backed by atomics so it can be cloned cheaply.
#[derive(Clone, Default)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

impl Metrics {
    pub fn record_slip_saved(&self, selections: usize) {
        self.inner.slips_saved.fetch_add(1, Ordering::Relaxed);
        self.inner
            .last_event_ts
            .store(now_unix_secs(), Ordering::Relaxed);

        info!(
            target: "metrics",
            event = "slip_saved",
            selections,
            total_saves = self.inner.slips_saved.load(Ordering::Relaxed),
            "slip persisted"
        );
    }

    pub fn record_bet_submitted(&self, kind: &str) {
        self.inner.bets_submitted.fetch_add(1, Ordering::Relaxed);
        self.inner
            .last_event_ts
            .store(now_unix_secs(), Ordering::Relaxed);

        info!(
            target: "metrics",
            event = "bet_submitted",
            kind = %kind,
            total_submitted = self.inner.bets_submitted.load(Ordering::Relaxed),
            "bet submitted"
        );
    }

    pub fn record_bet_accepted(&self, kind: &str) {
        self.inner.bets_accepted.fetch_add(1, Ordering::Relaxed);
        self.inner
            .last_event_ts
            .store(now_unix_secs(), Ordering::Relaxed);

        info!(
            target: "metrics",
            event = "bet_accepted",
            kind = %kind,
            total_accepted = self.inner.bets_accepted.load(Ordering::Relaxed),
            "bet accepted"
        );
    }

    pub fn record_bet_rejected(&self, kind: &str, reason: &str) {
        self.inner.bets_rejected.fetch_add(1, Ordering::Relaxed);
        self.inner
            .last_event_ts
            .store(now_unix_secs(), Ordering::Relaxed);

        info!(
            target: "metrics",
            event = "bet_rejected",
            kind = %kind,
            reason = %reason,
            total_rejected = self.inner.bets_rejected.load(Ordering::Relaxed),
            "bet rejected"
        );
    }

    pub fn heartbeat(&self) {
        self.inner
            .last_event_ts
            .store(now_unix_secs(), Ordering::Relaxed);
    }

    pub fn is_healthy(&self, max_staleness: Duration) -> bool {
        let last = self.inner.last_event_ts.load(Ordering::Relaxed);
        if last == 0 {
            // If we have never seen an event, treat as healthy immediately after startup.
            return true;
        }
        let now = now_unix_secs();
        now.saturating_sub(last) <= max_staleness.as_secs()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            slips_saved: self.inner.slips_saved.load(Ordering::Relaxed),
            bets_submitted: self.inner.bets_submitted.load(Ordering::Relaxed),
            bets_accepted: self.inner.bets_accepted.load(Ordering::Relaxed),
            bets_rejected: self.inner.bets_rejected.load(Ordering::Relaxed),
            last_event_ts: self.inner.last_event_ts.load(Ordering::Relaxed),
        }
    }
}

/// Serializable view of current metrics used by dashboards and health checks.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub slips_saved: u64,
    pub bets_submitted: u64,
    pub bets_accepted: u64,
    pub bets_rejected: u64,
    pub last_event_ts: u64,
}

pub fn log_metrics_snapshot(snapshot: &MetricsSnapshot) {
    info!(
        target: "metrics",
        event = "metrics_snapshot",
        slips_saved = snapshot.slips_saved,
        bets_submitted = snapshot.bets_submitted,
        bets_accepted = snapshot.bets_accepted,
        bets_rejected = snapshot.bets_rejected,
        last_event_ts = snapshot.last_event_ts,
        "metrics snapshot"
    );
}
