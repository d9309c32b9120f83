use std::time::Duration;

use tokio::time::interval;

use crate::monitoring::metrics::{log_metrics_snapshot, METRICS};

/// Spawn a background task that periodically logs a compact metrics snapshot.
///
/// This provides a simple terminal "dashboard" when combined with `tracing`
/// JSON logs and `jq`/`grep` on the operator side.
pub fn spawn_dashboard_task(period: Duration) {
    let mut ticker = interval(period);
    tokio::spawn(async move {
        loop {
            ticker.tick().await;
            let snapshot = METRICS.snapshot();
            log_metrics_snapshot(&snapshot);
        }
    });
}
