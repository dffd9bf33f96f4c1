//! Refresh service — periodic re-polling of live values.
//!
//! DESIGN
//! ======
//! One background task wakes on a fixed interval, reads every device in
//! declaration order, and records the results under a single generation.
//! The cycle is awaited inside the loop, so at most one refresh is in
//! flight; ticks missed while a slow cycle runs are skipped, not queued.
//!
//! ERROR HANDLING
//! ==============
//! A failed read is logged and recorded against its widget (keeping the
//! last good value). It never stops the cycle or the task. Transient
//! failures (service down, 429, 5xx) log at `warn`; anything else, such as
//! an unknown channel or a malformed reply, logs at `error`.

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::state::AppState;

/// Outcome counts for one refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSummary {
    pub generation: u64,
    pub updated: usize,
    pub failed: usize,
    /// Results dropped because a newer generation was already recorded.
    pub stale: usize,
}

/// Spawn the background refresh task. Returns a handle for shutdown.
pub fn spawn_refresh_task(state: AppState) -> JoinHandle<()> {
    info!(interval = ?state.refresh_interval, "refresh task configured");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(state.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            refresh_once(&state).await;
        }
    })
}

/// Read every device once and record the results.
pub async fn refresh_once(state: &AppState) -> RefreshSummary {
    let generation = state.live.begin();
    let mut summary = RefreshSummary { generation, updated: 0, failed: 0, stale: 0 };

    for device in state.registry.iter() {
        let outcome = match state.service.read(device.binding()).await {
            Ok(reading) => Ok(reading.value),
            Err(e) => {
                let (prefix, widget_id) = (device.binding(), device.widget_id());
                if e.retryable() {
                    warn!(%prefix, %widget_id, error = %e, "channel read failed");
                } else {
                    error!(%prefix, %widget_id, error = %e, "channel read failed; not expected to recover");
                }
                summary.failed += 1;
                Err(e.to_string())
            }
        };
        let succeeded = outcome.is_ok();
        if !state.live.record(device.widget_id(), generation, outcome).await {
            summary.stale += 1;
        } else if succeeded {
            summary.updated += 1;
        }
    }

    debug!(
        generation,
        updated = summary.updated,
        failed = summary.failed,
        stale = summary.stale,
        "refresh cycle complete"
    );
    summary
}

#[cfg(test)]
#[path = "refresh_test.rs"]
mod tests;
