//! Periodic refresh loop.
//!
//! # States
//! ```text
//! Running → Running: tick → refresh(), errors logged and dropped
//! Running → Stopped: shutdown signal observed
//! ```
//!
//! # Design Decisions
//! - First tick fires one period after start (initialization already synced)
//! - Cancellation is checked first when both branches are ready
//! - A refresh already running is never aborted; the loop exits after it
//! - A stopped loop is not restartable; call `poll` again

use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};

use crate::lifecycle::ShutdownSignal;
use crate::remote::RemoteSource;
use crate::sync::coordinator::RefreshCoordinator;
use crate::sync::types::RefreshOutcome;

/// Smallest accepted period; tokio intervals reject zero.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Refresh every `period` until `shutdown` fires.
pub async fn poll<S: RemoteSource>(
    coordinator: &RefreshCoordinator<S>,
    period: Duration,
    mut shutdown: ShutdownSignal,
) {
    let period = period.max(MIN_PERIOD);
    tracing::info!(interval = ?period, "Poll loop starting");

    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                tracing::info!("Poll loop received shutdown signal, exiting loop");
                break;
            }
            _ = ticker.tick() => {
                match coordinator.refresh().await {
                    Ok(RefreshOutcome::Rebuilt { version, elapsed }) => {
                        tracing::debug!(version, elapsed = ?elapsed, "Poll tick rebuilt snapshot");
                    }
                    Ok(outcome) => tracing::trace!(?outcome, "Poll tick done"),
                    Err(e) => tracing::warn!(error = %e, "Refresh failed, serving previous snapshot"),
                }
            }
        }
    }
}
