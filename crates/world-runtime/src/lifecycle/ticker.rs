//! Periodic play-time accrual.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::{LifecycleError, PlayerLifecycle};

/// Spawn a task that credits every connected player with `period` worth of
/// play time once per `period`, until `shutdown` flips to `true`.
pub fn spawn_play_time_ticker(
    lifecycle: Arc<PlayerLifecycle>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let hours = period.as_secs_f64() / 3600.0;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    accrue(&lifecycle, hours);
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Play time ticker stopped");
                        break;
                    }
                }
            }
        }
    })
}

fn accrue(lifecycle: &PlayerLifecycle, hours: f64) {
    for player in lifecycle.players().ids() {
        match lifecycle.add_play_time(player, hours) {
            Ok(total) => debug!(%player, total, "Play time accrued"),
            // Left between listing and crediting.
            Err(LifecycleError::UnknownPlayer(_)) => {}
            Err(e) => warn!(%player, error = %e, "Play time accrual failed"),
        }
    }
}
