use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::info;

use crate::checker::RateChecker;
use crate::core::Shutdown;

/// Checks once right away, then once per `period` until `shutdown` fires.
/// Cycles never overlap: a tick that lands while a check is running waits
/// for it to finish.
pub async fn run(checker: &mut RateChecker, period: Duration, shutdown: &Shutdown) {
    info!(?period, "Starting rate watcher");

    checker.check_for_change(shutdown).await;

    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.triggered() => {
                info!("Shutdown requested, stopping rate watcher");
                break;
            }
            _ = ticker.tick() => {
                checker.check_for_change(shutdown).await;
            }
        }
    }
}
