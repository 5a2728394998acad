//! Long-running background task that keeps the live order feed fresh.

use std::time::Duration;

use burger_store::Effects;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Refresh the feed every `interval` until `shutdown` fires.
pub async fn run(effects: Effects, interval: Duration, shutdown: CancellationToken) {
    info!("Feed poller starting — every {}s", interval.as_secs());

    loop {
        match effects.load_feed().await {
            Ok(totals) => info!(
                "Feed refreshed: {} orders in total, {} today",
                totals.total, totals.total_today
            ),
            Err(e) => error!("Feed poll error: {e}"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    info!("Feed poller stopped");
}
