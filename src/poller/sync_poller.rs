use std::sync::Arc;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

use crate::riot::RankProvider;
use crate::sync::RankSyncer;

/// Runs `sync_due_players` on a fixed interval, forever.
pub async fn start_polling<P: RankProvider>(
    syncer: Arc<RankSyncer<P>>,
    interval_secs: u64,
    batch_limit: usize,
) {
    let mut interval = interval(Duration::from_secs(interval_secs));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(interval_secs, batch_limit, "🔄 Rank sync poller started");

    loop {
        interval.tick().await;

        if let Err(e) = syncer.sync_due_players(Some(batch_limit)).await {
            error!(error = ?e, "🔄 ❌ Sync cycle failed");
        }
    }
}
