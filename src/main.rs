use std::sync::Arc;

use tracing::{error, info};

use rankwatch::config::Config;
use rankwatch::db::{self, Repository};
use rankwatch::error::AppError;
use rankwatch::logging;
use rankwatch::poller::start_polling;
use rankwatch::riot::RiotClient;
use rankwatch::sync::RankSyncer;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "❌ Fatal error");
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    logging::init()?;

    info!("🐙 Starting rankwatch...");

    let config = Config::from_env()?;
    let pool = db::connect(&config.database_url).await?;
    let repository = Repository::new(pool);

    let riot = RiotClient::new(config.riot_api_key.clone(), config.riot_rate_limit_per_second)
        .with_base_url(config.riot_api_base_url.clone());
    tokio::spawn(riot.metrics().log_loop());

    let syncer = Arc::new(RankSyncer::new(riot, repository));
    let poller = tokio::spawn(start_polling(
        syncer,
        config.sync_interval_secs,
        config.sync_batch_limit,
    ));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("👋 Shutdown signal received");
        }
        res = poller => {
            if let Err(e) = res {
                error!(error = ?e, "🔄 ❌ Poller task stopped");
            }
        }
    }

    Ok(())
}
