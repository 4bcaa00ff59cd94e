use std::time::Duration;

use chrono::Utc;
use tracing::{Span, debug, info, instrument, warn};
use uuid::Uuid;

use super::attempt::{PlayerSyncResult, SyncAttempt};
use super::resolver::resolve_puuid;
use super::retry::RetryPolicy;
use super::selector::{SyncCandidate, select_due_players};
use crate::db::{NewRankSnapshot, PlayerSyncUpdate, Repository};
use crate::error::AppError;
use crate::riot::{LeagueEntryDto, Platform, QueueType, RankProvider, RiotApiError};
use crate::time::now_iso;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Batch size used when the caller gives no limit.
    pub default_batch_size: usize,
    /// Pause between two players of the same batch.
    pub inter_call_delay: Duration,
    pub retry: RetryPolicy,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            default_batch_size: 5,
            inter_call_delay: Duration::from_millis(350),
            retry: RetryPolicy::default(),
        }
    }
}

/// Entry for the preferred queue, else the other ranked queue, else the first one.
pub fn select_league_entry(
    entries: &[LeagueEntryDto],
    preferred: QueueType,
) -> Option<&LeagueEntryDto> {
    entries
        .iter()
        .find(|e| e.is_queue(preferred))
        .or_else(|| entries.iter().find(|e| e.is_queue(preferred.fallback())))
        .or_else(|| entries.first())
}

/// Refreshes tracked players' ranks from the provider.
pub struct RankSyncer<P> {
    provider: P,
    db: Repository,
    options: SyncOptions,
}

impl<P: RankProvider> RankSyncer<P> {
    pub fn new(provider: P, db: Repository) -> Self {
        Self::with_options(provider, db, SyncOptions::default())
    }

    pub fn with_options(provider: P, db: Repository, options: SyncOptions) -> Self {
        Self {
            provider,
            db,
            options,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Players of public groups whose effective interval has elapsed.
    pub async fn sync_due_players(&self, limit: Option<usize>) -> Result<SyncAttempt, AppError> {
        let rows = self.db.get_players_for_sync().await?;
        let due = select_due_players(rows, Utc::now(), false);
        Ok(self.run_batch(due, limit).await)
    }

    /// Players of one group, public or not. `force` ignores the sync interval.
    pub async fn sync_group_players(
        &self,
        group_id: &str,
        force: bool,
        limit: Option<usize>,
    ) -> Result<SyncAttempt, AppError> {
        let limit = limit.unwrap_or(self.options.default_batch_size);

        if self.db.get_group(group_id).await?.is_none() {
            debug!(group_id, "🔄 Group not found, nothing to sync");
            return Ok(SyncAttempt::start(0, limit).complete(Vec::new()));
        }

        let rows = self.db.get_group_players(group_id).await?;
        let due = select_due_players(rows, Utc::now(), force);
        Ok(self.run_batch(due, Some(limit)).await)
    }

    #[instrument(skip_all, fields(total_due = due.len(), limit))]
    async fn run_batch(&self, due: Vec<SyncCandidate>, limit: Option<usize>) -> SyncAttempt {
        let limit = limit.unwrap_or(self.options.default_batch_size);
        Span::current().record("limit", limit);

        let attempt = SyncAttempt::start(due.len(), limit);
        let mut results = Vec::new();

        for (i, candidate) in due.iter().take(limit).enumerate() {
            if i > 0 && !self.options.inter_call_delay.is_zero() {
                tokio::time::sleep(self.options.inter_call_delay).await;
            }
            results.push(self.sync_player(candidate).await);
        }

        let attempt = attempt.complete(results);
        info!(
            status = ?attempt.status,
            attempted = attempt.attempted,
            succeeded = attempt.succeeded,
            failed = attempt.failed,
            "🔄 Rank sync finished"
        );
        attempt
    }

    #[instrument(
        skip(self, candidate),
        fields(
            player_id = %candidate.player_id,
            riot_id = %candidate.riot_id(),
            region = %candidate.region
        )
    )]
    async fn sync_player(&self, candidate: &SyncCandidate) -> PlayerSyncResult {
        match self.try_sync_player(candidate).await {
            Ok(()) => PlayerSyncResult::success(&candidate.player_id),
            Err(e) => {
                warn!(error = %e, "🔄 ⚠️ Player sync failed");
                PlayerSyncResult::failed(&candidate.player_id, e.to_string())
            }
        }
    }

    async fn try_sync_player(&self, candidate: &SyncCandidate) -> Result<(), AppError> {
        let platform: Platform = candidate.region.parse()?;

        let puuid = match candidate.puuid.as_deref().map(str::trim) {
            Some(puuid) if !puuid.is_empty() => puuid.to_string(),
            _ => {
                resolve_puuid(
                    &self.provider,
                    &self.options.retry,
                    platform,
                    &candidate.game_name,
                    &candidate.tag_line,
                )
                .await?
            }
        };

        let provider = &self.provider;
        let puuid_ref = puuid.as_str();
        let entries = self
            .options
            .retry
            .run(
                "league_entries_by_puuid",
                move || provider.league_entries_by_puuid(platform, puuid_ref),
                RiotApiError::retry_after,
            )
            .await?;

        let preferred = candidate.queue_type;
        let entry = select_league_entry(&entries, preferred);
        let synced_at = now_iso();

        let update = PlayerSyncUpdate {
            player_id: candidate.player_id.clone(),
            queue_type: preferred,
            puuid,
            tier: entry.map(|e| e.tier.clone()),
            division: entry.map(|e| e.rank.clone()),
            lp: entry.map(|e| e.league_points),
            wins: entry.map(|e| e.wins),
            losses: entry.map(|e| e.losses),
            opgg_url: platform.opgg_url(&candidate.game_name, &candidate.tag_line),
            last_sync_at: synced_at.clone(),
        };

        let snapshot = NewRankSnapshot {
            id: Uuid::new_v4().to_string(),
            player_id: candidate.player_id.clone(),
            queue_type: entry
                .map_or(preferred.as_str(), |e| e.queue_type.as_str())
                .to_string(),
            tier: update.tier.clone(),
            division: update.division.clone(),
            lp: update.lp,
            wins: update.wins,
            losses: update.losses,
            fetched_at: synced_at,
        };

        self.db.record_player_sync(&update, &snapshot).await?;

        debug!(
            queue = %snapshot.queue_type,
            tier = ?snapshot.tier,
            lp = ?snapshot.lp,
            "🔄 ✅ Rank updated"
        );
        Ok(())
    }
}
