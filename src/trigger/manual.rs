use chrono::Utc;
use tracing::{info, warn};

use crate::db::Repository;
use crate::error::AppError;
use crate::riot::RankProvider;
use crate::sync::{RankSyncer, SyncAttempt};
use crate::time::{is_past, now_iso};

const PUBLIC_SYNC_COOLDOWN_MINUTES: i64 = 1;
const MANUAL_SYNC_LIMIT: usize = 5;

/// Who asked for the sync. Public requests only work on public groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualSyncKind {
    /// Cooldown comes from the group settings.
    Admin,
    /// Fixed one minute cooldown.
    Public,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualSyncOutcome {
    GroupNotFound,
    Cooldown { last_sync_at: Option<String> },
    Synced(SyncAttempt),
}

/// User-triggered forced sync of one group, throttled per group.
pub struct ManualSync<'a, P> {
    syncer: &'a RankSyncer<P>,
    db: &'a Repository,
}

impl<'a, P: RankProvider> ManualSync<'a, P> {
    pub fn new(syncer: &'a RankSyncer<P>, db: &'a Repository) -> Self {
        Self { syncer, db }
    }

    pub async fn run(
        &self,
        group_id: &str,
        kind: ManualSyncKind,
    ) -> Result<ManualSyncOutcome, AppError> {
        if kind == ManualSyncKind::Public {
            let public = self.db.get_group(group_id).await?.is_some_and(|g| g.is_public);
            if !public {
                warn!(group_id, "🔒 Public sync denied, group is not public");
                return Ok(ManualSyncOutcome::GroupNotFound);
            }
        }

        let Some(settings) = self.db.get_group_sync_settings(group_id).await? else {
            return Ok(ManualSyncOutcome::GroupNotFound);
        };

        let cooldown = match kind {
            ManualSyncKind::Admin => settings.manual_cooldown_minutes,
            ManualSyncKind::Public => PUBLIC_SYNC_COOLDOWN_MINUTES,
        };

        if !is_past(settings.last_manual_sync_at.as_deref(), cooldown, Utc::now()) {
            info!(group_id, ?kind, "⏳ Manual sync cooldown not elapsed");
            return Ok(ManualSyncOutcome::Cooldown {
                last_sync_at: settings.last_manual_sync_at,
            });
        }

        let attempt = self
            .syncer
            .sync_group_players(group_id, true, Some(MANUAL_SYNC_LIMIT))
            .await?;

        // Advanced even when every player failed.
        self.db.touch_group_manual_sync(group_id, &now_iso()).await?;

        info!(
            group_id,
            ?kind,
            attempted = attempt.attempted,
            succeeded = attempt.succeeded,
            failed = attempt.failed,
            total_due = attempt.total_due,
            "🖐️ Manual sync completed"
        );
        Ok(ManualSyncOutcome::Synced(attempt))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::db::{Group, NewGroup, NewPlayer, test_pool};
    use crate::riot::{Platform, QueueType};
    use crate::sync::testing::{FakeProvider, account, entry, status};
    use crate::sync::{SyncAttemptStatus, SyncOptions};

    async fn setup(is_public: bool, cooldown: i64) -> (Repository, RankSyncer<FakeProvider>, Group) {
        let db = Repository::new(test_pool().await);
        let group = db
            .create_group(&NewGroup {
                name: "Team".into(),
                slug: "team".into(),
                is_public,
                sync_interval_minutes: 360,
                manual_cooldown_minutes: cooldown,
            })
            .await
            .unwrap();
        let player = db
            .get_or_create_player(&NewPlayer {
                game_name: "Chalop".into(),
                tag_line: "3012".into(),
                region: Platform::EUW1,
                queue_type: QueueType::RankedSolo,
            })
            .await
            .unwrap();
        db.add_player_to_group(&group.id, &player.id).await.unwrap();

        let options = SyncOptions {
            inter_call_delay: Duration::ZERO,
            ..SyncOptions::default()
        };
        let syncer = RankSyncer::with_options(FakeProvider::default(), db.clone(), options);
        (db, syncer, group)
    }

    #[tokio::test]
    async fn admin_sync_runs_then_enters_cooldown() {
        let (db, syncer, group) = setup(false, 30).await;
        syncer
            .provider()
            .account("Chalop", Ok(account("puuid-1")))
            .league("puuid-1", Ok(vec![entry("RANKED_SOLO_5x5", "GOLD", "I", 3)]));
        let manual = ManualSync::new(&syncer, &db);

        let first = manual.run(&group.id, ManualSyncKind::Admin).await.unwrap();
        let ManualSyncOutcome::Synced(attempt) = first else {
            panic!("expected a sync, got {first:?}");
        };
        assert_eq!(attempt.succeeded, 1);

        let touched = db.get_group_sync_settings(&group.id).await.unwrap().unwrap();
        assert!(touched.last_manual_sync_at.is_some());

        let second = manual.run(&group.id, ManualSyncKind::Admin).await.unwrap();
        assert_eq!(
            second,
            ManualSyncOutcome::Cooldown {
                last_sync_at: touched.last_manual_sync_at
            }
        );
    }

    #[tokio::test]
    async fn failed_sync_still_advances_cooldown() {
        let (db, syncer, group) = setup(true, 30).await;
        syncer
            .provider()
            .account("Chalop", Err(status(500, "Internal")));
        let manual = ManualSync::new(&syncer, &db);

        let outcome = manual.run(&group.id, ManualSyncKind::Admin).await.unwrap();
        let ManualSyncOutcome::Synced(attempt) = outcome else {
            panic!("expected a sync, got {outcome:?}");
        };
        assert_eq!(attempt.status, SyncAttemptStatus::Failed);

        let again = manual.run(&group.id, ManualSyncKind::Admin).await.unwrap();
        assert!(matches!(again, ManualSyncOutcome::Cooldown { .. }));
    }

    #[tokio::test]
    async fn zero_cooldown_allows_back_to_back_admin_syncs() {
        let (db, syncer, group) = setup(true, 0).await;
        let manual = ManualSync::new(&syncer, &db);

        for _ in 0..2 {
            let outcome = manual.run(&group.id, ManualSyncKind::Admin).await.unwrap();
            assert!(matches!(outcome, ManualSyncOutcome::Synced(_)));
        }
    }

    #[tokio::test]
    async fn public_sync_uses_fixed_cooldown() {
        let (db, syncer, group) = setup(true, 0).await;
        let manual = ManualSync::new(&syncer, &db);

        let first = manual.run(&group.id, ManualSyncKind::Public).await.unwrap();
        assert!(matches!(first, ManualSyncOutcome::Synced(_)));

        let second = manual.run(&group.id, ManualSyncKind::Public).await.unwrap();
        assert!(matches!(second, ManualSyncOutcome::Cooldown { .. }));
    }

    #[tokio::test]
    async fn public_sync_rejects_private_groups() {
        let (db, syncer, group) = setup(false, 0).await;
        let manual = ManualSync::new(&syncer, &db);

        let outcome = manual.run(&group.id, ManualSyncKind::Public).await.unwrap();

        assert_eq!(outcome, ManualSyncOutcome::GroupNotFound);
        assert_eq!(FakeProvider::calls(&syncer.provider().account_calls), 0);
        let settings = db.get_group_sync_settings(&group.id).await.unwrap().unwrap();
        assert!(settings.last_manual_sync_at.is_none());
    }

    #[tokio::test]
    async fn unknown_group() {
        let (db, syncer, _) = setup(true, 0).await;
        let manual = ManualSync::new(&syncer, &db);

        let outcome = manual.run("missing", ManualSyncKind::Admin).await.unwrap();
        assert_eq!(outcome, ManualSyncOutcome::GroupNotFound);
    }
}
