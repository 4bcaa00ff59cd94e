use sqlx::{SqliteExecutor, SqlitePool};
use uuid::Uuid;

use super::models::{
    Group, GroupSyncSettings, NewGroup, NewPlayer, NewRankSnapshot, Player, PlayerSyncUpdate,
    RankSnapshot, SyncRow,
};
use crate::error::AppError;

const PLAYER_COLUMN_NAMES: [&str; 16] = [
    "id",
    "game_name",
    "tag_line",
    "region",
    "queue_type",
    "puuid",
    "opgg_url",
    "tier",
    "division",
    "lp",
    "wins",
    "losses",
    "notes",
    "objective",
    "month_checkpoint",
    "last_sync_at",
];

const GROUP_COLUMNS: &str = "id, name, slug, is_public, sync_interval_minutes, manual_cooldown_minutes, last_manual_sync_at";

const SYNC_ROW_COLUMNS: &str = r#"
    p.id, p.game_name, p.tag_line, p.region, p.queue_type, p.puuid, p.last_sync_at,
    gp.group_id, g.sync_interval_minutes
"#;

fn player_columns(alias: Option<&str>) -> String {
    let prefix = alias.map(|a| format!("{a}.")).unwrap_or_default();
    PLAYER_COLUMN_NAMES
        .iter()
        .map(|col| format!("{prefix}{col}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Clone, Debug)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // === Group operations ===

    pub async fn create_group(&self, group: &NewGroup) -> Result<Group, AppError> {
        let created = sqlx::query_as::<_, Group>(&format!(
            r#"
            INSERT INTO groups (id, name, slug, is_public, sync_interval_minutes, manual_cooldown_minutes)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {GROUP_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(&group.name)
        .bind(&group.slug)
        .bind(group.is_public)
        .bind(group.sync_interval_minutes)
        .bind(group.manual_cooldown_minutes)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    pub async fn get_group(&self, group_id: &str) -> Result<Option<Group>, AppError> {
        let group =
            sqlx::query_as::<_, Group>(&format!("SELECT {GROUP_COLUMNS} FROM groups WHERE id = ?"))
                .bind(group_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(group)
    }

    pub async fn get_group_sync_settings(
        &self,
        group_id: &str,
    ) -> Result<Option<GroupSyncSettings>, AppError> {
        let settings = sqlx::query_as::<_, GroupSyncSettings>(
            r#"
            SELECT sync_interval_minutes, manual_cooldown_minutes, last_manual_sync_at
            FROM groups
            WHERE id = ?
            "#,
        )
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(settings)
    }

    pub async fn update_group_settings(
        &self,
        group_id: &str,
        sync_interval_minutes: i64,
        manual_cooldown_minutes: i64,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE groups SET
                sync_interval_minutes = ?,
                manual_cooldown_minutes = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(sync_interval_minutes)
        .bind(manual_cooldown_minutes)
        .bind(group_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn touch_group_manual_sync(&self, group_id: &str, at: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE groups SET last_manual_sync_at = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(at)
        .bind(group_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // === Player operations ===

    /// Identity fields are never rewritten for an existing player.
    pub async fn get_or_create_player(&self, player: &NewPlayer) -> Result<Player, AppError> {
        let game_name = player.game_name.trim();
        let tag_line = player.tag_line.trim();
        let region = player.region.as_str();

        sqlx::query(
            r#"
            INSERT INTO players (id, game_name, tag_line, region, queue_type)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(game_name, tag_line, region) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(game_name)
        .bind(tag_line)
        .bind(region)
        .bind(player.queue_type.as_str())
        .execute(&self.pool)
        .await?;

        let columns = player_columns(None);
        let player = sqlx::query_as::<_, Player>(&format!(
            "SELECT {columns} FROM players WHERE game_name = ? AND tag_line = ? AND region = ?"
        ))
        .bind(game_name)
        .bind(tag_line)
        .bind(region)
        .fetch_one(&self.pool)
        .await?;
        Ok(player)
    }

    pub async fn get_player(&self, player_id: &str) -> Result<Option<Player>, AppError> {
        let columns = player_columns(None);
        let player =
            sqlx::query_as::<_, Player>(&format!("SELECT {columns} FROM players WHERE id = ?"))
                .bind(player_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(player)
    }

    pub async fn delete_player(&self, player_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM players WHERE id = ?")
            .bind(player_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn update_player_meta(
        &self,
        player_id: &str,
        notes: Option<&str>,
        objective: Option<&str>,
        month_checkpoint: Option<&str>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE players SET
                notes = ?,
                objective = ?,
                month_checkpoint = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(notes)
        .bind(objective)
        .bind(month_checkpoint)
        .bind(player_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // === Group-Player relations ===

    pub async fn add_player_to_group(&self, group_id: &str, player_id: &str) -> Result<(), AppError> {
        sqlx::query("INSERT OR IGNORE INTO group_players (group_id, player_id) VALUES (?, ?)")
            .bind(group_id)
            .bind(player_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn remove_player_from_group(
        &self,
        group_id: &str,
        player_id: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM group_players WHERE group_id = ? AND player_id = ?")
            .bind(group_id)
            .bind(player_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // === Sync ===

    /// Memberships of every public group, one row per (player, group).
    pub async fn get_players_for_sync(&self) -> Result<Vec<SyncRow>, AppError> {
        let rows = sqlx::query_as::<_, SyncRow>(&format!(
            r#"
            SELECT {SYNC_ROW_COLUMNS}
            FROM players p
            INNER JOIN group_players gp ON gp.player_id = p.id
            INNER JOIN groups g ON g.id = gp.group_id
            WHERE g.is_public = 1
            "#
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_group_players(&self, group_id: &str) -> Result<Vec<SyncRow>, AppError> {
        let rows = sqlx::query_as::<_, SyncRow>(&format!(
            r#"
            SELECT {SYNC_ROW_COLUMNS}
            FROM players p
            INNER JOIN group_players gp ON gp.player_id = p.id
            INNER JOIN groups g ON g.id = gp.group_id
            WHERE gp.group_id = ?
            "#
        ))
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn update_player_sync<'e, E>(
        executor: E,
        update: &PlayerSyncUpdate,
    ) -> Result<(), AppError>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            UPDATE players SET
                queue_type = ?,
                puuid = ?,
                tier = ?,
                division = ?,
                lp = ?,
                wins = ?,
                losses = ?,
                opgg_url = ?,
                last_sync_at = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(update.queue_type.as_str())
        .bind(&update.puuid)
        .bind(&update.tier)
        .bind(&update.division)
        .bind(update.lp)
        .bind(update.wins)
        .bind(update.losses)
        .bind(&update.opgg_url)
        .bind(&update.last_sync_at)
        .bind(&update.player_id)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Database(sqlx::Error::RowNotFound));
        }
        Ok(())
    }

    pub async fn insert_rank_snapshot<'e, E>(
        executor: E,
        snapshot: &NewRankSnapshot,
    ) -> Result<(), AppError>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query(
            r#"
            INSERT INTO rank_snapshots
                (id, player_id, queue_type, tier, division, lp, wins, losses, fetched_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&snapshot.id)
        .bind(&snapshot.player_id)
        .bind(&snapshot.queue_type)
        .bind(&snapshot.tier)
        .bind(&snapshot.division)
        .bind(snapshot.lp)
        .bind(snapshot.wins)
        .bind(snapshot.losses)
        .bind(&snapshot.fetched_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Writes the player's rank and its snapshot in one transaction.
    pub async fn record_player_sync(
        &self,
        update: &PlayerSyncUpdate,
        snapshot: &NewRankSnapshot,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        Self::update_player_sync(&mut *tx, update).await?;
        Self::insert_rank_snapshot(&mut *tx, snapshot).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Newest first.
    pub async fn get_rank_snapshots(&self, player_id: &str) -> Result<Vec<RankSnapshot>, AppError> {
        let snapshots = sqlx::query_as::<_, RankSnapshot>(
            r#"
            SELECT id, player_id, queue_type, tier, division, lp, wins, losses, fetched_at
            FROM rank_snapshots
            WHERE player_id = ?
            ORDER BY fetched_at DESC, rowid DESC
            "#,
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(snapshots)
    }
}
