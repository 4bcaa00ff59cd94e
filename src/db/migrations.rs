use sqlx::SqlitePool;
use tracing::info;

use crate::error::AppError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS groups (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    is_public INTEGER NOT NULL DEFAULT 1,
    sync_interval_minutes INTEGER NOT NULL DEFAULT 360,
    manual_cooldown_minutes INTEGER NOT NULL DEFAULT 30,
    last_manual_sync_at TEXT,
    created_at TEXT NOT NULL DEFAULT (CURRENT_TIMESTAMP),
    updated_at TEXT NOT NULL DEFAULT (CURRENT_TIMESTAMP)
);

CREATE TABLE IF NOT EXISTS players (
    id TEXT PRIMARY KEY,
    game_name TEXT NOT NULL,
    tag_line TEXT NOT NULL,
    region TEXT NOT NULL,
    queue_type TEXT NOT NULL DEFAULT 'RANKED_SOLO_5x5'
        CHECK (queue_type IN ('RANKED_SOLO_5x5', 'RANKED_FLEX_SR')),
    puuid TEXT,
    opgg_url TEXT,
    tier TEXT,
    division TEXT,
    lp INTEGER,
    wins INTEGER,
    losses INTEGER,
    notes TEXT,
    objective TEXT,
    month_checkpoint TEXT,
    last_sync_at TEXT,
    created_at TEXT NOT NULL DEFAULT (CURRENT_TIMESTAMP),
    updated_at TEXT NOT NULL DEFAULT (CURRENT_TIMESTAMP)
);

CREATE TABLE IF NOT EXISTS group_players (
    group_id TEXT NOT NULL,
    player_id TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (CURRENT_TIMESTAMP),
    PRIMARY KEY (group_id, player_id),
    FOREIGN KEY (group_id) REFERENCES groups(id) ON DELETE CASCADE,
    FOREIGN KEY (player_id) REFERENCES players(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS rank_snapshots (
    id TEXT PRIMARY KEY,
    player_id TEXT NOT NULL,
    queue_type TEXT NOT NULL,
    tier TEXT,
    division TEXT,
    lp INTEGER,
    wins INTEGER,
    losses INTEGER,
    fetched_at TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (CURRENT_TIMESTAMP),
    FOREIGN KEY (player_id) REFERENCES players(id) ON DELETE CASCADE
);

CREATE UNIQUE INDEX IF NOT EXISTS players_identity_unique ON players(game_name, tag_line, region);
CREATE INDEX IF NOT EXISTS players_puuid_idx ON players(puuid);
CREATE INDEX IF NOT EXISTS group_players_player_idx ON group_players(player_id);
CREATE INDEX IF NOT EXISTS rank_snapshots_player_idx ON rank_snapshots(player_id);
"#;

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    info!("🗄️ Database migrations completed");
    Ok(())
}
