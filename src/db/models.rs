use sqlx::FromRow;

use crate::riot::{Platform, QueueType};

#[derive(Debug, Clone, FromRow)]
pub struct Player {
    pub id: String,
    pub game_name: String,
    pub tag_line: String,
    pub region: String,
    pub queue_type: String,
    pub puuid: Option<String>,
    pub opgg_url: Option<String>,
    pub tier: Option<String>,
    pub division: Option<String>,
    pub lp: Option<i64>,
    pub wins: Option<i64>,
    pub losses: Option<i64>,
    pub notes: Option<String>,
    pub objective: Option<String>,
    pub month_checkpoint: Option<String>,
    pub last_sync_at: Option<String>,
}

impl Player {
    pub fn preferred_queue(&self) -> QueueType {
        QueueType::from_stored(Some(&self.queue_type))
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub is_public: bool,
    pub sync_interval_minutes: i64,
    pub manual_cooldown_minutes: i64,
    pub last_manual_sync_at: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct GroupSyncSettings {
    pub sync_interval_minutes: i64,
    pub manual_cooldown_minutes: i64,
    pub last_manual_sync_at: Option<String>,
}

/// One (player, group) association with the group's sync interval.
#[derive(Debug, Clone, FromRow)]
pub struct SyncRow {
    pub id: String,
    pub game_name: String,
    pub tag_line: String,
    pub region: String,
    pub queue_type: Option<String>,
    pub puuid: Option<String>,
    pub last_sync_at: Option<String>,
    pub group_id: String,
    pub sync_interval_minutes: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct RankSnapshot {
    pub id: String,
    pub player_id: String,
    pub queue_type: String,
    pub tier: Option<String>,
    pub division: Option<String>,
    pub lp: Option<i64>,
    pub wins: Option<i64>,
    pub losses: Option<i64>,
    pub fetched_at: String,
}

/// Rank fields written to a player after a successful fetch.
#[derive(Debug, Clone)]
pub struct PlayerSyncUpdate {
    pub player_id: String,
    pub queue_type: QueueType,
    pub puuid: String,
    pub tier: Option<String>,
    pub division: Option<String>,
    pub lp: Option<i64>,
    pub wins: Option<i64>,
    pub losses: Option<i64>,
    pub opgg_url: String,
    pub last_sync_at: String,
}

#[derive(Debug, Clone)]
pub struct NewRankSnapshot {
    pub id: String,
    pub player_id: String,
    pub queue_type: String,
    pub tier: Option<String>,
    pub division: Option<String>,
    pub lp: Option<i64>,
    pub wins: Option<i64>,
    pub losses: Option<i64>,
    pub fetched_at: String,
}

#[derive(Debug, Clone)]
pub struct NewGroup {
    pub name: String,
    pub slug: String,
    pub is_public: bool,
    pub sync_interval_minutes: i64,
    pub manual_cooldown_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub game_name: String,
    pub tag_line: String,
    pub region: Platform,
    pub queue_type: QueueType,
}
