use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::db::SyncRow;
use crate::riot::QueueType;
use crate::time::{is_past, parse_timestamp};

/// A player eligible for a sync pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncCandidate {
    pub player_id: String,
    pub game_name: String,
    pub tag_line: String,
    pub region: String,
    pub queue_type: QueueType,
    pub puuid: Option<String>,
    pub last_sync_at: Option<String>,
    /// Smallest sync interval among the player's groups.
    pub interval_minutes: i64,
}

impl SyncCandidate {
    pub fn riot_id(&self) -> String {
        format!("{}#{}", self.game_name, self.tag_line)
    }

    fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.last_sync_at.as_deref().and_then(parse_timestamp)
    }
}

/// Folds membership rows into one candidate per player, keeping the most
/// demanding interval.
pub fn group_by_player(rows: Vec<SyncRow>) -> Vec<SyncCandidate> {
    let mut by_player: BTreeMap<String, SyncCandidate> = BTreeMap::new();

    for row in rows {
        let interval = row.sync_interval_minutes;
        by_player
            .entry(row.id.clone())
            .and_modify(|c| c.interval_minutes = c.interval_minutes.min(interval))
            .or_insert_with(|| SyncCandidate {
                player_id: row.id,
                game_name: row.game_name,
                tag_line: row.tag_line,
                region: row.region,
                queue_type: QueueType::from_stored(row.queue_type.as_deref()),
                puuid: row.puuid,
                last_sync_at: row.last_sync_at,
                interval_minutes: interval,
            });
    }

    by_player.into_values().collect()
}

/// Due players, never-synced first then oldest sync first. `force` marks everyone due.
pub fn select_due_players(rows: Vec<SyncRow>, now: DateTime<Utc>, force: bool) -> Vec<SyncCandidate> {
    let mut due: Vec<SyncCandidate> = group_by_player(rows)
        .into_iter()
        .filter(|c| force || is_past(c.last_sync_at.as_deref(), c.interval_minutes, now))
        .collect();

    due.sort_by(|a, b| {
        a.last_synced()
            .cmp(&b.last_synced())
            .then_with(|| a.player_id.cmp(&b.player_id))
    });

    due
}
