use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Classified failure of a single Riot API call.
#[derive(Debug, Error)]
pub enum RiotApiError {
    /// HTTP 429. `retry_after` defaults to one second when the header is absent or invalid.
    #[error("Riot API rate limited (retry after {}s)", .retry_after.as_secs())]
    RateLimited {
        retry_after: Duration,
        limit_type: Option<String>,
    },

    /// Any other non-2xx response.
    #[error("Riot API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl RiotApiError {
    /// Delay hint when the error is worth retrying.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

// ============================================================================
// Account-v1
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    pub game_name: Option<String>,
    pub tag_line: Option<String>,
}

// ============================================================================
// Summoner-v4
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerDto {
    pub puuid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub summoner_level: Option<i64>,
}

// ============================================================================
// League-v4
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntryDto {
    pub queue_type: String,
    pub tier: String,
    pub rank: String,
    pub league_points: i64,
    pub wins: i64,
    pub losses: i64,
}

/// Ranked queues a player can choose to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueueType {
    #[default]
    RankedSolo,
    RankedFlex,
}

impl QueueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RankedSolo => "RANKED_SOLO_5x5",
            Self::RankedFlex => "RANKED_FLEX_SR",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::RankedSolo => "Solo/Duo",
            Self::RankedFlex => "Flex 5v5",
        }
    }

    /// The other ranked queue, tried when this one has no entry.
    pub fn fallback(&self) -> Self {
        match self {
            Self::RankedSolo => Self::RankedFlex,
            Self::RankedFlex => Self::RankedSolo,
        }
    }

    /// Stored preference, solo when missing or unknown.
    pub fn from_stored(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for QueueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RANKED_SOLO_5x5" => Ok(Self::RankedSolo),
            "RANKED_FLEX_SR" => Ok(Self::RankedFlex),
            other => Err(format!("unknown queue type: {other}")),
        }
    }
}

impl fmt::Display for QueueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LeagueEntryDto {
    pub fn is_queue(&self, queue: QueueType) -> bool {
        self.queue_type == queue.as_str()
    }
}
