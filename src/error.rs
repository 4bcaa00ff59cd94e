use thiserror::Error;

use crate::riot::RiotApiError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Riot(#[from] RiotApiError),

    #[error("Unsupported region: {0}")]
    InvalidRegion(String),

    #[error("Missing PUUID for {game_name}#{tag_line} ({region})")]
    UnresolvedAccount {
        game_name: String,
        tag_line: String,
        region: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}
