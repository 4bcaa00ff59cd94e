use serde::Serialize;
use tracing::{error, info, warn};

use super::MAX_CRON_LIMIT;
use crate::config::{Config, Environment};
use crate::error::AppError;
use crate::riot::RankProvider;
use crate::sync::{RankSyncer, SyncAttempt, SyncAttemptError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CronSyncResponse {
    pub ok: bool,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_due: usize,
    pub errors: Vec<SyncAttemptError>,
    /// Limit requested by the caller, `None` when the default batch size applied.
    pub limit: Option<usize>,
}

impl CronSyncResponse {
    fn new(attempt: SyncAttempt, limit: Option<usize>) -> Self {
        Self {
            ok: true,
            attempted: attempt.attempted,
            succeeded: attempt.succeeded,
            failed: attempt.failed,
            total_due: attempt.total_due,
            errors: attempt.errors,
            limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnauthorizedResponse {
    pub ok: bool,
    pub error: &'static str,
}

impl Default for UnauthorizedResponse {
    fn default() -> Self {
        Self {
            ok: false,
            error: "Unauthorized",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CronResponse {
    Synced(CronSyncResponse),
    Unauthorized(UnauthorizedResponse),
}

/// Entry point for an external scheduler hitting the sync of due players.
#[derive(Debug, Clone)]
pub struct CronTrigger {
    secret: Option<String>,
    environment: Environment,
}

impl CronTrigger {
    pub fn new(secret: Option<String>, environment: Environment) -> Self {
        let secret = secret
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self {
            secret,
            environment,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cron_secret.clone(), config.environment)
    }

    /// Checks an `Authorization` header value against the configured secret.
    pub fn authorize(&self, authorization: Option<&str>) -> bool {
        let Some(secret) = self.secret.as_deref() else {
            if self.environment == Environment::Development {
                return true;
            }
            error!("🔐 CRON_SECRET missing outside development");
            return false;
        };

        authorization
            .and_then(bearer_token)
            .is_some_and(|token| constant_time_eq(secret.as_bytes(), token.as_bytes()))
    }

    pub async fn handle<P: RankProvider>(
        &self,
        syncer: &RankSyncer<P>,
        authorization: Option<&str>,
        limit: Option<&str>,
    ) -> Result<CronResponse, AppError> {
        if !self.authorize(authorization) {
            warn!("🔐 Unauthorized cron sync request");
            return Ok(CronResponse::Unauthorized(UnauthorizedResponse::default()));
        }

        let limit = parse_limit(limit);
        let attempt = syncer.sync_due_players(limit).await?;
        info!(
            attempted = attempt.attempted,
            succeeded = attempt.succeeded,
            failed = attempt.failed,
            total_due = attempt.total_due,
            limit,
            "⏰ Cron sync executed"
        );

        Ok(CronResponse::Synced(CronSyncResponse::new(attempt, limit)))
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn constant_time_eq(expected: &[u8], received: &[u8]) -> bool {
    if expected.len() != received.len() {
        return false;
    }
    expected
        .iter()
        .zip(received)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Integer query values clamped to `1..=MAX_CRON_LIMIT`. Anything else is ignored.
pub fn parse_limit(raw: Option<&str>) -> Option<usize> {
    let raw = raw?;
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let value = if negative {
        0
    } else {
        digits.parse::<usize>().unwrap_or(usize::MAX)
    };
    Some(value.clamp(1, MAX_CRON_LIMIT))
}
