use serde::Serialize;

use crate::time::now_iso;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAttemptStatus {
    Running,
    Success,
    Partial,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Success,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSyncResult {
    pub player_id: String,
    pub outcome: SyncOutcome,
}

impl PlayerSyncResult {
    pub fn success(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            outcome: SyncOutcome::Success,
        }
    }

    pub fn failed(player_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            outcome: SyncOutcome::Failed(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncAttemptError {
    pub player_id: String,
    pub error: String,
}

/// Summary of one sync run. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncAttempt {
    pub status: SyncAttemptStatus,
    pub total_due: usize,
    pub limit: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<SyncAttemptError>,
    pub started_at: String,
    pub finished_at: Option<String>,
}

impl SyncAttempt {
    pub fn start(total_due: usize, limit: usize) -> Self {
        Self {
            status: SyncAttemptStatus::Running,
            total_due,
            limit,
            attempted: 0,
            succeeded: 0,
            failed: 0,
            errors: Vec::new(),
            started_at: now_iso(),
            finished_at: None,
        }
    }

    /// Folds per-player results into the counters and final status.
    pub fn complete(mut self, results: Vec<PlayerSyncResult>) -> Self {
        self.attempted = results.len();

        for result in results {
            match result.outcome {
                SyncOutcome::Success => self.succeeded += 1,
                SyncOutcome::Failed(error) => {
                    self.failed += 1;
                    self.errors.push(SyncAttemptError {
                        player_id: result.player_id,
                        error,
                    });
                }
            }
        }

        self.status = if self.failed == 0 {
            SyncAttemptStatus::Success
        } else if self.succeeded == 0 {
            SyncAttemptStatus::Failed
        } else {
            SyncAttemptStatus::Partial
        };
        self.finished_at = Some(now_iso());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_attempted_is_success() {
        let attempt = SyncAttempt::start(0, 5).complete(vec![]);

        assert_eq!(attempt.status, SyncAttemptStatus::Success);
        assert_eq!(attempt.attempted, 0);
        assert!(attempt.errors.is_empty());
        assert!(attempt.finished_at.is_some());
    }

    #[test]
    fn all_failed_is_failed() {
        let attempt = SyncAttempt::start(2, 5).complete(vec![
            PlayerSyncResult::failed("a", "Riot API error 500: Internal"),
            PlayerSyncResult::failed("b", "Riot API error 403: Forbidden"),
        ]);

        assert_eq!(attempt.status, SyncAttemptStatus::Failed);
        assert_eq!(attempt.failed, 2);
        assert_eq!(attempt.errors.len(), 2);
    }

    #[test]
    fn mixed_outcomes_are_partial() {
        let attempt = SyncAttempt::start(7, 3).complete(vec![
            PlayerSyncResult::success("a"),
            PlayerSyncResult::failed("b", "Riot API error 500: Internal"),
            PlayerSyncResult::success("c"),
        ]);

        assert_eq!(attempt.status, SyncAttemptStatus::Partial);
        assert_eq!(attempt.total_due, 7);
        assert_eq!(attempt.attempted, 3);
        assert_eq!(attempt.succeeded, 2);
        assert_eq!(
            attempt.errors,
            vec![SyncAttemptError {
                player_id: "b".into(),
                error: "Riot API error 500: Internal".into(),
            }]
        );
    }

    #[test]
    fn serializes_camel_case() {
        let attempt = SyncAttempt::start(1, 5).complete(vec![PlayerSyncResult::success("a")]);
        let json = serde_json::to_value(&attempt).unwrap();

        assert_eq!(json["status"], "success");
        assert_eq!(json["totalDue"], 1);
        assert!(json["startedAt"].is_string());
    }
}
