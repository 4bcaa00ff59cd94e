mod attempt;
mod orchestrator;
mod resolver;
mod retry;
mod selector;
#[cfg(test)]
pub(crate) mod testing;

pub use attempt::{PlayerSyncResult, SyncAttempt, SyncAttemptError, SyncAttemptStatus, SyncOutcome};
pub use orchestrator::{RankSyncer, SyncOptions, select_league_entry};
pub use resolver::resolve_puuid;
pub use retry::RetryPolicy;
pub use selector::{SyncCandidate, group_by_player, select_due_players};
