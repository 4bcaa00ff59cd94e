//! Entry points that start a sync run on behalf of someone else.

mod cron;
mod manual;

pub use cron::{CronResponse, CronSyncResponse, CronTrigger, UnauthorizedResponse, parse_limit};
pub use manual::{ManualSync, ManualSyncKind, ManualSyncOutcome};

/// Upper bound for the batch size of one cron invocation.
pub const MAX_CRON_LIMIT: usize = 10;
