mod client;
mod endpoints;
mod metrics;
mod provider;
mod region;
mod types;

pub use client::RiotClient;
pub use metrics::RequestMetrics;
pub use provider::RankProvider;
pub use region::{Platform, Region};
pub use types::{AccountDto, LeagueEntryDto, QueueType, RiotApiError, SummonerDto};
