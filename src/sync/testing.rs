use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::riot::{
    AccountDto, LeagueEntryDto, Platform, RankProvider, Region, RiotApiError, SummonerDto,
};

type Script<T> = Mutex<HashMap<String, VecDeque<Result<T, RiotApiError>>>>;

/// Provider double answering from per-key response queues. Unscripted calls get a 404.
#[derive(Default)]
pub(crate) struct FakeProvider {
    accounts: Script<AccountDto>,
    summoners: Script<SummonerDto>,
    leagues: Script<Vec<LeagueEntryDto>>,
    pub account_calls: AtomicU32,
    pub summoner_calls: AtomicU32,
    pub league_calls: AtomicU32,
}

fn push<T>(script: &Script<T>, key: &str, response: Result<T, RiotApiError>) {
    script
        .lock()
        .unwrap()
        .entry(key.to_string())
        .or_default()
        .push_back(response);
}

fn next<T>(script: &Script<T>, key: &str) -> Result<T, RiotApiError> {
    script
        .lock()
        .unwrap()
        .get_mut(key)
        .and_then(VecDeque::pop_front)
        .unwrap_or_else(|| Err(status(404, &format!("unscripted call for {key}"))))
}

impl FakeProvider {
    pub fn account(&self, game_name: &str, response: Result<AccountDto, RiotApiError>) -> &Self {
        push(&self.accounts, game_name, response);
        self
    }

    pub fn summoner(&self, name: &str, response: Result<SummonerDto, RiotApiError>) -> &Self {
        push(&self.summoners, name, response);
        self
    }

    pub fn league(&self, puuid: &str, response: Result<Vec<LeagueEntryDto>, RiotApiError>) -> &Self {
        push(&self.leagues, puuid, response);
        self
    }

    pub fn calls(counter: &AtomicU32) -> u32 {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RankProvider for FakeProvider {
    async fn account_by_riot_id(
        &self,
        _region: Region,
        game_name: &str,
        _tag_line: &str,
    ) -> Result<AccountDto, RiotApiError> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        next(&self.accounts, game_name)
    }

    async fn summoner_by_name(
        &self,
        _platform: Platform,
        name: &str,
    ) -> Result<SummonerDto, RiotApiError> {
        self.summoner_calls.fetch_add(1, Ordering::SeqCst);
        next(&self.summoners, name)
    }

    async fn league_entries_by_puuid(
        &self,
        _platform: Platform,
        puuid: &str,
    ) -> Result<Vec<LeagueEntryDto>, RiotApiError> {
        self.league_calls.fetch_add(1, Ordering::SeqCst);
        next(&self.leagues, puuid)
    }
}

pub(crate) fn status(status: u16, body: &str) -> RiotApiError {
    RiotApiError::Status {
        status,
        body: body.to_string(),
    }
}

pub(crate) fn rate_limited() -> RiotApiError {
    RiotApiError::RateLimited {
        retry_after: Duration::ZERO,
        limit_type: Some("application".into()),
    }
}

pub(crate) fn account(puuid: &str) -> AccountDto {
    AccountDto {
        puuid: puuid.to_string(),
        game_name: None,
        tag_line: None,
    }
}

pub(crate) fn summoner(puuid: &str) -> SummonerDto {
    SummonerDto {
        puuid: puuid.to_string(),
        name: None,
        summoner_level: None,
    }
}

pub(crate) fn entry(queue_type: &str, tier: &str, rank: &str, lp: i64) -> LeagueEntryDto {
    LeagueEntryDto {
        queue_type: queue_type.to_string(),
        tier: tier.to_string(),
        rank: rank.to_string(),
        league_points: lp,
        wins: 120,
        losses: 100,
    }
}
