use async_trait::async_trait;

use super::client::RiotClient;
use super::region::{Platform, Region};
use super::types::{AccountDto, LeagueEntryDto, RiotApiError, SummonerDto};

/// Ranked-stats operations the sync pipeline needs from the provider.
#[async_trait]
pub trait RankProvider: Send + Sync {
    async fn account_by_riot_id(
        &self,
        region: Region,
        game_name: &str,
        tag_line: &str,
    ) -> Result<AccountDto, RiotApiError>;

    async fn summoner_by_name(
        &self,
        platform: Platform,
        name: &str,
    ) -> Result<SummonerDto, RiotApiError>;

    async fn league_entries_by_puuid(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Vec<LeagueEntryDto>, RiotApiError>;
}

#[async_trait]
impl RankProvider for RiotClient {
    async fn account_by_riot_id(
        &self,
        region: Region,
        game_name: &str,
        tag_line: &str,
    ) -> Result<AccountDto, RiotApiError> {
        self.get_account_by_riot_id(region, game_name, tag_line)
            .await
    }

    async fn summoner_by_name(
        &self,
        platform: Platform,
        name: &str,
    ) -> Result<SummonerDto, RiotApiError> {
        self.get_summoner_by_name(platform, name).await
    }

    async fn league_entries_by_puuid(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Vec<LeagueEntryDto>, RiotApiError> {
        self.get_league_entries_by_puuid(platform, puuid).await
    }
}
