use crate::riot::client::RiotClient;
use crate::riot::region::Platform;
use crate::riot::types::{LeagueEntryDto, RiotApiError};

impl RiotClient {
    /// Get league entries (ranked info) for a player by PUUID
    /// Uses platform routing (euw1, na1, kr, etc.)
    pub async fn get_league_entries_by_puuid(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Vec<LeagueEntryDto>, RiotApiError> {
        let url = self.url(
            platform.as_str(),
            &format!("/lol/league/v4/entries/by-puuid/{}", urlencoding::encode(puuid)),
        );

        self.get(&url).await
    }
}
