use crate::riot::client::RiotClient;
use crate::riot::region::Platform;
use crate::riot::types::{RiotApiError, SummonerDto};

impl RiotClient {
    /// Legacy summoner lookup by display name, used when a Riot ID is unknown.
    pub async fn get_summoner_by_name(
        &self,
        platform: Platform,
        name: &str,
    ) -> Result<SummonerDto, RiotApiError> {
        let url = self.url(
            platform.as_str(),
            &format!("/lol/summoner/v4/summoners/by-name/{}", urlencoding::encode(name)),
        );

        self.get(&url).await
    }
}
