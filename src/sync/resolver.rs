use tracing::{debug, info};

use super::retry::RetryPolicy;
use crate::error::AppError;
use crate::riot::{Platform, RankProvider, RiotApiError};

/// Looks up the PUUID for a Riot ID.
///
/// Falls back to the legacy summoner-by-name lookup only when the account
/// endpoint answers 404. Every other failure is returned as is.
pub async fn resolve_puuid<P>(
    provider: &P,
    retry: &RetryPolicy,
    platform: Platform,
    game_name: &str,
    tag_line: &str,
) -> Result<String, AppError>
where
    P: RankProvider + ?Sized,
{
    let region = platform.to_region();

    let primary = retry
        .run(
            "account_by_riot_id",
            move || provider.account_by_riot_id(region, game_name, tag_line),
            RiotApiError::retry_after,
        )
        .await;

    let puuid = match primary {
        Ok(account) => account.puuid,
        Err(e) if e.is_not_found() => {
            info!(
                riot_id = %format!("{game_name}#{tag_line}"),
                %platform,
                "🔎 Account not found, trying summoner name lookup"
            );
            let name = game_name.trim();
            retry
                .run(
                    "summoner_by_name",
                    move || provider.summoner_by_name(platform, name),
                    RiotApiError::retry_after,
                )
                .await?
                .puuid
        }
        Err(e) => return Err(e.into()),
    };

    if puuid.trim().is_empty() {
        return Err(AppError::UnresolvedAccount {
            game_name: game_name.to_string(),
            tag_line: tag_line.to_string(),
            region: platform.to_string(),
        });
    }

    debug!(riot_id = %format!("{game_name}#{tag_line}"), "🔑 PUUID resolved");
    Ok(puuid)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::sync::testing::{FakeProvider, account, rate_limited, status, summoner};

    fn no_wait() -> RetryPolicy {
        RetryPolicy {
            min_wait: Duration::ZERO,
            max_jitter: Duration::ZERO,
            ..RetryPolicy::default()
        }
    }

    async fn resolve(provider: &FakeProvider, game_name: &str) -> Result<String, AppError> {
        resolve_puuid(provider, &no_wait(), Platform::EUW1, game_name, "EUW").await
    }

    #[tokio::test]
    async fn primary_lookup_wins() {
        let provider = FakeProvider::default();
        provider.account("Chalop", Ok(account("puuid-1")));

        assert_eq!(resolve(&provider, "Chalop").await.unwrap(), "puuid-1");
        assert_eq!(FakeProvider::calls(&provider.summoner_calls), 0);
    }

    #[tokio::test]
    async fn not_found_falls_back_to_summoner_name_once() {
        let provider = FakeProvider::default();
        provider
            .account(" Chalop ", Err(status(404, "Data not found")))
            .summoner("Chalop", Ok(summoner("legacy-puuid")));

        assert_eq!(resolve(&provider, " Chalop ").await.unwrap(), "legacy-puuid");
        assert_eq!(FakeProvider::calls(&provider.account_calls), 1);
        assert_eq!(FakeProvider::calls(&provider.summoner_calls), 1);
    }

    #[tokio::test]
    async fn forbidden_propagates_without_fallback() {
        let provider = FakeProvider::default();
        provider.account("Chalop", Err(status(403, "Forbidden")));

        let err = resolve(&provider, "Chalop").await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Riot(RiotApiError::Status { status: 403, .. })
        ));
        assert!(err.to_string().contains("403"));
        assert_eq!(FakeProvider::calls(&provider.summoner_calls), 0);
    }

    #[tokio::test]
    async fn server_error_propagates_without_fallback() {
        let provider = FakeProvider::default();
        provider.account("Chalop", Err(status(500, "Internal")));

        let err = resolve(&provider, "Chalop").await.unwrap_err();

        assert!(err.to_string().contains("500"));
        assert_eq!(FakeProvider::calls(&provider.summoner_calls), 0);
    }

    #[tokio::test]
    async fn rate_limited_lookup_is_retried() {
        let provider = FakeProvider::default();
        provider
            .account("Chalop", Err(rate_limited()))
            .account("Chalop", Ok(account("puuid-1")));

        assert_eq!(resolve(&provider, "Chalop").await.unwrap(), "puuid-1");
        assert_eq!(FakeProvider::calls(&provider.account_calls), 2);
        assert_eq!(FakeProvider::calls(&provider.summoner_calls), 0);
    }

    #[tokio::test]
    async fn fallback_errors_propagate() {
        let provider = FakeProvider::default();
        provider
            .account("Chalop", Err(status(404, "Data not found")))
            .summoner("Chalop", Err(status(404, "Data not found")));

        let err = resolve(&provider, "Chalop").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Riot(RiotApiError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn empty_puuid_is_unresolved() {
        let provider = FakeProvider::default();
        provider.account("Chalop", Ok(account("")));

        let err = resolve(&provider, "Chalop").await.unwrap_err();
        assert!(matches!(err, AppError::UnresolvedAccount { .. }));
    }
}
