use std::env;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::error::AppError;
use crate::trigger::MAX_CRON_LIMIT;

/// Deployment environment, drives the cron authorization fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    Test,
    #[default]
    Production,
}

impl FromStr for Environment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => Err(AppError::Config(format!("unknown APP_ENV: {other}"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub riot_api_key: String,
    /// Replaces every `https://{host}.api.riotgames.com` prefix when set.
    pub riot_api_base_url: Option<String>,
    pub database_url: String,
    pub sync_interval_secs: u64,
    pub sync_batch_limit: usize,
    pub riot_rate_limit_per_second: NonZeroU32,
    pub cron_secret: Option<String>,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        const DEFAULT_SYNC_INTERVAL_SECS: u64 = 300;
        const DEFAULT_SYNC_BATCH_LIMIT: usize = 5;
        const DEFAULT_RIOT_RATE_LIMIT_PER_SECOND: u32 = 20;

        let riot_api_key = env::var("RIOT_API_KEY")
            .map_err(|_| AppError::Config("RIOT_API_KEY must be set".into()))?;

        let riot_api_base_url = env::var("RIOT_API_BASE_URL")
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty());

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:rankwatch.db".into());

        let sync_interval_secs = env::var("SYNC_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_SYNC_INTERVAL_SECS);

        let sync_batch_limit = env::var("SYNC_BATCH_LIMIT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_SYNC_BATCH_LIMIT)
            .clamp(1, MAX_CRON_LIMIT);

        let riot_rate_limit_per_second = env::var("RIOT_RATE_LIMIT_PER_SECOND")
            .ok()
            .and_then(|v| v.parse().ok())
            .and_then(NonZeroU32::new)
            .unwrap_or_else(|| {
                NonZeroU32::new(DEFAULT_RIOT_RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN)
            });

        let cron_secret = env::var("CRON_SECRET")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let environment = match env::var("APP_ENV") {
            Ok(v) => v.parse()?,
            Err(_) => Environment::default(),
        };

        Ok(Self {
            riot_api_key,
            riot_api_base_url,
            database_url,
            sync_interval_secs,
            sync_batch_limit,
            riot_rate_limit_per_second,
            cron_secret,
            environment,
        })
    }
}
