// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! All pipeline components take explicit configuration structs; nothing
//! reads the environment after startup.

use std::env;

/// What to do when the normalizer rejects a raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Log the offending record and drop it.
    Skip,
    /// Fail the whole run on the first malformed record.
    Abort,
}

impl std::str::FromStr for MalformedPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(MalformedPolicy::Skip),
            "abort" => Ok(MalformedPolicy::Abort),
            _ => Err(ConfigError::Invalid("MALFORMED_POLICY", "expected `skip` or `abort`")),
        }
    }
}

/// Fixed unit-conversion policy applied by the normalizer.
///
/// All distances normalize to meters and all durations to seconds,
/// regardless of the account's display-unit preference.
#[derive(Debug, Clone, Copy)]
pub struct UnitPolicy {
    pub meters_per_mile: f64,
    pub meters_per_foot: f64,
    pub meters_per_km: f64,
}

impl Default for UnitPolicy {
    fn default() -> Self {
        Self {
            meters_per_mile: 1609.34,
            meters_per_foot: 0.3048,
            meters_per_km: 1000.0,
        }
    }
}

/// Retry and pagination bounds for the activity fetcher.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Activities requested per page.
    pub per_page: u32,
    /// Stop paging once this many activities have been accumulated.
    pub max_activities: usize,
    /// Total attempt budget per page (first try included).
    pub max_attempts: u32,
    /// First backoff delay for network failures; doubles per retry.
    pub initial_backoff_secs: u64,
    /// Cooldown used for a 429 response that carries no Retry-After.
    pub default_cooldown_secs: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            per_page: 30,
            max_activities: 3000,
            max_attempts: 5,
            initial_backoff_secs: 1,
            default_cooldown_secs: 60,
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth client ID (public). Needed for the refresh flow.
    pub strava_client_id: Option<String>,
    /// Strava OAuth client secret. Needed for the refresh flow.
    pub strava_client_secret: Option<String>,
    /// Long-lived refresh token for the single account.
    pub strava_refresh_token: Option<String>,
    /// Pre-issued access token; used as-is when present.
    pub strava_access_token: Option<String>,
    /// Malformed-record policy for this run.
    pub malformed_policy: MalformedPolicy,
    /// Unit conversion constants.
    pub units: UnitPolicy,
    /// Fetcher retry/pagination bounds.
    pub fetch: FetchOptions,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let malformed_policy = match env::var("MALFORMED_POLICY") {
            Ok(v) => v.parse()?,
            // Required to be an explicit choice; the CLI flag overrides this.
            Err(_) => MalformedPolicy::Abort,
        };

        let mut fetch = FetchOptions::default();
        if let Ok(v) = env::var("STRAVA_MAX_ACTIVITIES") {
            fetch.max_activities = v
                .parse()
                .map_err(|_| ConfigError::Invalid("STRAVA_MAX_ACTIVITIES", "expected an integer"))?;
        }
        if let Ok(v) = env::var("STRAVA_PER_PAGE") {
            fetch.per_page = v
                .parse()
                .map_err(|_| ConfigError::Invalid("STRAVA_PER_PAGE", "expected an integer"))?;
        }

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID").ok(),
            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .ok()
                .map(|v| v.trim().to_string()),
            strava_refresh_token: env::var("STRAVA_REFRESH_TOKEN")
                .ok()
                .map(|v| v.trim().to_string()),
            strava_access_token: env::var("STRAVA_ACCESS_TOKEN")
                .ok()
                .map(|v| v.trim().to_string()),
            malformed_policy,
            units: UnitPolicy::default(),
            fetch,
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            strava_client_id: Some("test_client_id".to_string()),
            strava_client_secret: Some("test_secret".to_string()),
            strava_refresh_token: None,
            strava_access_token: Some("test_access_token".to_string()),
            malformed_policy: MalformedPolicy::Abort,
            units: UnitPolicy::default(),
            fetch: FetchOptions::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}
