// SPDX-License-Identifier: MIT

//! Strava API client and credential provider.
//!
//! Handles:
//! - Paginated activity listing
//! - Athlete profile lookup (connection check)
//! - Token refresh when expired
//! - Rate limit detection (429 with Retry-After)

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::RawActivity;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

/// Margin before token expiration when we proactively refresh (5 minutes).
const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
}

impl StravaClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://www.strava.com/api/v3".to_string(),
        }
    }

    /// Fetch one page of the athlete's activity listing.
    ///
    /// Records come back as opaque JSON objects; the schema varies by
    /// sport type and account settings, so parsing is deferred to the
    /// normalizer.
    pub async fn list_activities(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
        after: Option<i64>,
        before: Option<i64>,
    ) -> Result<Vec<RawActivity>> {
        let url = format!("{}/athlete/activities", self.base_url);

        let mut query: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        if let Some(after) = after {
            query.push(("after", after.to_string()));
        }
        if let Some(before) = before {
            query.push(("before", before.to_string()));
        }

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&query)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        let values: Vec<serde_json::Value> = self.check_response_json(response).await?;
        values.into_iter().map(RawActivity::from_value).collect()
    }

    /// Get the authenticated athlete profile (used as a connection check).
    pub async fn get_athlete(&self, access_token: &str) -> Result<StravaAthlete> {
        let url = format!("{}/athlete", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Refresh an expired access token.
    pub async fn refresh_token(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<TokenRefreshResponse> {
        let response = self
            .http
            .post("https://www.strava.com/oauth/token")
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token refresh request failed: {}", e)))?;

        if response.status().as_u16() == 400 || response.status().as_u16() == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::AuthFailed(format!("token refresh rejected: {}", body)));
        }

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();

            if status.as_u16() == 429 {
                let retry_after_secs = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0);
                tracing::warn!(retry_after_secs, "Strava rate limit hit (429)");
                return Err(AppError::RateLimited { retry_after_secs });
            }

            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 401 {
                return Err(AppError::AuthFailed(format!("HTTP 401: {}", body)));
            }

            return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
    }
}

impl Default for StravaClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

/// Athlete profile, as much of it as the pipeline cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaAthlete {
    pub id: u64,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
}

/// Cached access token with expiry information.
#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Credential provider for the single configured account.
///
/// Produces a currently-valid bearer token, refreshing if expired.
/// Two modes:
/// - a pre-issued `STRAVA_ACCESS_TOKEN` used as-is, or
/// - client id/secret + refresh token, with the short-lived access
///   token cached in memory and refreshed within a margin of expiry.
pub struct TokenProvider {
    client: StravaClient,
    static_token: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    /// Current refresh token; Strava rotates it on every refresh.
    refresh_token: Mutex<Option<String>>,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(client: StravaClient, config: &Config) -> Self {
        Self {
            client,
            static_token: config.strava_access_token.clone(),
            client_id: config.strava_client_id.clone(),
            client_secret: config.strava_client_secret.clone(),
            refresh_token: Mutex::new(config.strava_refresh_token.clone()),
            cached: Mutex::new(None),
        }
    }

    /// Get a valid (non-expired) access token.
    pub async fn access_token(&self) -> Result<String> {
        if let Some(token) = &self.static_token {
            return Ok(token.clone());
        }

        let now = Utc::now();
        let margin = Duration::seconds(TOKEN_REFRESH_MARGIN_SECS);

        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if now + margin < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        let (client_id, client_secret) = match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => (id.clone(), secret.clone()),
            _ => {
                return Err(AppError::AuthFailed(
                    "no access token and no client credentials configured".to_string(),
                ))
            }
        };

        let mut refresh_guard = self.refresh_token.lock().await;
        let refresh_token = refresh_guard.clone().ok_or_else(|| {
            AppError::AuthFailed("no refresh token configured".to_string())
        })?;

        tracing::info!("Access token missing or expiring, refreshing");
        let new_tokens = self
            .client
            .refresh_token(&client_id, &client_secret, &refresh_token)
            .await?;

        // Strava rotates refresh tokens; keep the newest for the next cycle.
        *refresh_guard = Some(new_tokens.refresh_token.clone());

        let expires_at = DateTime::from_timestamp(new_tokens.expires_at, 0).unwrap_or(now);
        *cached = Some(CachedToken {
            access_token: new_tokens.access_token.clone(),
            expires_at,
        });

        tracing::info!("Token refreshed and cached");
        Ok(new_tokens.access_token)
    }
}
