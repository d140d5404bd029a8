// SPDX-License-Identifier: MIT

//! Paginated activity fetching with bounded retries.
//!
//! Pages through the remote listing until an empty page or the
//! configured maximum item count. Rate-limit responses suspend for the
//! source-specified cooldown; network failures back off exponentially.
//! Both retry loops share one per-page attempt budget.

use std::time::Duration;

use crate::config::FetchOptions;
use crate::error::{AppError, Result};
use crate::models::RawActivity;
use crate::services::strava::{StravaClient, TokenProvider};

/// One page of raw activity records.
///
/// Pagination and retry logic live behind this seam so they can be
/// exercised without a network.
pub trait PageSource {
    fn fetch_page(
        &self,
        page: u32,
        per_page: u32,
        after: Option<i64>,
        before: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<RawActivity>>> + Send;
}

/// Live page source backed by the Strava API.
pub struct StravaPageSource {
    client: StravaClient,
    tokens: TokenProvider,
}

impl StravaPageSource {
    pub fn new(client: StravaClient, tokens: TokenProvider) -> Self {
        Self { client, tokens }
    }
}

impl PageSource for StravaPageSource {
    async fn fetch_page(
        &self,
        page: u32,
        per_page: u32,
        after: Option<i64>,
        before: Option<i64>,
    ) -> Result<Vec<RawActivity>> {
        let access_token = self.tokens.access_token().await?;
        self.client
            .list_activities(&access_token, page, per_page, after, before)
            .await
    }
}

/// Accumulates raw activity records from a page source.
pub struct ActivityFetcher<S> {
    source: S,
    opts: FetchOptions,
}

impl<S: PageSource> ActivityFetcher<S> {
    pub fn new(source: S, opts: FetchOptions) -> Self {
        Self { source, opts }
    }

    /// Fetch the full listing for the requested date range.
    ///
    /// Stops at the first empty page or once `max_activities` records
    /// have been accumulated. A failed run discards everything fetched
    /// so far; nothing is persisted.
    pub async fn fetch_all(&self, after: Option<i64>, before: Option<i64>) -> Result<Vec<RawActivity>> {
        let mut all: Vec<RawActivity> = Vec::new();
        let mut page = 1u32;

        loop {
            let batch = self.fetch_page_with_retry(page, after, before).await?;
            if batch.is_empty() {
                break;
            }
            tracing::debug!(page, count = batch.len(), "Fetched activity page");
            all.extend(batch);

            if all.len() >= self.opts.max_activities {
                all.truncate(self.opts.max_activities);
                tracing::info!(
                    max = self.opts.max_activities,
                    "Reached maximum activity count, stopping pagination"
                );
                break;
            }
            page += 1;
        }

        tracing::info!(total = all.len(), "Activity fetch complete");
        Ok(all)
    }

    /// Fetch one page, retrying within the attempt budget.
    async fn fetch_page_with_retry(
        &self,
        page: u32,
        after: Option<i64>,
        before: Option<i64>,
    ) -> Result<Vec<RawActivity>> {
        let mut attempt = 1u32;
        let mut backoff_secs = self.opts.initial_backoff_secs;

        loop {
            match self
                .source
                .fetch_page(page, self.opts.per_page, after, before)
                .await
            {
                Ok(batch) => return Ok(batch),

                Err(AppError::RateLimited { retry_after_secs }) => {
                    if attempt >= self.opts.max_attempts {
                        return Err(AppError::RateLimitExceeded { attempts: attempt });
                    }
                    let cooldown = if retry_after_secs > 0 {
                        retry_after_secs
                    } else {
                        self.opts.default_cooldown_secs
                    };
                    tracing::warn!(page, attempt, cooldown, "Rate limited, cooling down");
                    tokio::time::sleep(Duration::from_secs(cooldown)).await;
                    attempt += 1;
                }

                // Credential problems never resolve by retrying.
                Err(e @ AppError::AuthFailed(_)) => return Err(e),

                Err(AppError::StravaApi(msg)) => {
                    if attempt >= self.opts.max_attempts {
                        return Err(AppError::FetchFailed {
                            attempts: attempt,
                            source: anyhow::anyhow!(msg),
                        });
                    }
                    tracing::warn!(page, attempt, backoff_secs, error = %msg, "Fetch failed, backing off");
                    tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                    backoff_secs = backoff_secs.saturating_mul(2);
                    attempt += 1;
                }

                Err(e) => return Err(e),
            }
        }
    }
}
