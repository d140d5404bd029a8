// SPDX-License-Identifier: MIT

//! Application error types shared across the pipeline.

/// Application error type covering the full sync pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Strava rate limit exceeded after {attempts} attempts")]
    RateLimitExceeded { attempts: u32 },

    /// Raised by the Strava client on a single 429 response; the fetcher
    /// converts repeated occurrences into `RateLimitExceeded`.
    #[error("Strava rate limit hit, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Fetch failed after {attempts} attempts: {source}")]
    FetchFailed {
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },

    #[error("Malformed activity record: field `{field}` {reason}")]
    MalformedRecord { field: String, reason: String },

    #[error("Strava API error: {0}")]
    StravaApi(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Build a `MalformedRecord` error naming the offending raw field.
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::MalformedRecord {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;
