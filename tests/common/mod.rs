// SPDX-License-Identifier: MIT

//! Shared test helpers: a scripted page source for exercising the
//! fetcher and pipeline without a network.

use std::sync::Mutex;

use runhub::error::{AppError, Result};
use runhub::models::RawActivity;
use runhub::services::PageSource;

/// One scripted response from the fake remote source.
#[allow(dead_code)]
pub enum Step {
    /// A page of raw records.
    Page(Vec<serde_json::Value>),
    /// A 429 with the given Retry-After.
    RateLimited(u64),
    /// A transport-level failure.
    NetworkError(&'static str),
    /// A 401.
    AuthFailed,
}

/// Page source that replays a fixed script, one step per call.
pub struct ScriptedSource {
    steps: Mutex<std::vec::IntoIter<Step>>,
    calls: Mutex<u32>,
}

impl ScriptedSource {
    #[allow(dead_code)]
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter()),
            calls: Mutex::new(0),
        }
    }

    /// Number of fetch_page calls made so far.
    #[allow(dead_code)]
    pub fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

impl PageSource for ScriptedSource {
    async fn fetch_page(
        &self,
        _page: u32,
        _per_page: u32,
        _after: Option<i64>,
        _before: Option<i64>,
    ) -> Result<Vec<RawActivity>> {
        *self.calls.lock().unwrap() += 1;
        let step = self
            .steps
            .lock()
            .unwrap()
            .next()
            .expect("scripted source ran out of steps");
        match step {
            Step::Page(values) => values.into_iter().map(RawActivity::from_value).collect(),
            Step::RateLimited(retry_after_secs) => Err(AppError::RateLimited { retry_after_secs }),
            Step::NetworkError(msg) => Err(AppError::StravaApi(msg.to_string())),
            Step::AuthFailed => Err(AppError::AuthFailed("HTTP 401".to_string())),
        }
    }
}

/// A minimal well-formed raw activity record.
#[allow(dead_code)]
pub fn raw_activity(id: u64, sport: &str, date: &str, distance_m: f64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("Activity {}", id),
        "sport_type": sport,
        "start_date": date,
        "distance": distance_m,
        "moving_time": 1500,
        "elapsed_time": 1600,
        "total_elevation_gain": 25.0,
        "average_heartrate": 148.0
    })
}

/// Fetch options with zero delays, for fast retry tests.
#[allow(dead_code)]
pub fn fast_fetch_options() -> runhub::config::FetchOptions {
    runhub::config::FetchOptions {
        per_page: 2,
        max_activities: 100,
        max_attempts: 5,
        initial_backoff_secs: 0,
        default_cooldown_secs: 0,
    }
}
