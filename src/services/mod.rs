// SPDX-License-Identifier: MIT

//! Services module - pipeline stages and the Strava boundary.

pub mod export;
pub mod fetcher;
pub mod filter;
pub mod normalizer;
pub mod pipeline;
pub mod strava;

pub use fetcher::{ActivityFetcher, PageSource, StravaPageSource};
pub use filter::ActivityFilter;
pub use normalizer::Normalizer;
pub use pipeline::{PipelineOutput, SyncPipeline};
pub use strava::{StravaClient, TokenProvider};
