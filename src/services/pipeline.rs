// SPDX-License-Identifier: MIT

//! Pipeline orchestration.
//!
//! Runs the stages in order: fetch raw records, normalize them under
//! the configured malformed-record policy, sort by start time, filter,
//! and compute aggregates. Each stage consumes the full output of the
//! previous one; a failed run produces nothing.

use crate::config::{Config, MalformedPolicy};
use crate::error::{AppError, Result};
use crate::models::{Activity, MetricsSummary, RawActivity};
use crate::services::fetcher::{ActivityFetcher, PageSource};
use crate::services::filter::ActivityFilter;
use crate::services::normalizer::Normalizer;

/// Result of one pipeline run: the ordered, filtered activity
/// collection and its aggregate summary.
#[derive(Debug)]
pub struct PipelineOutput {
    pub activities: Vec<Activity>,
    pub summary: MetricsSummary,
    /// Raw records dropped under the skip policy.
    pub skipped: usize,
}

/// One batch sync over a page source.
pub struct SyncPipeline<S> {
    fetcher: ActivityFetcher<S>,
    normalizer: Normalizer,
    policy: MalformedPolicy,
}

impl<S: PageSource> SyncPipeline<S> {
    pub fn new(source: S, config: &Config) -> Self {
        Self {
            fetcher: ActivityFetcher::new(source, config.fetch),
            normalizer: Normalizer::new(config.units),
            policy: config.malformed_policy,
        }
    }

    /// Run the full pipeline for the requested scope.
    pub async fn run(&self, filter: ActivityFilter) -> Result<PipelineOutput> {
        let after = filter.after.map(|t| t.timestamp());
        let before = filter.before.map(|t| t.timestamp());

        let raw = self.fetcher.fetch_all(after, before).await?;
        let (mut activities, skipped) = self.normalize_all(&raw)?;

        // The listing endpoint returns newest-first; downstream
        // consumers expect oldest-first.
        activities.sort_by_key(|a| (a.start, a.id));

        let activities = filter.apply(&activities);
        let summary = MetricsSummary::compute(&activities);

        Ok(PipelineOutput {
            activities,
            summary,
            skipped,
        })
    }

    /// Normalize every raw record under the configured policy.
    fn normalize_all(&self, raw: &[RawActivity]) -> Result<(Vec<Activity>, usize)> {
        let mut activities = Vec::with_capacity(raw.len());
        let mut skipped = 0usize;

        for record in raw {
            match self.normalizer.normalize(record) {
                Ok(activity) => activities.push(activity),
                Err(err @ AppError::MalformedRecord { .. }) => match self.policy {
                    MalformedPolicy::Skip => {
                        tracing::warn!(error = %err, "Skipping malformed record");
                        skipped += 1;
                    }
                    MalformedPolicy::Abort => return Err(err),
                },
                Err(other) => return Err(other),
            }
        }

        if skipped > 0 {
            tracing::info!(skipped, kept = activities.len(), "Normalization complete");
        }
        Ok((activities, skipped))
    }
}
