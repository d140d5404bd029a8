// SPDX-License-Identifier: MIT

//! Aggregate statistics over a collection of normalized activities.
//!
//! All aggregation uses ordered maps keyed by ISO week, so identical
//! input always produces identical output regardless of how the input
//! was accumulated.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::models::{Activity, Sport};

/// ISO week bucket key (ISO year + week number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl WeekKey {
    /// Bucket a timestamp by its ISO week.
    pub fn from_timestamp(ts: DateTime<Utc>) -> Self {
        let iso = ts.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }
}

impl std::fmt::Display for WeekKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

/// Per-week aggregate bucket.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WeekBucket {
    /// Activities in this week
    pub activities: u32,
    /// Total distance (meters)
    pub distance_m: f64,
    /// Total elevation gain (meters) over activities that reported it
    pub elevation_gain_m: f64,
    /// Mean of available average-heart-rate values; `None` when no
    /// activity in the week reported heart rate
    pub mean_hr: Option<f64>,
}

/// Aggregate summary over a collection of activities.
///
/// Derived, recomputed on demand, never mutated in place.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSummary {
    /// Total activities aggregated
    pub total_activities: u32,
    /// Total distance across all activities (meters)
    pub total_distance_m: f64,
    /// Total moving time (seconds)
    pub total_moving_time_s: u64,
    /// Total elapsed time (seconds)
    pub total_elapsed_time_s: u64,
    /// Total elevation gain over activities that reported it (meters)
    pub total_elevation_gain_m: f64,
    /// Total moving time / total elapsed time
    pub efficiency_ratio: Option<f64>,
    /// Activities that reported heart rate
    pub activities_with_hr: u32,
    /// Activity count per sport
    pub activities_by_sport: BTreeMap<Sport, u32>,
    /// Total distance per sport (meters)
    pub distance_by_sport: BTreeMap<Sport, f64>,
    /// Earliest and latest start timestamps
    pub first_start: Option<DateTime<Utc>>,
    pub last_start: Option<DateTime<Utc>>,
    /// Per-ISO-week buckets (weekly mileage, elevation and HR trends)
    pub weeks: BTreeMap<WeekKey, WeekBucket>,
}

impl MetricsSummary {
    /// Compute aggregates over a sequence of activities.
    ///
    /// Every aggregate is a commutative fold into ordered maps, so the
    /// result is independent of input order.
    pub fn compute(activities: &[Activity]) -> Self {
        let mut summary = Self::default();
        // Per-week HR sums, folded into means at the end.
        let mut hr_sums: BTreeMap<WeekKey, (f64, u32)> = BTreeMap::new();

        for activity in activities {
            summary.total_activities += 1;
            summary.total_distance_m += activity.distance_m;
            summary.total_moving_time_s += u64::from(activity.moving_time_s);
            summary.total_elapsed_time_s += u64::from(activity.elapsed_time_s);
            if let Some(gain) = activity.elevation_gain_m {
                summary.total_elevation_gain_m += gain;
            }
            if activity.average_hr.is_some() {
                summary.activities_with_hr += 1;
            }

            *summary.activities_by_sport.entry(activity.sport).or_insert(0) += 1;
            *summary.distance_by_sport.entry(activity.sport).or_insert(0.0) += activity.distance_m;

            summary.first_start = match summary.first_start {
                Some(cur) => Some(cur.min(activity.start)),
                None => Some(activity.start),
            };
            summary.last_start = match summary.last_start {
                Some(cur) => Some(cur.max(activity.start)),
                None => Some(activity.start),
            };

            let week = WeekKey::from_timestamp(activity.start);
            let bucket = summary.weeks.entry(week).or_default();
            bucket.activities += 1;
            bucket.distance_m += activity.distance_m;
            if let Some(gain) = activity.elevation_gain_m {
                bucket.elevation_gain_m += gain;
            }
            if let Some(hr) = activity.average_hr {
                let (sum, count) = hr_sums.entry(week).or_insert((0.0, 0));
                *sum += hr;
                *count += 1;
            }
        }

        for (week, (sum, count)) in hr_sums {
            if count > 0 {
                if let Some(bucket) = summary.weeks.get_mut(&week) {
                    bucket.mean_hr = Some(sum / f64::from(count));
                }
            }
        }

        if summary.total_elapsed_time_s > 0 {
            summary.efficiency_ratio =
                Some(summary.total_moving_time_s as f64 / summary.total_elapsed_time_s as f64);
        }

        summary
    }

    /// Weekly mileage series, ordered by week.
    pub fn weekly_mileage(&self) -> impl Iterator<Item = (WeekKey, f64)> + '_ {
        self.weeks.iter().map(|(k, b)| (*k, b.distance_m))
    }

    /// Weekly elevation-gain series, ordered by week.
    pub fn elevation_trend(&self) -> impl Iterator<Item = (WeekKey, f64)> + '_ {
        self.weeks.iter().map(|(k, b)| (*k, b.elevation_gain_m))
    }

    /// Weekly mean-heart-rate series, ordered by week. Weeks with no
    /// reporting activities yield `None`, not zero.
    pub fn heart_rate_trend(&self) -> impl Iterator<Item = (WeekKey, Option<f64>)> + '_ {
        self.weeks.iter().map(|(k, b)| (*k, b.mean_hr))
    }
}
