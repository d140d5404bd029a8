// SPDX-License-Identifier: MIT

//! Data models for the pipeline.

pub mod activity;
pub mod metrics;
pub mod raw;

pub use activity::{Activity, Sport};
pub use metrics::{MetricsSummary, WeekBucket, WeekKey};
pub use raw::RawActivity;
