// SPDX-License-Identifier: MIT

//! Runhub: personal Strava activity pipeline
//!
//! Fetches the configured account's activity history, normalizes the
//! heterogeneous raw records into a fixed metric schema, computes
//! summary metrics, and exports the result as CSV plus a text report.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;
