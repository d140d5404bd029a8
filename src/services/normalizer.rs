// SPDX-License-Identifier: MIT

//! Raw record normalization.
//!
//! Converts heterogeneous raw records (differing unit systems, optional
//! fields, evolving sport-type taxonomy) into the fixed `Activity`
//! schema: meters and seconds throughout, explicit `None` for absent
//! optionals. All field contracts are enforced here; malformed input
//! fails with an error naming the offending field.

use chrono::{DateTime, Utc};

use crate::config::UnitPolicy;
use crate::error::{AppError, Result};
use crate::models::{Activity, RawActivity, Sport};

/// Accepted aliases, in precedence order, for each logical field.
/// The suffixed forms come from exports keyed by display unit; the
/// bare forms are what the API itself returns (already metric).
const DISTANCE_FIELDS: &[&str] = &["distance", "distance_m", "distance_km", "distance_miles"];
const MOVING_TIME_FIELDS: &[&str] = &["moving_time", "moving_time_s"];
const ELAPSED_TIME_FIELDS: &[&str] = &["elapsed_time", "elapsed_time_s"];
const ELEVATION_FIELDS: &[&str] = &[
    "total_elevation_gain",
    "elevation_gain_m",
    "elevation_gain_km",
    "elevation_ft",
];
const HEART_RATE_FIELDS: &[&str] = &["average_heartrate", "average_hr", "avg_hr"];
const SPORT_FIELDS: &[&str] = &["sport_type", "sport", "type"];
const START_FIELDS: &[&str] = &["start_date", "start"];

/// Pure normalization of one raw record.
pub struct Normalizer {
    units: UnitPolicy,
}

impl Normalizer {
    pub fn new(units: UnitPolicy) -> Self {
        Self { units }
    }

    /// Normalize a raw record into the fixed activity schema.
    ///
    /// Total over well-formed input; fails with `MalformedRecord` when a
    /// required field is absent or the wrong shape, or when an invariant
    /// (non-negative distance, moving ≤ elapsed) does not hold.
    pub fn normalize(&self, raw: &RawActivity) -> Result<Activity> {
        let (_, id) = raw.require_u64(&["id"])?;

        let name = match raw.first_present(&["name"]) {
            Some((_, v)) => v.as_str().unwrap_or("").to_string(),
            None => String::new(),
        };

        let (_, sport_str) = raw.require_str(SPORT_FIELDS)?;
        let sport = Sport::from_api(sport_str);

        let (start_field, start_str) = raw.require_str(START_FIELDS)?;
        let start: DateTime<Utc> = start_str
            .parse()
            .map_err(|e| AppError::malformed(start_field, format!("is not a valid timestamp: {}", e)))?;

        let distance_m = self.distance_meters(raw)?;
        if distance_m < 0.0 {
            return Err(AppError::malformed("distance", "must be non-negative"));
        }

        let moving_time_s = duration_seconds(raw, MOVING_TIME_FIELDS)?;
        // Elapsed time is absent from some exports; an activity with no
        // recorded pauses has elapsed equal to moving time.
        let elapsed_time_s = match raw.first_present(ELAPSED_TIME_FIELDS) {
            Some(_) => duration_seconds(raw, ELAPSED_TIME_FIELDS)?,
            None => moving_time_s,
        };
        if moving_time_s > elapsed_time_s {
            return Err(AppError::malformed(
                "moving_time",
                format!("({}) exceeds elapsed time ({})", moving_time_s, elapsed_time_s),
            ));
        }

        let elevation_gain_m = self.elevation_meters(raw)?;
        let average_hr = raw.optional_f64(HEART_RATE_FIELDS)?.map(|(_, hr)| hr);

        // Pace is undefined, not zero, for zero-distance activities.
        let pace_s_per_m = if distance_m > 0.0 {
            Some(f64::from(moving_time_s) / distance_m)
        } else {
            None
        };

        Ok(Activity {
            id,
            name,
            sport,
            start,
            distance_m,
            moving_time_s,
            elapsed_time_s,
            elevation_gain_m,
            average_hr,
            pace_s_per_m,
        })
    }

    /// Required distance, converted to meters from whichever unit the
    /// matched alias carries.
    fn distance_meters(&self, raw: &RawActivity) -> Result<f64> {
        let (field, value) = raw.require_f64(DISTANCE_FIELDS)?;
        Ok(match field {
            "distance_km" => value * self.units.meters_per_km,
            "distance_miles" => value * self.units.meters_per_mile,
            _ => value,
        })
    }

    /// Optional elevation gain in meters; absent maps to `None`,
    /// never zero.
    fn elevation_meters(&self, raw: &RawActivity) -> Result<Option<f64>> {
        Ok(raw.optional_f64(ELEVATION_FIELDS)?.map(|(field, value)| match field {
            "elevation_gain_km" => value * self.units.meters_per_km,
            "elevation_ft" => value * self.units.meters_per_foot,
            _ => value,
        }))
    }
}

/// Required duration field as whole seconds.
fn duration_seconds(raw: &RawActivity, fields: &[&'static str]) -> Result<u32> {
    let (field, value) = raw.require_f64(fields)?;
    if value < 0.0 || value.fract() != 0.0 {
        return Err(AppError::malformed(field, "expected a non-negative whole number of seconds"));
    }
    if value > f64::from(u32::MAX) {
        return Err(AppError::malformed(field, "is out of range"));
    }
    Ok(value as u32)
}
