// SPDX-License-Identifier: MIT

//! Normalized activity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sport type for a normalized activity.
///
/// The remote taxonomy evolves independently of this crate, so any
/// unrecognized type maps to `Other` instead of failing normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sport {
    Run,
    TrailRun,
    VirtualRun,
    Ride,
    MountainBikeRide,
    GravelRide,
    VirtualRide,
    Hike,
    Walk,
    Swim,
    Rowing,
    WeightTraining,
    Workout,
    Yoga,
    Other,
}

impl Sport {
    /// Map a remote sport-type string to the internal enum.
    pub fn from_api(s: &str) -> Self {
        match s {
            "Run" => Sport::Run,
            "TrailRun" => Sport::TrailRun,
            "VirtualRun" => Sport::VirtualRun,
            "Ride" => Sport::Ride,
            "MountainBikeRide" => Sport::MountainBikeRide,
            "GravelRide" => Sport::GravelRide,
            "VirtualRide" => Sport::VirtualRide,
            "Hike" => Sport::Hike,
            "Walk" => Sport::Walk,
            "Swim" => Sport::Swim,
            "Rowing" => Sport::Rowing,
            "WeightTraining" => Sport::WeightTraining,
            "Workout" => Sport::Workout,
            "Yoga" => Sport::Yoga,
            _ => Sport::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Run => "Run",
            Sport::TrailRun => "TrailRun",
            Sport::VirtualRun => "VirtualRun",
            Sport::Ride => "Ride",
            Sport::MountainBikeRide => "MountainBikeRide",
            Sport::GravelRide => "GravelRide",
            Sport::VirtualRide => "VirtualRide",
            Sport::Hike => "Hike",
            Sport::Walk => "Walk",
            Sport::Swim => "Swim",
            Sport::Rowing => "Rowing",
            Sport::WeightTraining => "WeightTraining",
            Sport::Workout => "Workout",
            Sport::Yoga => "Yoga",
            Sport::Other => "Other",
        }
    }
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized activity record.
///
/// Produced once per raw record by the normalizer and immutable
/// thereafter. Distances are meters, durations seconds; absent
/// optional fields are `None`, never zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Remote activity ID
    pub id: u64,
    /// Activity name/title
    pub name: String,
    /// Sport type
    pub sport: Sport,
    /// Start timestamp (UTC)
    pub start: DateTime<Utc>,
    /// Distance in meters
    pub distance_m: f64,
    /// Moving time in seconds (excludes paused intervals)
    pub moving_time_s: u32,
    /// Elapsed time in seconds (wall clock)
    pub elapsed_time_s: u32,
    /// Total elevation gain in meters, if reported
    pub elevation_gain_m: Option<f64>,
    /// Average heart rate in bpm, if reported
    pub average_hr: Option<f64>,
    /// Average pace in seconds per meter; undefined when distance is zero
    pub pace_s_per_m: Option<f64>,
}

impl Activity {
    /// Moving time as a fraction of elapsed time.
    pub fn efficiency_ratio(&self) -> Option<f64> {
        if self.elapsed_time_s == 0 {
            return None;
        }
        Some(f64::from(self.moving_time_s) / f64::from(self.elapsed_time_s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_sport_maps_to_other() {
        assert_eq!(Sport::from_api("EBikeRide"), Sport::Other);
        assert_eq!(Sport::from_api(""), Sport::Other);
    }

    #[test]
    fn test_known_sport_round_trips() {
        for s in ["Run", "Ride", "Hike", "Swim", "TrailRun"] {
            assert_eq!(Sport::from_api(s).as_str(), s);
        }
    }

    #[test]
    fn test_efficiency_ratio_handles_zero_elapsed() {
        let a = Activity {
            id: 1,
            name: "t".to_string(),
            sport: Sport::Run,
            start: Utc::now(),
            distance_m: 0.0,
            moving_time_s: 0,
            elapsed_time_s: 0,
            elevation_gain_m: None,
            average_hr: None,
            pace_s_per_m: None,
        };
        assert!(a.efficiency_ratio().is_none());
    }
}
